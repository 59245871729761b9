#![warn(missing_docs)]
//! Physics primitives (AABB, rays, bodies, smoothing) and the scene query surface.

mod body;
mod smoothing;

use glam::Vec3;
use roomkit_core::{LayerMask, ObjectId};

pub use body::{BodyMode, RigidBody, GRAVITY};
pub use smoothing::{smooth_damp, smooth_damp_vec3};

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.cmple(max).all());
        Self { min, max }
    }

    /// Create an AABB from its centre and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Centre point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Tests intersection with another AABB.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Closest point inside the box to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Tests intersection with a sphere.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.closest_point(center).distance_squared(center) <= radius * radius
    }

    /// Slab test against a ray.
    ///
    /// Returns the entry distance and the outward normal of the entered face.
    /// A ray starting inside the box reports the exit face instead.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<(f32, Vec3)> {
        let inv = ray.direction.recip();
        let t1 = (self.min - ray.origin) * inv;
        let t2 = (self.max - ray.origin) * inv;
        let near = t1.min(t2);
        let far = t1.max(t2);

        let tmin = near.max_element();
        let tmax = far.min_element();

        // Entire box behind the origin, or the slabs never overlap.
        if tmax < 0.0 || tmin > tmax {
            return None;
        }

        if tmin >= 0.0 {
            Some((tmin, face_normal(near, tmin, ray.direction, -1.0)))
        } else {
            Some((tmax, face_normal(far, tmax, ray.direction, 1.0)))
        }
    }
}

fn face_normal(slabs: Vec3, t: f32, direction: Vec3, sign: f32) -> Vec3 {
    let axis = if slabs.x == t {
        Vec3::X
    } else if slabs.y == t {
        Vec3::Y
    } else {
        Vec3::Z
    };
    // Entering faces oppose the ray; exit faces follow it.
    axis * direction.dot(axis).signum() * sign
}

/// Half-line used for scene queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalising `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at `distance` along the ray.
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Result of a ray query against scene colliders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Object owning the collider that was hit.
    pub object: ObjectId,
    /// World-space hit point.
    pub point: Vec3,
    /// Unit surface normal at the hit point.
    pub normal: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
}

/// Geometry queries a scene must answer.
pub trait PhysicsQuery {
    /// Closest enabled collider on `mask` hit by `ray` within `max_distance`.
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit>;

    /// Objects on `mask` whose enabled colliders touch the sphere.
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<ObjectId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_intersection() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(0.5), Vec3::splat(1.5));
        let c = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn ray_hits_front_face_with_outward_normal() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0));
        let (t, normal) = aabb.ray_intersection(&ray).expect("hit");
        assert!((t - 1.5).abs() < 1e-5);
        assert_eq!(normal, Vec3::Z);
    }

    #[test]
    fn ray_from_above_reports_up_normal() {
        let floor = Aabb::new(Vec3::new(-5.0, -0.1, -5.0), Vec3::new(5.0, 0.0, 5.0));
        let ray = Ray::new(Vec3::new(1.0, 3.0, 1.0), Vec3::NEG_Y);
        let (t, normal) = floor.ray_intersection(&ray).expect("hit");
        assert!((t - 3.0).abs() < 1e-5);
        assert_eq!(normal, Vec3::Y);
    }

    #[test]
    fn ray_missing_or_behind_returns_none() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let miss = Ray::new(Vec3::new(2.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(aabb.ray_intersection(&miss).is_none());
        let behind = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::Z);
        assert!(aabb.ray_intersection(&behind).is_none());
    }

    #[test]
    fn sphere_overlap_uses_closest_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.intersects_sphere(Vec3::new(1.5, 0.5, 0.5), 0.6));
        assert!(!aabb.intersects_sphere(Vec3::new(2.0, 2.0, 2.0), 0.5));
    }

    #[test]
    fn ray_at_walks_the_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(ray.at(3.0), Vec3::new(0.0, 0.0, -3.0));
    }
}
