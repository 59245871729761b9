#![warn(missing_docs)]
//! First-person camera and view-ray construction.

use glam::{Vec2, Vec3};
use roomkit_physics::Ray;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, TAU};

/// Keeps `forward` away from the poles, where `right` degenerates.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Yaw/pitch eye used for reticle and cursor rays.
///
/// Yaw 0 looks along +X and grows toward +Z.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position.
    pub position: Vec3,
    /// Heading in radians, kept in `[0, TAU)`.
    pub yaw: f32,
    /// Elevation in radians, positive looks up.
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Viewport in pixels (width, height).
    pub viewport: (u32, u32),
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.7, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            fov: FRAC_PI_3,
            viewport: (1280, 720),
        }
    }
}

impl Camera {
    /// Camera at `position` with the default view.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize()
    }

    /// Unit right vector, always horizontal.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Unit up vector of the view.
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize()
    }

    /// Width over height; a zero-sized viewport counts as one pixel.
    pub fn aspect(&self) -> f32 {
        self.viewport.0.max(1) as f32 / self.viewport.1.max(1) as f32
    }

    /// Turn by the given angles in radians. Pitch is clamped short of straight up/down.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Face `target`. Does nothing when `target` is the eye position.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.yaw = dir.z.atan2(dir.x).rem_euclid(TAU);
        self.pitch = dir.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Ray through a normalised viewport point; (0.5, 0.5) is the centre.
    ///
    /// Viewport y grows upward, matching the reticle convention.
    pub fn viewport_point_to_ray(&self, point: Vec2) -> Ray {
        let ndc_x = point.x * 2.0 - 1.0;
        let ndc_y = point.y * 2.0 - 1.0;
        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * self.aspect();
        let direction = self.forward()
            + self.right() * (ndc_x * half_width)
            + self.up() * (ndc_y * half_height);
        Ray::new(self.position, direction)
    }

    /// Ray through the viewport centre, used for reticle targeting.
    pub fn center_ray(&self) -> Ray {
        self.viewport_point_to_ray(Vec2::splat(0.5))
    }

    /// Ray through a screen pixel; (0, 0) is the top-left corner.
    pub fn screen_point_to_ray(&self, screen: Vec2) -> Ray {
        let (width, height) = self.viewport;
        let point = Vec2::new(
            screen.x / width.max(1) as f32,
            1.0 - screen.y / height.max(1) as f32, // Flip Y
        );
        self.viewport_point_to_ray(point)
    }
}

/// Source of the active view for this frame.
pub trait CameraProvider {
    /// The camera rays are cast from, if one is active.
    fn camera(&self) -> Option<&Camera>;
}

impl CameraProvider for Camera {
    fn camera(&self) -> Option<&Camera> {
        Some(self)
    }
}

impl CameraProvider for Option<Camera> {
    fn camera(&self) -> Option<&Camera> {
        self.as_ref()
    }
}
