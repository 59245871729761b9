//! Scene objects and the templates they are spawned from.

use glam::Vec3;
use roomkit_core::{LayerMask, MaterialId, Rgba, Transform};
use roomkit_physics::{Aabb, RigidBody};

/// Box collider in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Full box size before scaling.
    pub size: Vec3,
    /// Box centre relative to the object origin.
    pub offset: Vec3,
    /// Disabled colliders are invisible to queries and contacts.
    pub enabled: bool,
}

impl Collider {
    /// Enabled box collider centred on the object origin.
    pub fn cuboid(size: Vec3) -> Self {
        Self {
            size,
            offset: Vec3::ZERO,
            enabled: true,
        }
    }

    /// Collider sitting on the object origin (origin at the bottom face).
    pub fn resting_cuboid(size: Vec3) -> Self {
        Self {
            size,
            offset: Vec3::new(0.0, size.y * 0.5, 0.0),
            enabled: true,
        }
    }

    /// World-space bounds for an object at `transform`.
    pub fn world_bounds(&self, transform: &Transform) -> Aabb {
        Aabb::from_center_size(
            transform.position + self.offset * transform.scale,
            self.size * transform.scale,
        )
    }
}

/// Ordered material slots of one renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Renderer {
    /// Material instances in slot order.
    pub materials: Vec<MaterialId>,
}

/// A live object in the scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Display name.
    pub name: String,
    /// World pose.
    pub transform: Transform,
    /// Layer used by query masks.
    pub layer: LayerMask,
    /// Optional box collider.
    pub collider: Option<Collider>,
    /// Optional rigid body.
    pub body: Option<RigidBody>,
    /// Renderers and their material instances.
    pub renderers: Vec<Renderer>,
}

/// Template objects are spawned from.
#[derive(Debug, Clone)]
pub struct Prefab {
    /// Name given to instances.
    pub name: String,
    /// Layer of instances.
    pub layer: LayerMask,
    /// Collider copied into instances.
    pub collider: Option<Collider>,
    /// Body copied into instances.
    pub body: Option<RigidBody>,
    /// One colour list per renderer; each entry becomes a material instance.
    pub renderer_colors: Vec<Vec<Rgba>>,
}

impl Prefab {
    /// Static prop with one single-material renderer.
    pub fn solid(name: impl Into<String>, layer: LayerMask, size: Vec3, color: Rgba) -> Self {
        Self {
            name: name.into(),
            layer,
            collider: Some(Collider::cuboid(size)),
            body: None,
            renderer_colors: vec![vec![color]],
        }
    }

    /// Add a dynamic rigid body.
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Replace the collider.
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Append another renderer with the given material colours.
    pub fn with_renderer(mut self, colors: Vec<Rgba>) -> Self {
        self.renderer_colors.push(colors);
        self
    }
}
