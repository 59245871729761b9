#![warn(missing_docs)]
//! In-memory scene: objects, colliders, bodies, material instances and prefabs.
//!
//! [`Scene`] is the reference implementation of the [`SceneWorld`] surface the
//! interaction systems are written against. Colliders are axis-aligned boxes
//! (object rotation is ignored for collision), which is enough for rooms made
//! of furniture-sized props.

mod material;
mod object;
mod scene;

use roomkit_core::{MaterialId, ObjectId, PrefabId, Rgba, Transform};
use roomkit_physics::{PhysicsQuery, RigidBody};

pub use material::{HighlighterId, Material, MaterialError};
pub use object::{Collider, Prefab, Renderer, SceneObject};
pub use scene::Scene;

/// Instantiates and destroys objects from templates.
pub trait ObjectFactory {
    /// Look up a prefab by its registry key.
    fn prefab(&self, key: &str) -> Option<PrefabId>;

    /// Display name of a prefab.
    fn prefab_name(&self, prefab: PrefabId) -> Option<&str>;

    /// Create a fresh instance (with its own material instances).
    fn instantiate(&mut self, prefab: PrefabId) -> Option<ObjectId>;

    /// Remove an object and its materials. Returns false if it was already gone.
    fn destroy(&mut self, object: ObjectId) -> bool;
}

/// Everything the interaction systems read or mutate on scene objects.
pub trait SceneWorld: PhysicsQuery + ObjectFactory {
    /// Whether the object is still alive.
    fn contains(&self, object: ObjectId) -> bool;

    /// Object name, for logs.
    fn name(&self, object: ObjectId) -> Option<&str>;

    /// World pose of the object.
    fn transform(&self, object: ObjectId) -> Option<&Transform>;

    /// Mutable world pose of the object.
    fn transform_mut(&mut self, object: ObjectId) -> Option<&mut Transform>;

    /// Rigid body, if the object has one.
    fn body(&self, object: ObjectId) -> Option<&RigidBody>;

    /// Mutable rigid body, if the object has one.
    fn body_mut(&mut self, object: ObjectId) -> Option<&mut RigidBody>;

    /// Enable or disable the object's collider. Returns false without a collider.
    fn set_collider_enabled(&mut self, object: ObjectId, enabled: bool) -> bool;

    /// Whether the object's collider is enabled, if it has one.
    fn collider_enabled(&self, object: ObjectId) -> Option<bool>;

    /// Every material on every renderer of the object, renderer order first.
    fn materials(&self, object: ObjectId) -> Vec<MaterialId>;

    /// Current colour of a material.
    fn material_color(&self, material: MaterialId) -> Option<Rgba>;

    /// Current highlight owner of a material.
    fn material_owner(&self, material: MaterialId) -> Option<HighlighterId>;

    /// Take exclusive write access to a material's colour.
    fn claim_material(
        &mut self,
        material: MaterialId,
        owner: HighlighterId,
    ) -> Result<(), MaterialError>;

    /// Give up write access. Releasing a claim held by someone else is ignored.
    fn release_material(&mut self, material: MaterialId, owner: HighlighterId);

    /// Write a colour; the writer must hold the claim.
    fn write_material(
        &mut self,
        material: MaterialId,
        owner: HighlighterId,
        color: Rgba,
    ) -> Result<(), MaterialError>;

    /// Advance rigid bodies by one fixed physics step.
    fn simulate(&mut self, dt: f32);
}
