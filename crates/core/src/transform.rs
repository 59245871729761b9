//! World-space pose of a scene object.

use glam::{Quat, Vec3};

/// Position, rotation and scale of a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub rotation: Quat,
    /// Per-axis scale applied to colliders.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Identity transform moved to `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Local up axis in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local right axis in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Rotate about a local axis by `degrees`.
    pub fn rotate_local(&mut self, local_axis: Vec3, degrees: f32) {
        let delta = Quat::from_axis_angle(local_axis.normalize(), degrees.to_radians());
        self.rotation = (self.rotation * delta).normalize();
    }
}
