//! Rigid-body mode flags.

use glam::Vec3;

/// Gravitational acceleration in m/s².
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Who drives a body's motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMode {
    /// Simulated: gravity and contacts move the body.
    #[default]
    Dynamic,
    /// Moved explicitly by a controller; the simulation leaves it alone.
    Kinematic,
}

/// Simulation state of an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    /// Current motion mode.
    pub mode: BodyMode,
    /// Whether gravity accelerates the body while dynamic.
    pub use_gravity: bool,
    /// Linear velocity in m/s.
    pub velocity: Vec3,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            mode: BodyMode::Dynamic,
            use_gravity: true,
            velocity: Vec3::ZERO,
        }
    }
}

impl RigidBody {
    /// A body that never moves on its own.
    pub fn kinematic() -> Self {
        Self {
            mode: BodyMode::Kinematic,
            use_gravity: false,
            velocity: Vec3::ZERO,
        }
    }

    /// Whether the simulation integrates this body.
    pub fn is_simulated(&self) -> bool {
        self.mode == BodyMode::Dynamic
    }

    /// Hand the body to a controller: kinematic, no gravity, at rest.
    pub fn hold(&mut self) {
        self.mode = BodyMode::Kinematic;
        self.use_gravity = false;
        self.velocity = Vec3::ZERO;
    }

    /// Return the body to the simulation without imparting velocity.
    pub fn release(&mut self) {
        self.mode = BodyMode::Dynamic;
        self.use_gravity = true;
        self.velocity = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_and_release_toggle_simulation() {
        let mut body = RigidBody::default();
        body.velocity = Vec3::new(1.0, 2.0, 3.0);
        body.hold();
        assert!(!body.is_simulated());
        assert!(!body.use_gravity);
        assert_eq!(body.velocity, Vec3::ZERO);

        body.release();
        assert!(body.is_simulated());
        assert!(body.use_gravity);
        assert_eq!(body.velocity, Vec3::ZERO);
    }
}
