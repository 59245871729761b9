#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod color;
pub mod layers;
pub mod transform;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// Re-export commonly used types
pub use color::Rgba;
pub use layers::LayerMask;
pub use transform::Transform;

/// Handle to a live scene object.
///
/// Handles are never reused within one scene, so a stale handle simply fails
/// lookups once its object is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a material instance owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// Handle to an object template in the scene's prefab library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefabId(pub u32);

/// Frame counter advanced once per rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameTick(pub u64);

impl FrameTick {
    /// First frame of any session.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` frames.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Setup problems detected while wiring subsystems together.
///
/// None of these are fatal: callers log them and degrade to a no-op.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A layer name that is not one of the known collision layers.
    #[error("unknown layer name '{0}'")]
    UnknownLayer(String),
    /// A colour that could not be parsed from configuration.
    #[error("invalid colour '{0}': expected 3 or 4 components in 0..=1")]
    InvalidColor(String),
    /// A prefab key that the scene's prefab library does not contain.
    #[error("prefab '{0}' is not registered")]
    MissingPrefab(String),
    /// A numeric range whose bounds are reversed or not finite.
    #[error("invalid range for {name}: [{min}, {max}]")]
    InvalidRange {
        /// Setting the range belongs to.
        name: &'static str,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
}
