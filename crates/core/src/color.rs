//! Linear RGBA colour used by material instances.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Linear RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a colour from its four channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Multiply the RGB channels by `factor`, keeping alpha.
    ///
    /// Channels are not clamped so HDR materials can glow past 1.0.
    pub fn brighten(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor, self.a)
    }

    /// Build a colour from a 3 or 4 element slice (alpha defaults to 1).
    pub fn from_slice(values: &[f32]) -> Result<Self, ConfigError> {
        let in_range = values.iter().all(|v| (0.0..=1.0).contains(v));
        match values {
            [r, g, b] if in_range => Ok(Self::rgb(*r, *g, *b)),
            [r, g, b, a] if in_range => Ok(Self::new(*r, *g, *b, *a)),
            _ => Err(ConfigError::InvalidColor(format!("{values:?}"))),
        }
    }

    /// Channels as an array, handy for egui and logging.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
