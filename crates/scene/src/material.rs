//! Material instances and highlight ownership.

use roomkit_core::{MaterialId, Rgba};
use thiserror::Error;

/// Token identifying one highlight writer (targeting, placement, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlighterId(pub u16);

/// A per-object material instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base colour.
    pub color: Rgba,
    pub(crate) owner: Option<HighlighterId>,
}

impl Material {
    /// New unclaimed material.
    pub fn new(color: Rgba) -> Self {
        Self { color, owner: None }
    }

    /// Current highlight owner.
    pub fn owner(&self) -> Option<HighlighterId> {
        self.owner
    }
}

/// Material access failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MaterialError {
    /// The material no longer exists.
    #[error("material {0:?} does not exist")]
    Missing(MaterialId),
    /// Another highlighter currently owns the material.
    #[error("material {material:?} is owned by highlighter {owner:?}")]
    Claimed {
        /// Material that was requested.
        material: MaterialId,
        /// Current owner.
        owner: HighlighterId,
    },
    /// A write was attempted without holding the claim.
    #[error("highlighter {writer:?} does not own material {material:?}")]
    NotOwner {
        /// Material that was written.
        material: MaterialId,
        /// Highlighter that attempted the write.
        writer: HighlighterId,
    },
}
