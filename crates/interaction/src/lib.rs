#![warn(missing_docs)]
//! Reticle targeting, ghost placement and drag manipulation for first-person rooms.
//!
//! The three subsystems share the [`highlight`] cache pattern and the scene
//! query surface but never call each other; [`InteractionRig`] sequences them
//! into a per-frame phase and a fixed-step physics phase.

pub mod drag;
pub mod fixtures;
pub mod highlight;
pub mod interactable;
pub mod placement;
pub mod rig;
pub mod targeting;

pub use drag::{DragConfig, DragController, Draggable, GrabEvent};
pub use fixtures::{Hinge, HingeKind, Poster};
pub use highlight::{HighlightCache, HighlightError, HighlightSnapshot, Tint};
pub use interactable::{Actor, Interactable, InteractableSet};
pub use placement::{PlacementConfig, PlacementEvent, PlacementSession, PlacementWorkflow};
pub use rig::{InteractionRig, RigConfig, RigEvent};
pub use targeting::{TargetState, Targeting, TargetingConfig};

use roomkit_scene::HighlighterId;

/// Highlight owner token used by reticle targeting.
pub const TARGETING_HIGHLIGHTER: HighlighterId = HighlighterId(1);
/// Highlight owner token used by the placement ghost tint.
pub const PLACEMENT_HIGHLIGHTER: HighlighterId = HighlighterId(2);
