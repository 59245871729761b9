//! Save/restore of an object's material colours while it is highlighted or tinted.
//!
//! A cache holds at most one live [`HighlightSnapshot`]. Every material in the
//! snapshot is claimed for the cache's [`HighlighterId`] for as long as the
//! snapshot lives, so two subsystems can never tint the same material at once.

use roomkit_core::{MaterialId, ObjectId, Rgba};
use roomkit_scene::{HighlighterId, MaterialError, SceneWorld};
use thiserror::Error;
use tracing::{debug, warn};

/// How materials are recoloured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tint {
    /// Multiply RGB by a factor (targeting highlight).
    ///
    /// Alpha is kept, so translucent materials stay translucent while lit
    /// instead of turning opaque.
    Brighten(f32),
    /// Replace the colour outright (placement preview).
    Flat(Rgba),
}

impl Tint {
    fn apply_to(self, color: Rgba) -> Rgba {
        match self {
            Tint::Brighten(factor) => color.brighten(factor),
            Tint::Flat(flat) => flat,
        }
    }
}

/// Original colours captured for one object, in capture order.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightSnapshot {
    object: ObjectId,
    entries: Vec<(MaterialId, Rgba)>,
}

impl HighlightSnapshot {
    /// Object the snapshot belongs to.
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Captured `(material, original colour)` pairs.
    pub fn entries(&self) -> &[(MaterialId, Rgba)] {
        &self.entries
    }
}

/// Reasons a highlight could not be applied.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HighlightError {
    /// The object no longer exists.
    #[error("object {0} does not exist")]
    MissingObject(ObjectId),
    /// One of the object's materials is held by another highlighter.
    #[error("object {object} is already highlighted by {owner:?}")]
    Contended {
        /// Object that was requested.
        object: ObjectId,
        /// Highlighter currently holding one of its materials.
        owner: HighlighterId,
    },
}

/// Single-snapshot colour cache.
#[derive(Debug)]
pub struct HighlightCache {
    owner: HighlighterId,
    snapshot: Option<HighlightSnapshot>,
}

impl HighlightCache {
    /// Cache writing under `owner`.
    pub fn new(owner: HighlighterId) -> Self {
        Self {
            owner,
            snapshot: None,
        }
    }

    /// Object with a live snapshot.
    pub fn live_object(&self) -> Option<ObjectId> {
        self.snapshot.as_ref().map(|s| s.object)
    }

    /// The live snapshot.
    pub fn snapshot(&self) -> Option<&HighlightSnapshot> {
        self.snapshot.as_ref()
    }

    /// Capture every material colour on `object`, then recolour it.
    ///
    /// A live snapshot is restored first, whichever object it belongs to.
    /// On error nothing is modified and no snapshot is kept.
    pub fn apply(
        &mut self,
        world: &mut dyn SceneWorld,
        object: ObjectId,
        tint: Tint,
    ) -> Result<(), HighlightError> {
        if let Some(live) = self.live_object() {
            if live == object {
                debug!(object = %object, "re-applying highlight; restoring first");
            } else {
                warn!(
                    live = %live,
                    object = %object,
                    "highlight applied over a live snapshot; restoring it first"
                );
            }
            self.restore_live(world);
        }

        if !world.contains(object) {
            return Err(HighlightError::MissingObject(object));
        }

        let materials = world.materials(object);
        let mut claimed = Vec::with_capacity(materials.len());
        for material in materials {
            match world.claim_material(material, self.owner) {
                Ok(()) => claimed.push(material),
                Err(MaterialError::Claimed { owner, .. }) => {
                    for m in claimed {
                        world.release_material(m, self.owner);
                    }
                    return Err(HighlightError::Contended { object, owner });
                }
                Err(err) => debug!(object = %object, "skipping material: {err}"),
            }
        }

        let mut entries = Vec::with_capacity(claimed.len());
        for material in claimed {
            let Some(original) = world.material_color(material) else {
                continue;
            };
            entries.push((material, original));
            if let Err(err) = world.write_material(material, self.owner, tint.apply_to(original)) {
                debug!(object = %object, "tint write failed: {err}");
            }
        }

        debug!(object = %object, materials = entries.len(), ?tint, "highlight applied");
        self.snapshot = Some(HighlightSnapshot { object, entries });
        Ok(())
    }

    /// Write the captured colours of `object` back and clear the snapshot.
    ///
    /// Returns false (and does nothing) when there is no snapshot for `object`.
    pub fn restore(&mut self, world: &mut dyn SceneWorld, object: ObjectId) -> bool {
        if self.live_object() != Some(object) {
            return false;
        }
        self.restore_live(world);
        true
    }

    /// Restore whatever snapshot is live.
    pub fn restore_live(&mut self, world: &mut dyn SceneWorld) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };
        for (material, original) in &snapshot.entries {
            // Missing materials belong to destroyed objects; nothing to restore.
            let _ = world.write_material(*material, self.owner, *original);
            world.release_material(*material, self.owner);
        }
        debug!(object = %snapshot.object, "highlight restored");
    }

    /// Forget the live snapshot without restoring colours.
    ///
    /// Used when the object is about to be destroyed.
    pub fn discard(&mut self, world: &mut dyn SceneWorld) {
        if let Some(snapshot) = self.snapshot.take() {
            for (material, _) in &snapshot.entries {
                world.release_material(*material, self.owner);
            }
            debug!(object = %snapshot.object, "highlight discarded");
        }
    }
}
