//! Ghost placement: pick a prefab by slot, preview it under the cursor,
//! confirm it into the world or cancel it.

use glam::{Quat, Vec2, Vec3};
use roomkit_camera::CameraProvider;
use roomkit_core::{ConfigError, LayerMask, ObjectId, PrefabId, Rgba};
use roomkit_input::FrameInput;
use roomkit_physics::Ray;
use roomkit_scene::{ObjectFactory, SceneWorld};
use roomkit_ui::HintSink;
use tracing::{debug, info, warn};

use crate::highlight::{HighlightCache, Tint};
use crate::PLACEMENT_HIGHLIGHTER;

/// Placement tuning and the selectable prefab slots.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Prefab keys, one per selection slot.
    pub prefabs: Vec<String>,
    /// Display names, parallel to `prefabs`.
    pub names: Vec<String>,
    /// Layers the ghost can rest on.
    pub surface_mask: LayerMask,
    /// Lift along the surface normal.
    pub placement_offset: f32,
    /// Ghost preview colour.
    pub placement_tint: Rgba,
    /// Ghost distance along the cursor ray when nothing is hit.
    pub default_distance: f32,
    /// Reach of the cursor ray.
    pub max_ray_distance: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            prefabs: Vec::new(),
            names: Vec::new(),
            surface_mask: LayerMask::PLACEMENT,
            placement_offset: 0.05,
            placement_tint: Rgba::new(1.0, 0.5, 0.5, 0.75),
            default_distance: 1.0,
            max_ray_distance: 1000.0,
        }
    }
}

/// The live ghost of one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSession {
    index: usize,
    prefab: PrefabId,
    ghost: ObjectId,
    name: String,
}

impl PlacementSession {
    /// Selected slot.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Prefab the ghost was spawned from.
    pub fn prefab(&self) -> PrefabId {
        self.prefab
    }

    /// The preview object.
    pub fn ghost(&self) -> ObjectId {
        self.ghost
    }

    /// Display name shown in the selection label.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Outcome of a placement transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementEvent {
    /// A slot was selected and its ghost spawned.
    Selected {
        /// Slot index.
        index: usize,
        /// Ghost object.
        ghost: ObjectId,
    },
    /// The ghost became a real object.
    Placed(ObjectId),
    /// The ghost was destroyed.
    Cancelled,
}

/// Idle/placing state machine.
#[derive(Debug)]
pub struct PlacementWorkflow {
    config: PlacementConfig,
    slots: Vec<Option<PrefabId>>,
    session: Option<PlacementSession>,
    tint: HighlightCache,
}

impl PlacementWorkflow {
    /// Resolve the configured prefab keys against `factory`.
    pub fn new(config: PlacementConfig, factory: &dyn ObjectFactory) -> Self {
        if config.prefabs.len() != config.names.len() {
            warn!(
                prefabs = config.prefabs.len(),
                names = config.names.len(),
                "placement prefab and name lists differ in length"
            );
        }
        let slots = config
            .prefabs
            .iter()
            .map(|key| {
                let prefab = factory.prefab(key);
                if prefab.is_none() {
                    warn!("{}", ConfigError::MissingPrefab(key.clone()));
                }
                prefab
            })
            .collect();
        Self {
            config,
            slots,
            session: None,
            tint: HighlightCache::new(PLACEMENT_HIGHLIGHTER),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Whether a ghost is live.
    pub fn is_placing(&self) -> bool {
        self.session.is_some()
    }

    /// The live session.
    pub fn session(&self) -> Option<&PlacementSession> {
        self.session.as_ref()
    }

    /// Number of selection slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Spawn a ghost for slot `index`, cancelling any live one first.
    ///
    /// Invalid or unassigned slots are logged and leave everything as it was.
    pub fn select(
        &mut self,
        index: usize,
        world: &mut dyn SceneWorld,
        mut hud: Option<&mut (dyn HintSink + '_)>,
    ) -> Option<PlacementEvent> {
        let Some(slot) = self.slots.get(index) else {
            warn!(index, slots = self.slots.len(), "placement slot out of range");
            return None;
        };
        let Some(prefab) = *slot else {
            warn!(index, "placement slot has no prefab assigned");
            return None;
        };

        if self.is_placing() {
            self.cancel(world, hud.as_deref_mut());
        }

        let Some(ghost) = world.instantiate(prefab) else {
            warn!(index, "failed to instantiate placement prefab");
            return None;
        };
        world.set_collider_enabled(ghost, false);
        if let Some(body) = world.body_mut(ghost) {
            body.hold();
        }
        if let Err(err) = self
            .tint
            .apply(world, ghost, Tint::Flat(self.config.placement_tint))
        {
            warn!(ghost = %ghost, "ghost tint refused: {err}");
        }

        let name = self.display_name(index, prefab, world);
        if let Some(hud) = hud {
            hud.set_selection(&format!("Selected: {name}"));
        }
        info!(index, ghost = %ghost, name = %name, "placement started");
        self.session = Some(PlacementSession {
            index,
            prefab,
            ghost,
            name,
        });
        Some(PlacementEvent::Selected { index, ghost })
    }

    fn display_name(&self, index: usize, prefab: PrefabId, factory: &dyn SceneWorld) -> String {
        match self.config.names.get(index) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                let fallback = factory
                    .prefab_name(prefab)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.config.prefabs[index].clone());
                warn!(index, fallback = %fallback, "placement slot has no display name");
                fallback
            }
        }
    }

    /// Move the ghost to where `ray` meets a placement surface.
    pub fn track(&mut self, ray: &Ray, world: &mut dyn SceneWorld) {
        let Some(session) = &self.session else {
            return;
        };
        let (position, rotation) =
            match world.raycast(ray, self.config.max_ray_distance, self.config.surface_mask) {
                Some(hit) => (
                    hit.point + hit.normal * self.config.placement_offset,
                    Quat::from_rotation_arc(Vec3::Y, hit.normal),
                ),
                None => (ray.at(self.config.default_distance), Quat::IDENTITY),
            };
        if let Some(transform) = world.transform_mut(session.ghost) {
            transform.position = position;
            transform.rotation = rotation;
        }
    }

    /// Turn the ghost into a real object. No-op while idle.
    pub fn confirm(
        &mut self,
        world: &mut dyn SceneWorld,
        hud: Option<&mut (dyn HintSink + '_)>,
    ) -> Option<ObjectId> {
        let session = self.session.take()?;
        let ghost = session.ghost;
        self.tint.restore(world, ghost);
        world.set_collider_enabled(ghost, true);
        if let Some(body) = world.body_mut(ghost) {
            body.release();
        }
        if let Some(hud) = hud {
            hud.clear_selection();
        }
        let position = world.transform(ghost).map(|t| t.position);
        info!(object = %ghost, name = %session.name, ?position, "object placed");
        Some(ghost)
    }

    /// Destroy the ghost. No-op while idle.
    pub fn cancel(
        &mut self,
        world: &mut dyn SceneWorld,
        hud: Option<&mut (dyn HintSink + '_)>,
    ) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.tint.discard(world);
        world.destroy(session.ghost);
        if let Some(hud) = hud {
            hud.clear_selection();
        }
        debug!(ghost = %session.ghost, "placement cancelled");
        true
    }

    /// Per-frame phase: selection while idle, tracking and confirm/cancel while placing.
    pub fn update(
        &mut self,
        frame: &FrameInput,
        camera: &dyn CameraProvider,
        world: &mut dyn SceneWorld,
        mut hud: Option<&mut (dyn HintSink + '_)>,
    ) -> Option<PlacementEvent> {
        let Some(ghost) = self.session.as_ref().map(|s| s.ghost) else {
            let index = frame.select?;
            return self.select(index, world, hud);
        };

        if !world.contains(ghost) {
            warn!(ghost = %ghost, "placement ghost vanished; ending session");
            self.tint.discard(world);
            self.session = None;
            if let Some(hud) = hud {
                hud.clear_selection();
            }
            return Some(PlacementEvent::Cancelled);
        }

        match camera.camera() {
            Some(camera) => {
                let ray = camera.screen_point_to_ray(Vec2::new(frame.cursor.0, frame.cursor.1));
                self.track(&ray, world);
            }
            None => debug!("no camera; placement ghost not tracked"),
        }

        if frame.confirm {
            return self.confirm(world, hud).map(PlacementEvent::Placed);
        }
        if frame.cancel && self.cancel(world, hud.as_deref_mut()) {
            return Some(PlacementEvent::Cancelled);
        }
        None
    }
}
