//! Reticle targeting: highlight the interactable under the crosshair,
//! publish its prompt and dispatch the interact action.

use roomkit_camera::CameraProvider;
use roomkit_core::{LayerMask, ObjectId};
use roomkit_scene::SceneWorld;
use roomkit_ui::HintSink;
use tracing::{debug, info, warn};

use crate::highlight::{HighlightCache, Tint};
use crate::interactable::{Actor, InteractableSet};
use crate::TARGETING_HIGHLIGHTER;

/// Targeting tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetingConfig {
    /// Maximum reach of the reticle ray.
    pub range: f32,
    /// RGB multiplier applied to the target's materials.
    pub highlight_intensity: f32,
    /// Layers the reticle ray can hit.
    pub mask: LayerMask,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            range: 5.0,
            highlight_intensity: 1.5,
            mask: LayerMask::INTERACTION,
        }
    }
}

/// What the reticle is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetState {
    /// Nothing interactable under the reticle.
    #[default]
    NoTarget,
    /// This object is highlighted and receives interact.
    Targeting(ObjectId),
}

/// Reticle targeting state machine.
#[derive(Debug)]
pub struct Targeting {
    config: TargetingConfig,
    state: TargetState,
    cache: HighlightCache,
    disabled: bool,
}

impl Targeting {
    /// Targeting with `config`, starting with no target.
    pub fn new(config: TargetingConfig) -> Self {
        Self {
            config,
            state: TargetState::NoTarget,
            cache: HighlightCache::new(TARGETING_HIGHLIGHTER),
            disabled: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> TargetState {
        self.state
    }

    /// Targeted object, if any.
    pub fn target(&self) -> Option<ObjectId> {
        match self.state {
            TargetState::Targeting(object) => Some(object),
            TargetState::NoTarget => None,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &TargetingConfig {
        &self.config
    }

    /// Per-frame update: raycast, highlight and publish the prompt.
    ///
    /// Skipped while the camera or the hint sink is missing.
    pub fn tick(
        &mut self,
        camera: &dyn CameraProvider,
        hud: Option<&mut (dyn HintSink + '_)>,
        set: &InteractableSet,
        world: &mut dyn SceneWorld,
    ) {
        let (camera, hud) = match (camera.camera(), hud) {
            (Some(camera), Some(hud)) => (camera, hud),
            (camera, _) => {
                if !self.disabled {
                    let missing = if camera.is_none() { "camera" } else { "hint sink" };
                    warn!(missing, "interaction targeting disabled");
                    self.disabled = true;
                }
                return;
            }
        };
        if self.disabled {
            debug!("interaction targeting enabled");
            self.disabled = false;
        }

        let actor = Actor::from_camera(camera);
        let hit = world
            .raycast(&actor.view_ray, self.config.range, self.config.mask)
            .map(|hit| hit.object)
            .filter(|object| set.contains(*object));

        let Some(object) = hit else {
            self.clear_target(world);
            hud.clear_hint();
            return;
        };

        if self.state != TargetState::Targeting(object) {
            self.clear_target(world);
            let tint = Tint::Brighten(self.config.highlight_intensity);
            if let Err(err) = self.cache.apply(world, object, tint) {
                warn!(object = %object, "target highlight refused: {err}");
            }
            debug!(object = %object, "target acquired");
            self.state = TargetState::Targeting(object);
        }

        if let Some(interactable) = set.get(object) {
            hud.set_hint(&interactable.prompt(&actor));
        }
    }

    /// Dispatch interact to the current target if it allows it.
    ///
    /// Returns the object that handled the interaction.
    pub fn interact(
        &mut self,
        actor: &Actor,
        set: &mut InteractableSet,
        world: &mut dyn SceneWorld,
    ) -> Option<ObjectId> {
        let object = self.target()?;
        let interactable = set.get_mut(object)?;
        if !interactable.can_interact(actor) {
            debug!(object = %object, "interaction not allowed");
            return None;
        }
        interactable.on_interact(actor, world);
        info!(object = %object, "interacted");
        Some(object)
    }

    /// Drop the target, restoring its colours and clearing the hint.
    pub fn reset(&mut self, world: &mut dyn SceneWorld, hud: Option<&mut (dyn HintSink + '_)>) {
        self.clear_target(world);
        if let Some(hud) = hud {
            hud.clear_hint();
        }
    }

    fn clear_target(&mut self, world: &mut dyn SceneWorld) {
        if let TargetState::Targeting(previous) = self.state {
            self.cache.restore(world, previous);
            debug!(object = %previous, "target lost");
        }
        self.state = TargetState::NoTarget;
    }
}
