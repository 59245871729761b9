//! Per-frame sequencing of placement, targeting and dragging, plus the
//! fixed-step physics phase.

use glam::Vec2;
use roomkit_camera::CameraProvider;
use roomkit_core::{FrameTick, ObjectId};
use roomkit_input::FrameInput;
use roomkit_scene::SceneWorld;
use roomkit_ui::HintSink;
use tracing::{debug, trace};

use crate::drag::{DragController, GrabEvent};
use crate::interactable::{Actor, InteractableSet};
use crate::placement::{PlacementEvent, PlacementWorkflow};
use crate::targeting::Targeting;

/// Fixed-step timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigConfig {
    /// Physics step length in seconds.
    pub fixed_dt: f32,
    /// Most physics steps run in one frame; leftover time is dropped.
    pub max_steps: u32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 50.0,
            max_steps: 8,
        }
    }
}

/// Something observable that happened during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigEvent {
    /// The reticle target handled an interact.
    Interacted(ObjectId),
    /// Placement state changed.
    Placement(PlacementEvent),
    /// Mouse grab state changed.
    Grab(GrabEvent),
}

/// Owns the interaction subsystems and runs them in order each frame.
#[derive(Debug)]
pub struct InteractionRig {
    config: RigConfig,
    targeting: Targeting,
    placement: PlacementWorkflow,
    drag: DragController,
    interactables: InteractableSet,
    accumulator: f32,
    tick: FrameTick,
    physics_steps: u64,
}

impl InteractionRig {
    /// Assemble a rig from its subsystems.
    pub fn new(
        config: RigConfig,
        targeting: Targeting,
        placement: PlacementWorkflow,
        drag: DragController,
        interactables: InteractableSet,
    ) -> Self {
        Self {
            config,
            targeting,
            placement,
            drag,
            interactables,
            accumulator: 0.0,
            tick: FrameTick::ZERO,
            physics_steps: 0,
        }
    }

    /// Reticle targeting.
    pub fn targeting(&self) -> &Targeting {
        &self.targeting
    }

    /// Placement workflow.
    pub fn placement(&self) -> &PlacementWorkflow {
        &self.placement
    }

    /// Bound interactables.
    pub fn interactables(&self) -> &InteractableSet {
        &self.interactables
    }

    /// Bound interactables, for adding or removing bindings.
    pub fn interactables_mut(&mut self) -> &mut InteractableSet {
        &mut self.interactables
    }

    /// Frames run so far.
    pub fn tick(&self) -> FrameTick {
        self.tick
    }

    /// Physics steps run so far.
    pub fn physics_steps(&self) -> u64 {
        self.physics_steps
    }

    /// Run one frame of `dt` seconds.
    ///
    /// Placement goes first so a confirm click is never also a grab, then
    /// targeting and interact, then dragging, then as many fixed physics
    /// steps as the accumulated time allows.
    pub fn frame(
        &mut self,
        dt: f32,
        input: &FrameInput,
        camera: &dyn CameraProvider,
        mut hud: Option<&mut (dyn HintSink + '_)>,
        world: &mut dyn SceneWorld,
    ) -> Vec<RigEvent> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut events = Vec::new();

        let was_placing = self.placement.is_placing();
        if let Some(event) = self
            .placement
            .update(input, camera, world, hud.as_deref_mut())
        {
            events.push(RigEvent::Placement(event));
        }

        self.targeting
            .tick(camera, hud.as_deref_mut(), &self.interactables, world);

        if let Some(camera) = camera.camera() {
            let actor = Actor::from_camera(camera);
            if input.interact {
                if let Some(object) = self
                    .targeting
                    .interact(&actor, &mut self.interactables, world)
                {
                    events.push(RigEvent::Interacted(object));
                }
            }

            let cursor_ray =
                camera.screen_point_to_ray(Vec2::new(input.cursor.0, input.cursor.1));
            let allow_grab = !was_placing && !self.placement.is_placing();
            let grabs = self.drag.frame_update(
                &mut self.interactables,
                input,
                Some(&cursor_ray),
                &actor,
                dt,
                world,
                allow_grab,
            );
            events.extend(grabs.into_iter().map(RigEvent::Grab));
        }

        let steps = self.run_physics(dt, world);
        self.tick = self.tick.advance(1);
        trace!(tick = self.tick.0, steps, "frame complete");
        events
    }

    fn run_physics(&mut self, dt: f32, world: &mut dyn SceneWorld) -> u32 {
        let fixed_dt = self.config.fixed_dt;
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= fixed_dt && steps < self.config.max_steps {
            self.drag
                .physics_step(&mut self.interactables, fixed_dt, world);
            world.simulate(fixed_dt);
            self.accumulator -= fixed_dt;
            steps += 1;
        }
        if self.accumulator >= fixed_dt {
            debug!(
                dropped = self.accumulator,
                max_steps = self.config.max_steps,
                "physics fell behind; dropping time"
            );
            self.accumulator = 0.0;
        }
        self.physics_steps += u64::from(steps);
        steps
    }
}
