use crate::config::InteractionConfig;
use crate::demo;
use crate::scripted_input::ScriptedInputPlayer;
use anyhow::Result;
use glam::Vec3;
use roomkit_camera::Camera;
use roomkit_core::{FrameTick, ObjectId};
use roomkit_input::{InputProcessor, InputState};
use roomkit_interaction::{
    DragController, GrabEvent, InteractionRig, PlacementEvent, PlacementWorkflow, RigEvent,
    Targeting,
};
use roomkit_scene::{Scene, SceneWorld};
use roomkit_testkit::{EventRecord, EventSink};
use roomkit_ui::HudState;
use std::path::PathBuf;
use tracing::{debug, info};

/// Frames run when neither a script nor a frame count is given.
const DEFAULT_FRAMES: u64 = 300;

pub struct HeadlessConfig {
    pub interaction: InteractionConfig,
    pub scripted_input: Option<PathBuf>,
    pub max_frames: Option<u64>,
    pub dt: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub physics_steps: u64,
    pub events: usize,
    pub objects: usize,
    /// Shapes the HUD painted on the final frame.
    pub hud_shapes: usize,
}

pub fn run(cfg: HeadlessConfig, mut sink: Option<&mut dyn EventSink>) -> Result<RunSummary> {
    let drag = cfg.interaction.drag();
    let room = demo::build(&drag);
    let placement = PlacementWorkflow::new(cfg.interaction.placement(), &room.scene);
    let mut rig = InteractionRig::new(
        cfg.interaction.rig(),
        Targeting::new(cfg.interaction.targeting()),
        placement,
        DragController::new(drag),
        room.interactables,
    );
    let mut scene = room.scene;
    let processor = InputProcessor::new(cfg.interaction.bindings());

    let mut camera = Camera::new(demo::EYE);
    camera.look_at(demo::EYE + Vec3::NEG_Z);
    let mut input = InputState::new();
    input.cursor = (camera.viewport.0 as f32 * 0.5, camera.viewport.1 as f32 * 0.5);
    let mut hud = HudState::new();
    let hud_ctx = egui::Context::default();
    let mut hud_shapes = 0;

    let mut player = cfg
        .scripted_input
        .as_deref()
        .map(ScriptedInputPlayer::from_path)
        .transpose()?;
    let max_frames = match (cfg.max_frames, player.is_some()) {
        (Some(frames), _) => frames,
        (None, true) => u64::MAX,
        (None, false) => DEFAULT_FRAMES,
    };

    let mut events = 0;
    let mut last_hint: Option<String> = None;
    while rig.tick().0 < max_frames {
        if let Some(player) = player.as_mut() {
            if player.finished() {
                debug!(tick = rig.tick().0, "input script finished");
                break;
            }
            let view = player.advance(cfg.dt, &mut input);
            if let Some(target) = view.look_at {
                camera.look_at(target);
            }
            camera.rotate(view.look_delta.0, view.look_delta.1);
        }

        let frame = processor.process(&input);
        let tick = rig.tick();
        let rig_events = rig.frame(cfg.dt, &frame, &camera, Some(&mut hud), &mut scene);

        for event in &rig_events {
            let (kind, payload) = describe(event, &scene);
            info!(tick = tick.0, kind, payload = %payload, "interaction event");
            record(&mut sink, tick, kind, &payload)?;
            events += 1;
        }
        if hud.hint() != last_hint.as_deref() {
            last_hint = hud.hint().map(str::to_string);
            record(&mut sink, tick, "hint", last_hint.as_deref().unwrap_or(""))?;
        }

        hud_shapes = draw_hud(&hud_ctx, &hud, camera.viewport);
        input.begin_frame();
    }

    let summary = RunSummary {
        frames: rig.tick().0,
        physics_steps: rig.physics_steps(),
        events,
        objects: scene.len(),
        hud_shapes,
    };
    info!(?summary, "headless run complete");
    Ok(summary)
}

/// Lay the HUD out for one frame and count the shapes it painted.
fn draw_hud(ctx: &egui::Context, hud: &HudState, viewport: (u32, u32)) -> usize {
    let screen = egui::vec2(viewport.0 as f32, viewport.1 as f32);
    let raw = egui::RawInput {
        screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, screen)),
        ..Default::default()
    };
    ctx.run(raw, |ctx| hud.render(ctx)).shapes.len()
}

fn record(
    sink: &mut Option<&mut dyn EventSink>,
    tick: FrameTick,
    kind: &str,
    payload: &str,
) -> Result<()> {
    if let Some(sink) = sink.as_deref_mut() {
        sink.write(&EventRecord {
            tick,
            kind,
            payload,
        })?;
    }
    Ok(())
}

fn describe(event: &RigEvent, scene: &Scene) -> (&'static str, String) {
    let label = |id: ObjectId| format!("{} {}", scene.name(id).unwrap_or("?"), id);
    match *event {
        RigEvent::Interacted(id) => ("interact", label(id)),
        RigEvent::Placement(PlacementEvent::Selected { index, ghost }) => {
            ("selected", format!("slot {} {}", index + 1, label(ghost)))
        }
        RigEvent::Placement(PlacementEvent::Placed(id)) => {
            let position = scene.transform(id).map(|t| t.position).unwrap_or_default();
            ("placed", format!("{} at {position}", label(id)))
        }
        RigEvent::Placement(PlacementEvent::Cancelled) => ("cancelled", String::new()),
        RigEvent::Grab(GrabEvent::Grabbed(id)) => ("grab", label(id)),
        RigEvent::Grab(GrabEvent::Released(id)) => ("release", label(id)),
    }
}
