//! End-to-end frames through the interaction rig against an in-memory room.

use glam::Vec3;
use roomkit_camera::Camera;
use roomkit_core::{LayerMask, ObjectId, Rgba, Transform};
use roomkit_input::FrameInput;
use roomkit_interaction::{
    DragConfig, DragController, Draggable, GrabEvent, Hinge, HingeKind, InteractableSet,
    InteractionRig, PlacementConfig, PlacementEvent, PlacementWorkflow, RigConfig, RigEvent,
    Targeting, TargetingConfig,
};
use roomkit_physics::{BodyMode, RigidBody};
use roomkit_scene::{Collider, Prefab, Scene, SceneWorld};
use roomkit_testkit::run_scenario;
use roomkit_ui::HudState;

const DT: f32 = 1.0 / 60.0;
const CRATE_COLOR: Rgba = Rgba::rgb(0.6, 0.4, 0.2);
const CHAIR_COLOR: Rgba = Rgba::rgb(0.2, 0.5, 0.3);

struct Room {
    scene: Scene,
    hud: HudState,
    camera: Camera,
    rig: InteractionRig,
}

impl Room {
    fn frame(&mut self, input: &FrameInput) -> Vec<RigEvent> {
        self.rig
            .frame(DT, input, &self.camera, Some(&mut self.hud), &mut self.scene)
    }

    fn idle(&mut self, frames: usize) {
        for _ in 0..frames {
            self.frame(&FrameInput::default());
        }
    }

    fn position(&self, object: ObjectId) -> Vec3 {
        self.scene.transform(object).expect("object alive").position
    }
}

fn floor() -> Prefab {
    let size = Vec3::new(20.0, 0.2, 20.0);
    let layers = LayerMask::PLACEMENT | LayerMask::GROUND;
    Prefab::solid("floor", layers, size, Rgba::WHITE).with_collider(Collider {
        size,
        offset: Vec3::new(0.0, -0.1, 0.0),
        enabled: true,
    })
}

fn crate_prefab() -> Prefab {
    Prefab::solid("crate", LayerMask::INTERACTION, Vec3::splat(0.5), CRATE_COLOR)
        .with_collider(Collider::resting_cuboid(Vec3::splat(0.5)))
        .with_body(RigidBody::default())
}

fn chair_prefab() -> Prefab {
    Prefab::solid("Chair", LayerMask::INTERACTION, Vec3::splat(0.6), CHAIR_COLOR)
        .with_collider(Collider::resting_cuboid(Vec3::splat(0.6)))
        .with_body(RigidBody::default())
}

fn build_room(scene: Scene, interactables: InteractableSet, camera: Camera) -> Room {
    let placement = PlacementWorkflow::new(
        PlacementConfig {
            prefabs: vec!["chair".into()],
            names: vec!["Chair".into()],
            ..PlacementConfig::default()
        },
        &scene,
    );
    let rig = InteractionRig::new(
        RigConfig::default(),
        Targeting::new(TargetingConfig::default()),
        placement,
        DragController::new(DragConfig::default()),
        interactables,
    );
    Room {
        scene,
        hud: HudState::new(),
        camera,
        rig,
    }
}

fn base_scene() -> Scene {
    let mut scene = Scene::new();
    scene.spawn(&floor(), Transform::IDENTITY);
    scene.register_prefab("chair", chair_prefab());
    scene
}

fn interact() -> FrameInput {
    FrameInput {
        interact: true,
        ..FrameInput::default()
    }
}

#[test]
fn door_prompt_flips_open_and_back_closed() {
    let mut scene = base_scene();
    let door = scene.spawn(
        &Prefab::solid("door", LayerMask::INTERACTION, Vec3::new(1.0, 2.0, 0.1), Rgba::WHITE),
        Transform::from_position(Vec3::new(0.0, 1.0, -3.0)),
    );
    let mut interactables = InteractableSet::new();
    interactables.insert(door, Hinge::new(HingeKind::Door));
    let mut camera = Camera::new(Vec3::new(0.0, 1.7, 0.0));
    camera.look_at(Vec3::new(0.0, 1.7, -3.0));
    let room = build_room(scene, interactables, camera);

    let trace = run_scenario(
        "door",
        5,
        room,
        |tick, room| {
            let pressed = tick.0 == 1 || tick.0 == 3;
            let input = if pressed { interact() } else { FrameInput::default() };
            let events = room.frame(&input);
            if pressed {
                assert_eq!(events, vec![RigEvent::Interacted(door)]);
            } else {
                assert!(events.is_empty());
            }
        },
        |_, room| room.hud.hint().map(str::to_string),
    );

    let hints: Vec<_> = trace.frames.iter().map(|f| f.snapshot.clone()).collect();
    assert_eq!(
        hints,
        vec![
            None,
            Some("Open Door".to_string()),
            Some("Open Door".to_string()),
            Some("Close Door".to_string()),
            Some("Close Door".to_string()),
            Some("Open Door".to_string()),
        ]
    );
}

#[test]
fn placement_previews_snaps_and_confirms() {
    let mut camera = Camera::new(Vec3::new(0.0, 1.7, 0.0));
    camera.look_at(Vec3::new(0.0, 0.0, -2.0));
    let mut room = build_room(base_scene(), InteractableSet::new(), camera);
    let center = (640.0, 360.0);

    let events = room.frame(&FrameInput {
        select: Some(0),
        cursor: center,
        ..FrameInput::default()
    });
    let ghost = room.rig.placement().session().expect("placing").ghost();
    assert_eq!(
        events,
        vec![RigEvent::Placement(PlacementEvent::Selected { index: 0, ghost })]
    );
    assert_eq!(room.hud.selection(), Some("Selected: Chair"));
    assert_eq!(room.scene.colors_of(ghost), vec![Rgba::new(1.0, 0.5, 0.5, 0.75)]);

    room.frame(&FrameInput {
        cursor: center,
        ..FrameInput::default()
    });
    let snapped = room.position(ghost);
    assert!((snapped - Vec3::new(0.0, 0.05, -2.0)).length() < 1e-3, "{snapped:?}");

    let events = room.frame(&FrameInput {
        confirm: true,
        grab_pressed: true,
        cursor: center,
        ..FrameInput::default()
    });
    assert_eq!(events, vec![RigEvent::Placement(PlacementEvent::Placed(ghost))]);
    assert_eq!(room.scene.colors_of(ghost), vec![CHAIR_COLOR]);
    assert_eq!(room.scene.collider_enabled(ghost), Some(true));
    assert_eq!(room.scene.body(ghost).unwrap().mode, BodyMode::Dynamic);
    assert_eq!(room.hud.selection(), None);

    room.idle(60);
    let rested = room.position(ghost);
    assert!(rested.y.abs() < 1e-3, "placed chair should settle on the floor: {rested:?}");
}

#[test]
fn second_select_while_placing_leaves_one_ghost() {
    let mut scene = base_scene();
    let mut placement = PlacementWorkflow::new(
        PlacementConfig {
            prefabs: vec!["chair".into(), "chair".into()],
            names: vec!["Chair".into(), "Other chair".into()],
            ..PlacementConfig::default()
        },
        &scene,
    );
    let mut hud = HudState::new();
    let before = scene.len();

    placement.select(0, &mut scene, Some(&mut hud));
    let first = placement.session().unwrap().ghost();
    placement.select(1, &mut scene, Some(&mut hud));
    let second = placement.session().unwrap().ghost();

    assert_ne!(first, second);
    assert!(!scene.contains(first));
    assert_eq!(scene.len(), before + 1);
    assert_eq!(hud.selection(), Some("Selected: Other chair"));
}

#[test]
fn idle_confirm_and_cancel_do_nothing() {
    let camera = Camera::new(Vec3::new(0.0, 1.7, 0.0));
    let mut room = build_room(base_scene(), InteractableSet::new(), camera);
    let before = room.scene.len();

    let events = room.frame(&FrameInput {
        confirm: true,
        cancel: true,
        ..FrameInput::default()
    });
    assert!(events.is_empty());
    assert!(!room.rig.placement().is_placing());
    assert_eq!(room.scene.len(), before);
}

#[test]
fn cancel_removes_ghost_through_the_rig() {
    let camera = Camera::new(Vec3::new(0.0, 1.7, 0.0));
    let mut room = build_room(base_scene(), InteractableSet::new(), camera);
    let before = room.scene.len();

    room.frame(&FrameInput {
        select: Some(0),
        ..FrameInput::default()
    });
    let events = room.frame(&FrameInput {
        cancel: true,
        ..FrameInput::default()
    });
    assert_eq!(events, vec![RigEvent::Placement(PlacementEvent::Cancelled)]);
    assert_eq!(room.scene.len(), before);
    assert_eq!(room.hud.selection(), None);
}

fn drag_room() -> (Room, ObjectId) {
    let mut scene = base_scene();
    let start = Transform::from_position(Vec3::new(0.0, 0.0, -2.0));
    let crate_id = scene.spawn(&crate_prefab(), start);
    let mut interactables = InteractableSet::new();
    interactables.insert_draggable(Draggable::new(crate_id, DragConfig::default()));
    // Eye exactly 2.0 from the crate origin.
    let mut camera = Camera::new(Vec3::new(0.0, 1.2, -0.4));
    camera.look_at(Vec3::new(0.0, 0.25, -2.0));
    (build_room(scene, interactables, camera), crate_id)
}

fn distance_press(farther: bool) -> FrameInput {
    let mut input = FrameInput::default();
    if farther {
        input.pressed.farther = true;
        input.released.farther = true;
    } else {
        input.pressed.closer = true;
        input.released.closer = true;
    }
    input
}

#[test]
fn interact_picks_up_and_distance_steps_are_clamped() {
    let (mut room, crate_id) = drag_room();
    room.frame(&FrameInput::default());
    assert_eq!(room.hud.hint(), Some("Click to pick up"));

    let events = room.frame(&interact());
    assert_eq!(events, vec![RigEvent::Interacted(crate_id)]);
    let held = room.rig.interactables().draggable(crate_id).unwrap();
    assert!(held.is_held());
    assert!((held.hold_distance() - 2.0).abs() < 1e-4);
    assert_eq!(room.scene.body(crate_id).unwrap().mode, BodyMode::Kinematic);

    room.frame(&distance_press(true));
    room.frame(&distance_press(true));
    let distance = room.rig.interactables().draggable(crate_id).unwrap().hold_distance();
    assert!((distance - 2.5).abs() < 1e-4, "hold distance {distance}");

    for _ in 0..60 {
        room.frame(&distance_press(true));
    }
    let distance = room.rig.interactables().draggable(crate_id).unwrap().hold_distance();
    assert_eq!(distance, 10.0);

    for _ in 0..60 {
        room.frame(&distance_press(false));
    }
    let distance = room.rig.interactables().draggable(crate_id).unwrap().hold_distance();
    assert_eq!(distance, 0.5);
}

#[test]
fn carried_crate_follows_view_and_falls_when_dropped() {
    let (mut room, crate_id) = drag_room();
    room.frame(&FrameInput::default());
    room.frame(&interact());
    room.frame(&distance_press(true));
    room.frame(&distance_press(true));

    room.camera.look_at(Vec3::new(0.0, 1.0, -3.0));
    room.idle(60);
    let expected = room.camera.center_ray().at(2.5);
    let carried = room.position(crate_id);
    assert!(carried.distance(expected) < 1e-2, "{carried:?} vs {expected:?}");
    assert_eq!(room.hud.hint(), Some("Click to drop | Scroll to rotate"));

    room.frame(&interact());
    let body = *room.scene.body(crate_id).unwrap();
    assert_eq!(body.mode, BodyMode::Dynamic);
    assert!(body.use_gravity);

    room.idle(120);
    let landed = room.position(crate_id);
    assert!(landed.y.abs() < 1e-3, "crate should land on the floor: {landed:?}");
}

#[test]
fn mouse_grab_is_suppressed_while_placing() {
    let (mut room, crate_id) = drag_room();
    room.frame(&FrameInput {
        select: Some(0),
        ..FrameInput::default()
    });
    let cursor = (640.0, 360.0);
    let events = room.frame(&FrameInput {
        grab_pressed: true,
        confirm: true,
        cursor,
        ..FrameInput::default()
    });
    assert!(matches!(
        events.as_slice(),
        [RigEvent::Placement(PlacementEvent::Placed(_))]
    ));
    assert!(!room.rig.interactables().draggable(crate_id).unwrap().is_held());
}

#[test]
fn mouse_grab_then_release() {
    let (mut room, crate_id) = drag_room();
    let cursor = (640.0, 360.0);
    let events = room.frame(&FrameInput {
        grab_pressed: true,
        cursor,
        ..FrameInput::default()
    });
    assert_eq!(events, vec![RigEvent::Grab(GrabEvent::Grabbed(crate_id))]);

    let events = room.frame(&FrameInput {
        grab_released: true,
        cursor,
        ..FrameInput::default()
    });
    assert_eq!(events, vec![RigEvent::Grab(GrabEvent::Released(crate_id))]);
    assert!(!room.rig.interactables().draggable(crate_id).unwrap().is_held());
}
