//! Pick up, carry, rotate and drop physics objects.
//!
//! A held object's body is kinematic with gravity off. The frame phase moves
//! the follow target and latches manipulation keys; the fixed-step physics
//! phase smooths the object toward the target and applies latched rotation
//! and distance changes.

use glam::Vec3;
use roomkit_core::{LayerMask, ObjectId};
use roomkit_input::{FrameInput, ManipulationKeys};
use roomkit_physics::{smooth_damp_vec3, Ray};
use roomkit_scene::SceneWorld;
use tracing::{debug, info, warn};

use crate::interactable::{Actor, Interactable, InteractableSet};

/// Tuning shared by every draggable.
#[derive(Debug, Clone, PartialEq)]
pub struct DragConfig {
    /// Rotation speed in degrees per second.
    pub rotation_speed: f32,
    /// Smoothing time toward the follow target, seconds.
    pub move_smooth_time: f32,
    /// Closest hold distance.
    pub min_distance: f32,
    /// Farthest hold distance.
    pub max_distance: f32,
    /// Hold distance change per distance key press.
    pub distance_step: f32,
    /// Hold distance change per second while a distance key is held.
    pub distance_rate: f32,
    /// Reach of the mouse grab ray.
    pub grab_range: f32,
    /// Scroll magnitude below which the wheel is ignored.
    pub scroll_threshold: f32,
    /// Prompt while resting.
    pub pickup_prompt: String,
    /// Prompt while held.
    pub drop_prompt: String,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 100.0,
            move_smooth_time: 0.05,
            min_distance: 0.5,
            max_distance: 10.0,
            distance_step: 0.25,
            distance_rate: 1.0,
            grab_range: 10.0,
            scroll_threshold: 0.01,
            pickup_prompt: "Click to pick up".to_string(),
            drop_prompt: "Click to drop | Scroll to rotate".to_string(),
        }
    }
}

impl DragConfig {
    fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }
}

/// Drag state bound to one physics object.
#[derive(Debug, Clone)]
pub struct Draggable {
    object: ObjectId,
    config: DragConfig,
    held: bool,
    grabbed: bool,
    target: Vec3,
    hold_distance: f32,
    velocity: Vec3,
    latched: ManipulationKeys,
}

impl Draggable {
    /// Resting draggable for `object`.
    pub fn new(object: ObjectId, config: DragConfig) -> Self {
        let hold_distance = config.min_distance;
        Self {
            object,
            config,
            held: false,
            grabbed: false,
            target: Vec3::ZERO,
            hold_distance,
            velocity: Vec3::ZERO,
            latched: ManipulationKeys::default(),
        }
    }

    /// Object this draggable moves.
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Whether the object is being carried.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Whether the current hold started from a mouse grab.
    pub fn is_grabbed(&self) -> bool {
        self.held && self.grabbed
    }

    /// Distance from the eye the object is carried at.
    pub fn hold_distance(&self) -> f32 {
        self.hold_distance
    }

    /// Position the object is moving toward.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Manipulation keys currently latched.
    pub fn latched(&self) -> ManipulationKeys {
        self.latched
    }

    /// Start carrying the object. Returns false if it is already held or gone.
    pub fn pickup(&mut self, eye: Vec3, world: &mut dyn SceneWorld) -> bool {
        if self.held {
            return false;
        }
        let Some(position) = world.transform(self.object).map(|t| t.position) else {
            warn!(object = %self.object, "cannot pick up missing object");
            return false;
        };
        let Some(body) = world.body_mut(self.object) else {
            warn!(object = %self.object, "draggable object has no rigid body");
            return false;
        };
        body.hold();

        self.held = true;
        self.grabbed = false;
        self.hold_distance = self.config.clamp_distance(position.distance(eye));
        self.velocity = Vec3::ZERO;
        self.target = position;
        self.latched = ManipulationKeys::default();
        info!(object = %self.object, distance = self.hold_distance, "picked up");
        true
    }

    /// Hand the object back to the simulation. Returns false if it was not held.
    pub fn drop(&mut self, world: &mut dyn SceneWorld) -> bool {
        if !self.held {
            return false;
        }
        self.held = false;
        self.grabbed = false;
        self.velocity = Vec3::ZERO;
        self.latched = ManipulationKeys::default();
        if let Some(body) = world.body_mut(self.object) {
            body.release();
        }
        info!(object = %self.object, "dropped");
        true
    }

    /// Step the hold distance by `steps` increments, clamped.
    pub fn nudge_distance(&mut self, steps: i32) {
        self.hold_distance = self
            .config
            .clamp_distance(self.hold_distance + steps as f32 * self.config.distance_step);
    }

    /// Per-frame phase: latch keys, step distance, move the follow target.
    pub fn frame_update(
        &mut self,
        follow_ray: &Ray,
        frame: &FrameInput,
        dt: f32,
        world: &mut dyn SceneWorld,
    ) {
        if !self.held {
            self.latched = ManipulationKeys::default();
            return;
        }
        if !world.contains(self.object) {
            debug!(object = %self.object, "held object vanished");
            self.held = false;
            self.grabbed = false;
            return;
        }

        latch(&mut self.latched, &frame.pressed, &frame.released);
        let steps = i32::from(frame.pressed.farther) - i32::from(frame.pressed.closer);
        if steps != 0 {
            self.nudge_distance(steps);
            debug!(object = %self.object, distance = self.hold_distance, "hold distance stepped");
        }

        self.target = follow_ray.at(self.hold_distance);

        if frame.scroll.abs() > self.config.scroll_threshold {
            if let Some(transform) = world.transform_mut(self.object) {
                transform.rotate_local(Vec3::Y, frame.scroll * self.config.rotation_speed * dt);
            }
        }
    }

    /// Fixed-step phase: latched rotation and distance, then smoothing.
    pub fn physics_step(&mut self, dt: f32, world: &mut dyn SceneWorld) {
        if !self.held {
            return;
        }
        let keys = self.latched;
        let rate = self.config.distance_rate * dt;
        if keys.closer {
            self.hold_distance = self.config.clamp_distance(self.hold_distance - rate);
        }
        if keys.farther {
            self.hold_distance = self.config.clamp_distance(self.hold_distance + rate);
        }

        let Some(transform) = world.transform_mut(self.object) else {
            return;
        };
        let turn = self.config.rotation_speed * dt;
        if keys.rotate_left {
            transform.rotate_local(Vec3::Y, turn);
        }
        if keys.rotate_right {
            transform.rotate_local(Vec3::Y, -turn);
        }
        if keys.rotate_up {
            transform.rotate_local(Vec3::X, turn);
        }
        if keys.rotate_down {
            transform.rotate_local(Vec3::X, -turn);
        }

        transform.position = smooth_damp_vec3(
            transform.position,
            self.target,
            &mut self.velocity,
            self.config.move_smooth_time,
            f32::INFINITY,
            dt,
        );
    }
}

fn latch(latched: &mut ManipulationKeys, pressed: &ManipulationKeys, released: &ManipulationKeys) {
    fn apply(flag: &mut bool, pressed: bool, released: bool) {
        if pressed {
            *flag = true;
        }
        if released {
            *flag = false;
        }
    }
    apply(&mut latched.rotate_left, pressed.rotate_left, released.rotate_left);
    apply(&mut latched.rotate_right, pressed.rotate_right, released.rotate_right);
    apply(&mut latched.rotate_up, pressed.rotate_up, released.rotate_up);
    apply(&mut latched.rotate_down, pressed.rotate_down, released.rotate_down);
    apply(&mut latched.closer, pressed.closer, released.closer);
    apply(&mut latched.farther, pressed.farther, released.farther);
}

impl Interactable for Draggable {
    fn on_interact(&mut self, actor: &Actor, world: &mut dyn SceneWorld) {
        if self.held {
            self.drop(world);
        } else {
            self.pickup(actor.eye, world);
        }
    }

    fn can_interact(&self, _actor: &Actor) -> bool {
        true
    }

    fn prompt(&self, _actor: &Actor) -> String {
        if self.held {
            self.config.drop_prompt.clone()
        } else {
            self.config.pickup_prompt.clone()
        }
    }
}

/// Mouse grab transitions reported by [`DragController::frame_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabEvent {
    /// Object picked up under the cursor.
    Grabbed(ObjectId),
    /// Mouse-grabbed object released.
    Released(ObjectId),
}

/// Drives every draggable in an [`InteractableSet`] and the mouse grab path.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    config: DragConfig,
}

impl DragController {
    /// Controller using `config` for grab reach.
    pub fn new(config: DragConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Frame phase for all draggables.
    ///
    /// `cursor_ray` is the ray through the mouse cursor; mouse-grabbed
    /// objects follow it, others follow the actor's view ray. Grab presses
    /// are ignored unless `allow_grab` is set.
    #[allow(clippy::too_many_arguments)]
    pub fn frame_update(
        &self,
        set: &mut InteractableSet,
        frame: &FrameInput,
        cursor_ray: Option<&Ray>,
        actor: &Actor,
        dt: f32,
        world: &mut dyn SceneWorld,
        allow_grab: bool,
    ) -> Vec<GrabEvent> {
        let mut events = Vec::new();

        if frame.grab_pressed && allow_grab {
            if let Some(ray) = cursor_ray {
                let hit = world.raycast(ray, self.config.grab_range, LayerMask::INTERACTION);
                if let Some(hit) = hit {
                    if let Some(draggable) = set.draggable_mut(hit.object) {
                        if draggable.pickup(actor.eye, world) {
                            draggable.grabbed = true;
                            events.push(GrabEvent::Grabbed(hit.object));
                        }
                    }
                }
            }
        }

        if frame.grab_released {
            for draggable in set.draggables_mut().filter(|d| d.is_grabbed()) {
                if draggable.drop(world) {
                    events.push(GrabEvent::Released(draggable.object()));
                }
            }
        }

        for draggable in set.draggables_mut() {
            let follow = match cursor_ray {
                Some(ray) if draggable.is_grabbed() => ray,
                _ => &actor.view_ray,
            };
            draggable.frame_update(follow, frame, dt, world);
        }
        events
    }

    /// Fixed-step phase for all draggables.
    pub fn physics_step(&self, set: &mut InteractableSet, dt: f32, world: &mut dyn SceneWorld) {
        for draggable in set.draggables_mut() {
            draggable.physics_step(dt, world);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use roomkit_core::{Rgba, Transform};
    use roomkit_physics::{BodyMode, RigidBody};
    use roomkit_scene::{Collider, Prefab, Scene};

    fn crate_scene(at: Vec3) -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let prefab = Prefab::solid("crate", LayerMask::INTERACTION, Vec3::splat(0.4), Rgba::WHITE)
            .with_collider(Collider::cuboid(Vec3::splat(0.4)))
            .with_body(RigidBody::default());
        let id = scene.spawn(&prefab, Transform::from_position(at));
        (scene, id)
    }

    fn eye_actor() -> Actor {
        Actor {
            eye: Vec3::ZERO,
            view_ray: Ray::new(Vec3::ZERO, Vec3::NEG_Z),
        }
    }

    #[test]
    fn pickup_makes_body_kinematic_and_keeps_distance() {
        let (mut scene, id) = crate_scene(Vec3::new(0.0, 0.0, -2.0));
        let mut drag = Draggable::new(id, DragConfig::default());
        assert_eq!(drag.prompt(&eye_actor()), "Click to pick up");

        drag.on_interact(&eye_actor(), &mut scene);
        assert!(drag.is_held());
        assert!((drag.hold_distance() - 2.0).abs() < 1e-5);
        let body = scene.body(id).unwrap();
        assert_eq!(body.mode, BodyMode::Kinematic);
        assert!(!body.use_gravity);
        assert_eq!(drag.prompt(&eye_actor()), "Click to drop | Scroll to rotate");

        drag.on_interact(&eye_actor(), &mut scene);
        assert!(!drag.is_held());
        let body = scene.body(id).unwrap();
        assert_eq!(body.mode, BodyMode::Dynamic);
        assert!(body.use_gravity);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn pickup_distance_is_clamped() {
        let (mut scene, id) = crate_scene(Vec3::new(0.0, 0.0, -0.1));
        let mut drag = Draggable::new(id, DragConfig::default());
        drag.pickup(Vec3::ZERO, &mut scene);
        assert_eq!(drag.hold_distance(), 0.5);
    }

    #[test]
    fn pickup_without_body_is_refused() {
        let mut scene = Scene::new();
        let id = scene.spawn(
            &Prefab::solid("shelf", LayerMask::INTERACTION, Vec3::ONE, Rgba::WHITE),
            Transform::IDENTITY,
        );
        let mut drag = Draggable::new(id, DragConfig::default());
        assert!(!drag.pickup(Vec3::new(0.0, 0.0, 2.0), &mut scene));
        assert!(!drag.is_held());
    }

    #[test]
    fn held_object_converges_on_view_ray() {
        let (mut scene, id) = crate_scene(Vec3::new(1.0, 0.0, -2.0));
        let mut drag = Draggable::new(id, DragConfig::default());
        drag.pickup(Vec3::ZERO, &mut scene);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        drag.frame_update(&ray, &FrameInput::default(), 0.02, &mut scene);

        for _ in 0..100 {
            drag.physics_step(0.02, &mut scene);
        }
        let position = scene.transform(id).unwrap().position;
        let expected = ray.at(drag.hold_distance());
        assert!(position.distance(expected) < 1e-3, "{position:?} vs {expected:?}");
    }

    #[test]
    fn rotation_latches_until_release() {
        let (mut scene, id) = crate_scene(Vec3::new(0.0, 0.0, -2.0));
        let mut drag = Draggable::new(id, DragConfig::default());
        drag.pickup(Vec3::ZERO, &mut scene);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let mut press = FrameInput::default();
        press.pressed.rotate_left = true;
        drag.frame_update(&ray, &press, 0.02, &mut scene);
        assert!(drag.latched().rotate_left);

        drag.physics_step(0.5, &mut scene);
        let (axis, angle) = scene.transform(id).unwrap().rotation.to_axis_angle();
        assert!((angle.to_degrees() - 50.0).abs() < 1e-2);
        assert!((axis - Vec3::Y).length() < 1e-4);

        let mut release = FrameInput::default();
        release.released.rotate_left = true;
        drag.frame_update(&ray, &release, 0.02, &mut scene);
        assert!(!drag.latched().any());
    }

    #[test]
    fn press_while_resting_does_not_latch() {
        let (mut scene, id) = crate_scene(Vec3::new(0.0, 0.0, -2.0));
        let mut drag = Draggable::new(id, DragConfig::default());
        let mut press = FrameInput::default();
        press.pressed.rotate_up = true;
        drag.frame_update(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &press, 0.02, &mut scene);
        assert!(!drag.latched().any());
    }

    #[test]
    fn scroll_yaws_about_local_up() {
        let (mut scene, id) = crate_scene(Vec3::new(0.0, 0.0, -2.0));
        let mut drag = Draggable::new(id, DragConfig::default());
        drag.pickup(Vec3::ZERO, &mut scene);
        let frame = FrameInput {
            scroll: 1.0,
            ..FrameInput::default()
        };
        drag.frame_update(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &frame, 0.1, &mut scene);
        let (_, angle) = scene.transform(id).unwrap().rotation.to_axis_angle();
        assert!((angle.to_degrees() - 10.0).abs() < 1e-2);

        let tiny = FrameInput {
            scroll: 0.005,
            ..FrameInput::default()
        };
        let before = scene.transform(id).unwrap().rotation;
        drag.frame_update(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), &tiny, 0.1, &mut scene);
        assert_eq!(scene.transform(id).unwrap().rotation, before);
    }

    #[test]
    fn mouse_grab_picks_up_under_cursor_and_release_drops() {
        let (mut scene, id) = crate_scene(Vec3::new(0.0, 0.0, -3.0));
        let mut set = InteractableSet::new();
        set.insert_draggable(Draggable::new(id, DragConfig::default()));
        let controller = DragController::default();
        let actor = eye_actor();
        let cursor = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let press = FrameInput {
            grab_pressed: true,
            ..FrameInput::default()
        };
        let cursor = Some(&cursor);
        let events =
            controller.frame_update(&mut set, &press, cursor, &actor, 0.02, &mut scene, true);
        assert_eq!(events, vec![GrabEvent::Grabbed(id)]);
        assert!(set.draggable(id).unwrap().is_grabbed());

        let release = FrameInput {
            grab_released: true,
            ..FrameInput::default()
        };
        let events =
            controller.frame_update(&mut set, &release, cursor, &actor, 0.02, &mut scene, true);
        assert_eq!(events, vec![GrabEvent::Released(id)]);
        assert!(!set.draggable(id).unwrap().is_held());
    }

    #[test]
    fn grab_is_ignored_when_not_allowed() {
        let (mut scene, id) = crate_scene(Vec3::new(0.0, 0.0, -3.0));
        let mut set = InteractableSet::new();
        set.insert_draggable(Draggable::new(id, DragConfig::default()));
        let press = FrameInput {
            grab_pressed: true,
            ..FrameInput::default()
        };
        let cursor = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let events = DragController::default().frame_update(
            &mut set,
            &press,
            Some(&cursor),
            &eye_actor(),
            0.02,
            &mut scene,
            false,
        );
        assert!(events.is_empty());
        assert!(!set.draggable(id).unwrap().is_held());
    }

    #[test]
    fn release_leaves_key_pickups_alone() {
        let (mut scene, id) = crate_scene(Vec3::new(0.0, 0.0, -3.0));
        let mut set = InteractableSet::new();
        set.insert_draggable(Draggable::new(id, DragConfig::default()));
        set.draggable_mut(id).unwrap().pickup(Vec3::ZERO, &mut scene);

        let release = FrameInput {
            grab_released: true,
            ..FrameInput::default()
        };
        DragController::default().frame_update(
            &mut set,
            &release,
            None,
            &eye_actor(),
            0.02,
            &mut scene,
            true,
        );
        assert!(set.draggable(id).unwrap().is_held());
    }

    #[derive(Debug, Clone)]
    enum Signal {
        Step(i32),
        Hold { farther: bool, seconds: f32 },
    }

    fn signal() -> impl Strategy<Value = Signal> {
        prop_oneof![
            (-20i32..20).prop_map(Signal::Step),
            (any::<bool>(), 0.0f32..5.0)
                .prop_map(|(farther, seconds)| Signal::Hold { farther, seconds }),
        ]
    }

    proptest! {
        #[test]
        fn hold_distance_stays_in_range(
            start in 0.0f32..20.0,
            signals in prop::collection::vec(signal(), 0..40),
        ) {
            let (mut scene, id) = crate_scene(Vec3::new(0.0, 0.0, -start));
            let config = DragConfig::default();
            let (min, max) = (config.min_distance, config.max_distance);
            let mut drag = Draggable::new(id, config);
            drag.pickup(Vec3::ZERO, &mut scene);
            prop_assert!(drag.hold_distance() >= min && drag.hold_distance() <= max);

            for signal in signals {
                match signal {
                    Signal::Step(steps) => drag.nudge_distance(steps),
                    Signal::Hold { farther, seconds } => {
                        drag.latched = ManipulationKeys {
                            closer: !farther,
                            farther,
                            ..ManipulationKeys::default()
                        };
                        drag.physics_step(seconds, &mut scene);
                    }
                }
                prop_assert!(drag.hold_distance() >= min && drag.hold_distance() <= max);
            }
        }
    }
}
