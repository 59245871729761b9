//! A small furnished room used by the headless runner.

use glam::Vec3;
use roomkit_core::{LayerMask, ObjectId, Rgba, Transform};
use roomkit_interaction::{DragConfig, Draggable, Hinge, HingeKind, InteractableSet, Poster};
use roomkit_physics::RigidBody;
use roomkit_scene::{Collider, Prefab, Scene};

pub const EYE: Vec3 = Vec3::new(0.0, 1.7, 0.0);

pub struct DemoRoom {
    pub scene: Scene,
    pub interactables: InteractableSet,
    pub crates: Vec<ObjectId>,
}

fn prop(name: &str, size: Vec3, color: Rgba) -> Prefab {
    Prefab::solid(name, LayerMask::INTERACTION, size, color)
}

fn surface(name: &str, size: Vec3, color: Rgba) -> Prefab {
    Prefab::solid(name, LayerMask::PLACEMENT | LayerMask::DEFAULT, size, color)
        .with_collider(Collider::resting_cuboid(size))
}

fn movable(name: &str, size: Vec3, colors: Vec<Rgba>) -> Prefab {
    Prefab {
        name: name.to_string(),
        layer: LayerMask::INTERACTION,
        collider: Some(Collider::resting_cuboid(size)),
        body: Some(RigidBody::default()),
        renderer_colors: vec![colors],
    }
}

/// Register the placeable prefabs.
fn register_prefabs(scene: &mut Scene) {
    scene.register_prefab(
        "chair",
        movable("Chair", Vec3::new(0.5, 0.9, 0.5), vec![Rgba::rgb(0.55, 0.35, 0.2)]),
    );
    scene.register_prefab(
        "lamp",
        movable("Lamp", Vec3::new(0.3, 1.4, 0.3), vec![Rgba::rgb(0.9, 0.9, 0.8)])
            .with_renderer(vec![Rgba::new(1.0, 0.95, 0.6, 0.8)]),
    );
    scene.register_prefab(
        "plant",
        movable(
            "Potted plant",
            Vec3::new(0.4, 0.7, 0.4),
            vec![Rgba::rgb(0.6, 0.3, 0.2), Rgba::rgb(0.2, 0.6, 0.25)],
        ),
    );
}

pub fn build(drag: &DragConfig) -> DemoRoom {
    let mut scene = Scene::new();
    register_prefabs(&mut scene);

    let floor_size = Vec3::new(10.0, 0.2, 10.0);
    let floor_layers = LayerMask::PLACEMENT | LayerMask::GROUND;
    let floor = Prefab::solid("floor", floor_layers, floor_size, Rgba::rgb(0.45, 0.4, 0.35))
        .with_collider(Collider {
            size: floor_size,
            offset: Vec3::new(0.0, -0.1, 0.0),
            enabled: true,
        });
    scene.spawn(&floor, Transform::IDENTITY);
    scene.spawn(
        &surface("table", Vec3::new(1.2, 0.8, 0.8), Rgba::rgb(0.5, 0.3, 0.15)),
        Transform::from_position(Vec3::new(2.5, 0.0, -2.0)),
    );

    let mut interactables = InteractableSet::new();
    let fixtures = [
        ("door", HingeKind::Door, Vec3::new(1.0, 2.1, 0.1), Vec3::new(0.0, 1.05, -4.9)),
        ("drawer", HingeKind::Drawer, Vec3::new(0.6, 0.3, 0.5), Vec3::new(-2.0, 0.6, -3.0)),
        ("cupboard", HingeKind::Cupboard, Vec3::new(0.8, 1.8, 0.5), Vec3::new(-4.0, 0.9, -1.0)),
        ("toilet", HingeKind::ToiletSeat, Vec3::new(0.5, 0.45, 0.7), Vec3::new(3.5, 0.225, 2.5)),
    ];
    for (name, kind, size, position) in fixtures {
        let id = scene.spawn(
            &prop(name, size, Rgba::rgb(0.7, 0.7, 0.7)),
            Transform::from_position(position),
        );
        interactables.insert(id, Hinge::new(kind));
    }

    let poster = scene.spawn(
        &prop("poster", Vec3::new(0.05, 0.9, 0.6), Rgba::WHITE),
        Transform::from_position(Vec3::new(-4.95, 1.6, 1.0)),
    );
    interactables.insert(poster, Poster::new());

    let crate_prefab = movable("crate", Vec3::splat(0.5), vec![Rgba::rgb(0.6, 0.45, 0.25)]);
    let crates = [Vec3::new(0.0, 0.0, -2.0), Vec3::new(-1.0, 0.0, -1.5)]
        .into_iter()
        .map(|position| {
            let id = scene.spawn(&crate_prefab, Transform::from_position(position));
            interactables.insert_draggable(Draggable::new(id, drag.clone()));
            id
        })
        .collect();

    DemoRoom {
        scene,
        interactables,
        crates,
    }
}
