//! The capability every targetable object implements.

use std::collections::BTreeMap;

use glam::Vec3;
use roomkit_camera::Camera;
use roomkit_core::ObjectId;
use roomkit_physics::Ray;
use roomkit_scene::SceneWorld;

use crate::drag::Draggable;

/// The player as seen by interactables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    /// Eye position.
    pub eye: Vec3,
    /// Ray through the reticle.
    pub view_ray: Ray,
}

impl Actor {
    /// Actor looking through `camera`.
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            eye: camera.position,
            view_ray: camera.center_ray(),
        }
    }
}

/// Object-specific behaviour behind the reticle.
pub trait Interactable {
    /// Perform the object's behaviour.
    fn on_interact(&mut self, actor: &Actor, world: &mut dyn SceneWorld);

    /// Whether `actor` may interact right now.
    fn can_interact(&self, actor: &Actor) -> bool;

    /// Player-facing prompt for the current state.
    fn prompt(&self, actor: &Actor) -> String;
}

enum Entry {
    Fixture(Box<dyn Interactable>),
    Draggable(Draggable),
}

/// Interactable capabilities keyed by the scene object they are bound to.
#[derive(Default)]
pub struct InteractableSet {
    entries: BTreeMap<ObjectId, Entry>,
}

impl std::fmt::Debug for InteractableSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractableSet")
            .field("objects", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl InteractableSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a behaviour to `object`, replacing any previous binding.
    pub fn insert(&mut self, object: ObjectId, interactable: impl Interactable + 'static) {
        self.entries
            .insert(object, Entry::Fixture(Box::new(interactable)));
    }

    /// Bind a draggable to the object it moves.
    pub fn insert_draggable(&mut self, draggable: Draggable) {
        self.entries
            .insert(draggable.object(), Entry::Draggable(draggable));
    }

    /// Drop the binding for `object`.
    pub fn remove(&mut self, object: ObjectId) -> bool {
        self.entries.remove(&object).is_some()
    }

    /// Whether `object` has a binding.
    pub fn contains(&self, object: ObjectId) -> bool {
        self.entries.contains_key(&object)
    }

    /// Number of bound objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capability bound to `object`.
    pub fn get(&self, object: ObjectId) -> Option<&dyn Interactable> {
        match self.entries.get(&object)? {
            Entry::Fixture(fixture) => Some(fixture.as_ref()),
            Entry::Draggable(draggable) => Some(draggable),
        }
    }

    /// Mutable capability bound to `object`.
    pub fn get_mut(&mut self, object: ObjectId) -> Option<&mut dyn Interactable> {
        match self.entries.get_mut(&object)? {
            Entry::Fixture(fixture) => Some(fixture.as_mut()),
            Entry::Draggable(draggable) => Some(draggable),
        }
    }

    /// Draggable bound to `object`, if that is what it is.
    pub fn draggable(&self, object: ObjectId) -> Option<&Draggable> {
        match self.entries.get(&object)? {
            Entry::Draggable(draggable) => Some(draggable),
            Entry::Fixture(_) => None,
        }
    }

    /// Mutable draggable bound to `object`.
    pub fn draggable_mut(&mut self, object: ObjectId) -> Option<&mut Draggable> {
        match self.entries.get_mut(&object)? {
            Entry::Draggable(draggable) => Some(draggable),
            Entry::Fixture(_) => None,
        }
    }

    /// Every draggable, in object order.
    pub fn draggables_mut(&mut self) -> impl Iterator<Item = &mut Draggable> {
        self.entries.values_mut().filter_map(|entry| match entry {
            Entry::Draggable(draggable) => Some(draggable),
            Entry::Fixture(_) => None,
        })
    }
}
