use std::collections::{BTreeMap, HashMap};

use glam::Vec3;
use roomkit_core::{LayerMask, MaterialId, ObjectId, PrefabId, Rgba, Transform};
use roomkit_physics::{Aabb, PhysicsQuery, Ray, RayHit, RigidBody, GRAVITY};
use tracing::debug;

use crate::material::{HighlighterId, Material, MaterialError};
use crate::object::{Prefab, Renderer, SceneObject};
use crate::{ObjectFactory, SceneWorld};

/// Contact tolerance when settling falling bodies onto supports.
const CONTACT_EPSILON: f32 = 1e-3;

/// In-memory scene with deterministic (id-ordered) iteration.
#[derive(Debug, Default)]
pub struct Scene {
    objects: BTreeMap<ObjectId, SceneObject>,
    materials: BTreeMap<MaterialId, Material>,
    prefabs: Vec<(String, Prefab)>,
    prefab_keys: HashMap<String, PrefabId>,
    next_object: u64,
    next_material: u32,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under `key`, replacing any previous one.
    pub fn register_prefab(&mut self, key: impl Into<String>, prefab: Prefab) -> PrefabId {
        let key = key.into();
        if let Some(&id) = self.prefab_keys.get(&key) {
            self.prefabs[id.0 as usize].1 = prefab;
            return id;
        }
        let id = PrefabId(self.prefabs.len() as u32);
        self.prefabs.push((key.clone(), prefab));
        self.prefab_keys.insert(key, id);
        id
    }

    /// Spawn an object from a template at `transform`.
    pub fn spawn(&mut self, prefab: &Prefab, transform: Transform) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;

        let renderers = prefab
            .renderer_colors
            .iter()
            .map(|colors| Renderer {
                materials: colors.iter().map(|&c| self.alloc_material(c)).collect(),
            })
            .collect();

        self.objects.insert(
            id,
            SceneObject {
                name: prefab.name.clone(),
                transform,
                layer: prefab.layer,
                collider: prefab.collider,
                body: prefab.body,
                renderers,
            },
        );
        debug!(object = %id, name = %prefab.name, "spawned object");
        id
    }

    fn alloc_material(&mut self, color: Rgba) -> MaterialId {
        let id = MaterialId(self.next_material);
        self.next_material += 1;
        self.materials.insert(id, Material::new(color));
        id
    }

    /// Borrow an object.
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Mutably borrow an object.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    /// Ids of live objects in creation order.
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Colours of every material on an object, in capture order.
    pub fn colors_of(&self, id: ObjectId) -> Vec<Rgba> {
        self.materials(id)
            .into_iter()
            .filter_map(|m| self.material_color(m))
            .collect()
    }

    /// World bounds of an object's enabled collider.
    pub fn bounds(&self, id: ObjectId) -> Option<Aabb> {
        let object = self.objects.get(&id)?;
        let collider = object.collider.filter(|c| c.enabled)?;
        Some(collider.world_bounds(&object.transform))
    }

    /// Advance the simulation by one fixed step.
    ///
    /// Dynamic bodies accelerate under gravity and come to rest on top of any
    /// enabled collider they land on.
    pub fn step(&mut self, dt: f32) {
        let ids: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, o)| o.body.is_some_and(|b| b.is_simulated()))
            .map(|(id, _)| *id)
            .collect();

        for id in ids {
            let Some(object) = self.objects.get_mut(&id) else {
                continue;
            };
            let Some(body) = object.body.as_mut() else {
                continue;
            };
            if body.use_gravity {
                body.velocity += GRAVITY * dt;
            }
            let before = object.transform.position;
            object.transform.position += body.velocity * dt;
            let velocity = body.velocity;

            if velocity.y < 0.0 {
                self.settle(id, before);
            }
        }
    }

    /// Rest a falling body on the highest support it crossed this step.
    fn settle(&mut self, id: ObjectId, before: Vec3) {
        let Some(object) = self.objects.get(&id) else {
            return;
        };
        let Some(collider) = object.collider.filter(|c| c.enabled) else {
            return;
        };
        let bounds = collider.world_bounds(&object.transform);
        let previous_bottom = bounds.min.y + (before.y - object.transform.position.y);

        let support = self
            .objects
            .iter()
            .filter(|(other, _)| **other != id)
            .filter_map(|(_, o)| {
                o.collider
                    .filter(|c| c.enabled)
                    .map(|c| c.world_bounds(&o.transform))
            })
            .filter(|other| other.intersects(&bounds))
            .filter(|other| previous_bottom >= other.max.y - CONTACT_EPSILON)
            .map(|other| other.max.y)
            .fold(None, |best: Option<f32>, top| Some(best.map_or(top, |b| b.max(top))));

        if let Some(top) = support {
            if let Some(object) = self.objects.get_mut(&id) {
                object.transform.position.y += top - bounds.min.y;
                if let Some(body) = object.body.as_mut() {
                    body.velocity = Vec3::ZERO;
                }
            }
        }
    }
}

impl PhysicsQuery for Scene {
    fn raycast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for (id, object) in &self.objects {
            if !object.layer.intersects(mask) {
                continue;
            }
            let Some(collider) = object.collider.filter(|c| c.enabled) else {
                continue;
            };
            let bounds = collider.world_bounds(&object.transform);
            if let Some((distance, normal)) = bounds.ray_intersection(ray) {
                if distance > max_distance {
                    continue;
                }
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(RayHit {
                        object: *id,
                        point: ray.at(distance),
                        normal,
                        distance,
                    });
                }
            }
        }
        best
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, o)| o.layer.intersects(mask))
            .filter(|(_, o)| {
                o.collider
                    .filter(|c| c.enabled)
                    .is_some_and(|c| c.world_bounds(&o.transform).intersects_sphere(center, radius))
            })
            .map(|(id, _)| *id)
            .collect()
    }
}

impl ObjectFactory for Scene {
    fn prefab(&self, key: &str) -> Option<PrefabId> {
        self.prefab_keys.get(key).copied()
    }

    fn prefab_name(&self, prefab: PrefabId) -> Option<&str> {
        self.prefabs
            .get(prefab.0 as usize)
            .map(|(_, p)| p.name.as_str())
    }

    fn instantiate(&mut self, prefab: PrefabId) -> Option<ObjectId> {
        let template = self.prefabs.get(prefab.0 as usize)?.1.clone();
        Some(self.spawn(&template, Transform::IDENTITY))
    }

    fn destroy(&mut self, object: ObjectId) -> bool {
        let Some(removed) = self.objects.remove(&object) else {
            return false;
        };
        for renderer in &removed.renderers {
            for material in &renderer.materials {
                self.materials.remove(material);
            }
        }
        debug!(object = %object, name = %removed.name, "destroyed object");
        true
    }
}

impl SceneWorld for Scene {
    fn contains(&self, object: ObjectId) -> bool {
        self.objects.contains_key(&object)
    }

    fn name(&self, object: ObjectId) -> Option<&str> {
        self.objects.get(&object).map(|o| o.name.as_str())
    }

    fn transform(&self, object: ObjectId) -> Option<&Transform> {
        self.objects.get(&object).map(|o| &o.transform)
    }

    fn transform_mut(&mut self, object: ObjectId) -> Option<&mut Transform> {
        self.objects.get_mut(&object).map(|o| &mut o.transform)
    }

    fn body(&self, object: ObjectId) -> Option<&RigidBody> {
        self.objects.get(&object)?.body.as_ref()
    }

    fn body_mut(&mut self, object: ObjectId) -> Option<&mut RigidBody> {
        self.objects.get_mut(&object)?.body.as_mut()
    }

    fn set_collider_enabled(&mut self, object: ObjectId, enabled: bool) -> bool {
        match self.objects.get_mut(&object).and_then(|o| o.collider.as_mut()) {
            Some(collider) => {
                collider.enabled = enabled;
                true
            }
            None => false,
        }
    }

    fn collider_enabled(&self, object: ObjectId) -> Option<bool> {
        self.objects.get(&object)?.collider.map(|c| c.enabled)
    }

    fn materials(&self, object: ObjectId) -> Vec<MaterialId> {
        self.objects
            .get(&object)
            .map(|o| {
                o.renderers
                    .iter()
                    .flat_map(|r| r.materials.iter().copied())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn material_color(&self, material: MaterialId) -> Option<Rgba> {
        self.materials.get(&material).map(|m| m.color)
    }

    fn material_owner(&self, material: MaterialId) -> Option<HighlighterId> {
        self.materials.get(&material)?.owner
    }

    fn claim_material(
        &mut self,
        material: MaterialId,
        owner: HighlighterId,
    ) -> Result<(), MaterialError> {
        let entry = self
            .materials
            .get_mut(&material)
            .ok_or(MaterialError::Missing(material))?;
        match entry.owner {
            Some(current) if current != owner => Err(MaterialError::Claimed {
                material,
                owner: current,
            }),
            _ => {
                entry.owner = Some(owner);
                Ok(())
            }
        }
    }

    fn release_material(&mut self, material: MaterialId, owner: HighlighterId) {
        if let Some(entry) = self.materials.get_mut(&material) {
            if entry.owner == Some(owner) {
                entry.owner = None;
            }
        }
    }

    fn write_material(
        &mut self,
        material: MaterialId,
        owner: HighlighterId,
        color: Rgba,
    ) -> Result<(), MaterialError> {
        let entry = self
            .materials
            .get_mut(&material)
            .ok_or(MaterialError::Missing(material))?;
        if entry.owner != Some(owner) {
            return Err(MaterialError::NotOwner {
                material,
                writer: owner,
            });
        }
        entry.color = color;
        Ok(())
    }

    fn simulate(&mut self, dt: f32) {
        self.step(dt);
    }
}
