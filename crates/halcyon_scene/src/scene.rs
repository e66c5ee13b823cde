use slotmap::{SlotMap, new_key_type};

use crate::background::Background;
use crate::entity::Entity;
use crate::light::Light;

new_key_type! {
    pub struct EntityKey;
    pub struct LightKey;
}

/// The set of renderable entities and lights.
///
/// Collections are unordered; all content is opaque, so insertion order has
/// no effect on rendering. Removal is idempotent.
#[derive(Debug, Default)]
pub struct SceneState {
    entities: SlotMap<EntityKey, Entity>,
    lights: SlotMap<LightKey, Light>,
    background: Background,
}

impl SceneState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Entities
    // ========================================================================

    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        log::debug!("Scene: adding entity '{}'", entity.name);
        self.entities.insert(entity)
    }

    /// Removes an entity. Returns `None` if it was already gone.
    pub fn remove_entity(&mut self, key: EntityKey) -> Option<Entity> {
        self.entities.remove(key)
    }

    #[inline]
    #[must_use]
    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    #[inline]
    pub fn entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    #[inline]
    #[must_use]
    pub fn contains_entity(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    /// Finds the first entity with the given name.
    #[must_use]
    pub fn find_entity(&self, name: &str) -> Option<EntityKey> {
        self.entities
            .iter()
            .find_map(|(key, e)| (e.name == name).then_some(key))
    }

    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // ========================================================================
    // Lights
    // ========================================================================

    pub fn add_light(&mut self, light: Light) -> LightKey {
        self.lights.insert(light)
    }

    /// Removes a light. Returns `None` if it was already gone.
    pub fn remove_light(&mut self, key: LightKey) -> Option<Light> {
        self.lights.remove(key)
    }

    #[inline]
    #[must_use]
    pub fn light(&self, key: LightKey) -> Option<&Light> {
        self.lights.get(key)
    }

    pub fn lights(&self) -> impl Iterator<Item = (LightKey, &Light)> {
        self.lights.iter()
    }

    #[inline]
    #[must_use]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    // ========================================================================
    // Background
    // ========================================================================

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    #[inline]
    #[must_use]
    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Drops all entities and lights and resets the background.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.lights.clear();
        self.background = Background::default();
    }
}
