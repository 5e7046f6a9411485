//! The entity arena backing a [`World`](super::World) (§9 "Cyclic
//! references": "Worlds hold an `IndexedSlab<Entity>` and everything else
//! holds a `Copy` id").
//!
//! Entity ids are globally monotonic and never reused (§3 invariant), so a
//! dense slab with a free-list would grow without bound as entities migrate
//! between worlds; a hash map keyed by id gives the same "owned state,
//! borrowed by id" shape without that cost.

use rustc_hash::FxHashMap;

use crate::entity::{Entity, EntityId};

/// Owns every entity resident in one world, indexed by id.
#[derive(Debug, Default)]
pub struct EntityArena {
    entities: FxHashMap<EntityId, Entity>,
}

impl EntityArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entity, returning the previous occupant of its id, if any
    /// (which should never happen given id monotonicity).
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.id, entity)
    }

    /// Removes an entity by id, e.g. on destruction or dimension change.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Borrows an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutably borrows an entity by id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// The number of entities resident in this arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the arena holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates entity ids in ascending order, matching §5's "entity ticks
    /// run in entity-id order" ordering guarantee.
    pub fn ids_in_tick_order(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityIdAllocator, EntityKind};
    use terra_utils::Vector3;

    #[test]
    fn ids_in_tick_order_is_ascending_regardless_of_insertion_order() {
        let allocator = EntityIdAllocator::new();
        let mut arena = EntityArena::new();
        let mut ids = Vec::new();
        for _ in 0..5 {
            let e = Entity::new(&allocator, Vector3::new(0.0, 64.0, 0.0), 0, EntityKind::Boat, 1.0, 1.0);
            ids.push(e.id);
            arena.insert(e);
        }
        assert_eq!(arena.ids_in_tick_order(), ids);
    }
}
