//! Effect store
//!
//! Per-entity effect table keyed by entity id. A `BTreeMap` keeps iteration
//! order stable across runs, so a seeded simulation processes entities in the
//! same order every time.

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::records::EffectSlots;

#[derive(Resource, Debug, Default)]
pub struct EffectStore {
    tables: BTreeMap<Entity, EffectSlots>,
}

impl EffectStore {
    pub fn get(&self, entity: Entity) -> Option<&EffectSlots> {
        self.tables.get(&entity)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut EffectSlots> {
        self.tables.get_mut(&entity)
    }

    /// Table for `entity`, created empty on first use
    pub fn slots_mut(&mut self, entity: Entity) -> &mut EffectSlots {
        self.tables.entry(entity).or_default()
    }

    /// Detach the whole table for `entity`
    pub fn take(&mut self, entity: Entity) -> Option<EffectSlots> {
        self.tables.remove(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.tables.contains_key(&entity)
    }

    /// Entities holding at least one table, in processing order
    pub fn entities(&self) -> Vec<Entity> {
        self.tables.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &EffectSlots)> {
        self.tables.iter().map(|(entity, slots)| (*entity, slots))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut EffectSlots)> {
        self.tables.iter_mut().map(|(entity, slots)| (*entity, slots))
    }

    /// Drop tables that no longer hold any record
    pub fn prune_empty(&mut self) {
        self.tables.retain(|_, slots| !slots.is_empty());
    }

    /// Number of entities with a table
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total records across all entities
    pub fn record_count(&self) -> usize {
        self.tables.values().map(EffectSlots::count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::records::{Poison, Stun};

    #[test]
    fn test_entities_iterate_in_id_order() {
        let mut store = EffectStore::default();
        for index in [9, 2, 5] {
            store.slots_mut(Entity::from_raw(index)).stun = Some(Stun::new(1.0, None));
        }

        let order: Vec<u32> = store.entities().iter().map(|e| e.index()).collect();
        assert_eq!(order, vec![2, 5, 9]);

        let walked: Vec<u32> = store
            .iter()
            .filter(|(_, slots)| slots.stun.is_some())
            .map(|(entity, _)| entity.index())
            .collect();
        assert_eq!(walked, order);
    }

    #[test]
    fn test_prune_empty_drops_only_empty_tables() {
        let mut store = EffectStore::default();
        let kept = Entity::from_raw(1);
        let emptied = Entity::from_raw(2);

        store.slots_mut(kept).poisons.push(Poison::new(1.0, 1.0, 1.0, None));
        store.slots_mut(emptied);
        store.prune_empty();

        assert!(store.contains(kept));
        assert!(!store.contains(emptied));
        assert_eq!(store.record_count(), 1);
    }
}
