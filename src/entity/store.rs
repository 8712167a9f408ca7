use crate::entity::{Entity, EntityKey, EntityKind};
use indexmap::IndexMap;

/// Authoritative in-memory collection of known entities.
///
/// Holds at most one entity per [`EntityKey`]. Iteration follows insertion
/// order; replacing an entity keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: IndexMap<EntityKey, Entity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces by key, returning the previous entity if any
    pub fn upsert(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.key(), entity)
    }

    /// Removes by key. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &EntityKey) -> Option<Entity> {
        self.entities.shift_remove(key)
    }

    /// Replaces the whole contents in one step
    pub fn replace_all<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = Entity>,
    {
        self.entities = entities.into_iter().map(|e| (e.key(), e)).collect();
    }

    pub fn get(&self, key: &EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    /// Entities of the given kind, or all of them, in insertion order
    pub fn all(&self, kind: Option<EntityKind>) -> Vec<&Entity> {
        self.iter()
            .filter(|e| kind.map_or(true, |k| e.kind() == k))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut store = EntityStore::new();
        store.upsert(Entity::place(1, "Citadel"));
        store.upsert(Entity::place(2, "Ramla"));
        let previous = store.upsert(Entity::place(1, "Cittadella"));

        assert_eq!(previous.map(|e| e.name), Some("Citadel".to_string()));
        assert_eq!(store.len(), 2);
        let names: Vec<_> = store.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Cittadella", "Ramla"]);
    }

    #[test]
    fn test_same_id_different_kind_coexist() {
        let mut store = EntityStore::new();
        store.upsert(Entity::place(5, "Place five"));
        store.upsert(Entity::event(5, "Event five"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.all(Some(EntityKind::Place)).len(), 1);
        assert_eq!(store.all(Some(EntityKind::Event)).len(), 1);

        store.remove(&EntityKey::place(5));
        assert!(store.contains(&EntityKey::event(5)));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = EntityStore::new();
        store.upsert(Entity::place(1, "A"));
        store.upsert(Entity::event(1, "B"));

        assert!(store.remove(&EntityKey::place(1)).is_some());
        let after_first: Vec<_> = store.iter().cloned().collect();
        assert!(store.remove(&EntityKey::place(1)).is_none());
        let after_second: Vec<_> = store.iter().cloned().collect();

        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_all_keeps_insertion_order() {
        let mut store = EntityStore::new();
        store.upsert(Entity::event(3, "C"));
        store.upsert(Entity::place(1, "A"));
        store.upsert(Entity::event(2, "B"));

        let keys: Vec<_> = store.all(None).iter().map(|e| e.key()).collect();
        assert_eq!(
            keys,
            vec![EntityKey::event(3), EntityKey::place(1), EntityKey::event(2)]
        );
    }

    #[test]
    fn test_replace_all() {
        let mut store = EntityStore::new();
        store.upsert(Entity::place(1, "Old"));
        store.replace_all(vec![Entity::place(2, "New"), Entity::event(2, "Newer")]);

        assert!(!store.contains(&EntityKey::place(1)));
        assert_eq!(store.len(), 2);
    }
}
