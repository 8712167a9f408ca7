//! Persistence collaborator for places and events
//!
//! The engine never talks to the backend itself. A [`Backend`] call settles
//! first, and only a successful result is handed to the coordinator.

#[cfg(feature = "http")]
pub mod http;

use crate::{
    entity::{Entity, EntityKey, EntityKind},
    Result,
};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Request body for create/update: the full record minus its id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDraft {
    fields: Map<String, Value>,
}

impl EntityDraft {
    pub fn new(name: impl Into<String>) -> Self {
        let mut draft = Self::default();
        draft.fields.insert("name".to_string(), Value::from(name.into()));
        draft
    }

    /// Draft carrying every field of an existing entity, for full-replace updates
    pub fn from_entity(entity: &Entity) -> Self {
        let mut fields = match entity.to_record() {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        fields.remove("id");
        Self { fields }
    }

    pub fn with_position(self, lat: f64, lng: f64) -> Self {
        self.with_field("latitude", lat).with_field("longitude", lng)
    }

    pub fn with_category(self, category: impl Into<String>) -> Self {
        self.with_field("category", category.into())
    }

    pub fn with_icon(self, icon: impl Into<String>) -> Self {
        self.with_field("icon", icon.into())
    }

    pub fn with_icon_size(self, size: u32) -> Self {
        self.with_field("iconSize", size)
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// The record the backend would persist under `id`
    pub fn into_entity(self, key: EntityKey) -> Result<Entity> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::from(key.id));
        Entity::from_record(key.kind, Value::Object(fields))
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Every record of one kind, in backend order
    async fn list(&self, kind: EntityKind) -> Result<Vec<Entity>>;

    /// Persists a new record and returns it with its server-assigned id
    async fn create(&self, kind: EntityKind, draft: &EntityDraft) -> Result<Entity>;

    /// Replaces a record and returns the persisted version
    async fn update(&self, key: EntityKey, draft: &EntityDraft) -> Result<Entity>;

    async fn delete(&self, key: EntityKey) -> Result<()>;

    async fn list_places(&self) -> Result<Vec<Entity>> {
        self.list(EntityKind::Place).await
    }

    async fn list_events(&self) -> Result<Vec<Entity>> {
        self.list(EntityKind::Event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_builds_record() {
        let draft = EntityDraft::new("Ramla")
            .with_position(36.06, 14.28)
            .with_category("Beach")
            .with_icon_size(40);

        assert_eq!(draft.name(), Some("Ramla"));
        assert_eq!(
            draft.to_value(),
            json!({ "name": "Ramla", "latitude": 36.06, "longitude": 14.28,
                    "category": "Beach", "iconSize": 40 })
        );

        let entity = draft.into_entity(EntityKey::place(3)).unwrap();
        assert_eq!(entity.key(), EntityKey::place(3));
        assert_eq!(entity.category.as_deref(), Some("Beach"));
    }

    #[test]
    fn test_draft_from_entity_drops_id() {
        let entity = Entity::event(8, "Festa").with_position(36.0, 14.2);
        let draft = EntityDraft::from_entity(&entity);

        assert!(draft.get("id").is_none());
        assert_eq!(draft.name(), Some("Festa"));
        assert_eq!(draft.into_entity(EntityKey::event(8)).unwrap(), entity);
    }
}
