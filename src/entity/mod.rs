//! Places, events and the namespaced key that tells them apart.
//!
//! Place ids and event ids come from two independent tables, so a numeric id
//! alone never identifies an entity. Everything that indexes entities or
//! their markers goes through [`EntityKey`].

pub mod store;

use crate::{core::geo::LatLng, DashError, Result};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Place,
    Event,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Place => "place",
            EntityKind::Event => "event",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Namespaced identifier `(kind, id)`.
///
/// The canonical textual form is `place-<id>` / `event-<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: u64,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn place(id: u64) -> Self {
        Self::new(EntityKind::Place, id)
    }

    pub fn event(id: u64) -> Self {
        Self::new(EntityKind::Event, id)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.id)
    }
}

impl FromStr for EntityKey {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, id) = s
            .split_once('-')
            .ok_or_else(|| DashError::InvalidKey(s.to_string()))?;
        let kind = match kind {
            "place" => EntityKind::Place,
            "event" => EntityKind::Event,
            _ => return Err(DashError::InvalidKey(s.to_string())),
        };
        let id = id
            .parse::<u64>()
            .map_err(|_| DashError::InvalidKey(s.to_string()))?;
        Ok(Self::new(kind, id))
    }
}

/// A place or event as known to the dashboard.
///
/// Updates replace the whole entity; there is no field-level patching.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    key: EntityKey,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Only meaningful for places; always `None` on events.
    pub category: Option<String>,
    pub icon: Option<String>,
    pub icon_size: Option<u32>,
    /// Backend fields the engine does not interpret (description, images, ...)
    pub extra: Map<String, Value>,
}

impl Entity {
    pub fn new(key: EntityKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            latitude: None,
            longitude: None,
            category: None,
            icon: None,
            icon_size: None,
            extra: Map::new(),
        }
    }

    pub fn place(id: u64, name: impl Into<String>) -> Self {
        Self::new(EntityKey::place(id), name)
    }

    pub fn event(id: u64, name: impl Into<String>) -> Self {
        Self::new(EntityKey::event(id), name)
    }

    pub fn with_position(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lng);
        self
    }

    /// Ignored for events.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        if self.key.kind == EntityKind::Place {
            self.category = Some(category.into());
        }
        self
    }

    /// An empty icon clears it, so the marker falls back to the category glyph.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into()).filter(|i| !i.is_empty());
        self
    }

    pub fn with_icon_size(mut self, size: u32) -> Self {
        self.icon_size = Some(size);
        self
    }

    pub fn key(&self) -> EntityKey {
        self.key
    }

    pub fn kind(&self) -> EntityKind {
        self.key.kind
    }

    pub fn id(&self) -> u64 {
        self.key.id
    }

    /// Map position, or `None` when the entity has not been geocoded
    pub fn position(&self) -> Option<LatLng> {
        LatLng::from_parts(self.latitude, self.longitude)
    }

    pub fn is_renderable(&self) -> bool {
        self.position().is_some()
    }

    /// Parses a backend record of the given kind.
    ///
    /// Coordinates that are missing, `null` or not JSON numbers are kept as
    /// `None`. An event's `category` is not interpreted and stays in `extra`.
    pub fn from_record(kind: EntityKind, record: Value) -> Result<Self> {
        let raw: RawRecord = serde_json::from_value(record)?;
        let mut extra = raw.extra;
        let category = match kind {
            EntityKind::Place => raw.category,
            EntityKind::Event => {
                if let Some(category) = raw.category {
                    extra.insert("category".to_string(), Value::String(category));
                }
                None
            }
        };

        Ok(Self {
            key: EntityKey::new(kind, raw.id),
            name: raw.name.unwrap_or_default(),
            latitude: raw.latitude,
            longitude: raw.longitude,
            category,
            icon: raw.icon.filter(|icon| !icon.is_empty()),
            icon_size: raw.icon_size,
            extra,
        })
    }

    /// Parses a list response of the given kind
    pub fn from_records(kind: EntityKind, records: Value) -> Result<Vec<Self>> {
        match records {
            Value::Array(items) => items
                .into_iter()
                .map(|item| Self::from_record(kind, item))
                .collect(),
            other => Err(DashError::Backend {
                status: 200,
                message: format!("expected a list of {} records, got {}", kind, other),
            }),
        }
    }

    /// Serializes back to the backend's record shape
    pub fn to_record(&self) -> Value {
        let mut record = self.extra.clone();
        record.insert("id".to_string(), Value::from(self.key.id));
        record.insert("name".to_string(), Value::from(self.name.clone()));
        record.insert("latitude".to_string(), self.latitude.map_or(Value::Null, Value::from));
        record.insert("longitude".to_string(), self.longitude.map_or(Value::Null, Value::from));
        if let Some(category) = &self.category {
            record.insert("category".to_string(), Value::from(category.clone()));
        }
        if let Some(icon) = &self.icon {
            record.insert("icon".to_string(), Value::from(icon.clone()));
        }
        if let Some(size) = self.icon_size {
            record.insert("iconSize".to_string(), Value::from(size));
        }
        Value::Object(record)
    }
}

#[derive(Deserialize)]
struct RawRecord {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "numeric_only")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "numeric_only")]
    longitude: Option<f64>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default, rename = "iconSize", deserialize_with = "lenient_size")]
    icon_size: Option<u32>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn numeric_only<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|v| v.is_finite()))
}

// Form submissions store the slider value as text.
fn lenient_size<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
    .filter(|size| *size > 0))
}
