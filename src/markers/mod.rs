//! Marker primitives and the registry that owns them

pub mod canvas;
pub mod registry;
pub mod style;

use crate::{
    core::geo::LatLng,
    entity::{Entity, EntityKey, EntityKind},
};
use style::{MarkerStyle, VisualState};

/// Canvas-side identity of a marker. Stable for the marker's whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// A rendered marker bound 1:1 to an entity key.
///
/// Carries the entity snapshot it was last reconciled against so it can be
/// restyled without being recreated.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerHandle {
    id: MarkerId,
    key: EntityKey,
    pub(crate) position: LatLng,
    pub(crate) style: MarkerStyle,
    pub(crate) source: Entity,
}

impl MarkerHandle {
    pub(crate) fn new(id: MarkerId, source: Entity, position: LatLng, style: MarkerStyle) -> Self {
        Self {
            id,
            key: source.key(),
            position,
            style,
            source,
        }
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn key(&self) -> EntityKey {
        self.key
    }

    pub fn kind(&self) -> EntityKind {
        self.key.kind
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub fn state(&self) -> VisualState {
        self.style.state
    }

    pub fn z_index(&self) -> i32 {
        self.style.z_index
    }

    /// Popup title
    pub fn title(&self) -> &str {
        &self.source.name
    }

    pub fn source(&self) -> &Entity {
        &self.source
    }
}
