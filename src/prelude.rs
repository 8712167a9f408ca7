//! Prelude module for common mapdash types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapdash::prelude::*;`

pub use crate::core::{
    config::{BackendConfig, DashboardConfig, DashboardProfile, MarkerStyleConfig, ViewportConfig},
    geo::{LatLng, LatLngBounds},
};

pub use crate::entity::{store::EntityStore, Entity, EntityKey, EntityKind};

pub use crate::filter::{FilterEngine, FilterState, TypeFilter};

pub use crate::markers::{
    canvas::{CanvasOp, MarkerCanvas, RecordingCanvas},
    registry::{MarkerRegistry, ReconcileReport},
    style::{GlyphCatalog, MarkerStyle, MarkerVisual, VisualState},
    MarkerHandle, MarkerId,
};

pub use crate::selection::{SelectionController, SelectionState};

pub use crate::sync::coordinator::{DashboardState, SyncCoordinator};

pub use crate::backend::{Backend, EntityDraft};

#[cfg(feature = "http")]
pub use crate::backend::http::HttpBackend;

pub use crate::dashboard::Dashboard;

pub use crate::{DashError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
