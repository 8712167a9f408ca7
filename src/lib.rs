//! # mapdash
//!
//! Entity and marker synchronization engine for an administrative map
//! dashboard of places and events.
//!
//! The engine keeps an in-memory collection of entities consistent with a
//! set of composable view filters and with the markers drawn on a map
//! canvas, across create/update/delete results coming back from a backend.
//! Data flows one way:
//!
//! ```text
//! backend result -> SyncCoordinator -> EntityStore
//!                -> FilterEngine -> MarkerRegistry -> SelectionController
//! ```

pub mod backend;
pub mod core;
pub mod dashboard;
pub mod entity;
pub mod filter;
pub mod markers;
pub mod prelude;
pub mod selection;
pub mod spatial;
pub mod sync;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{DashboardConfig, DashboardProfile},
    geo::{LatLng, LatLngBounds},
};

pub use entity::{store::EntityStore, Entity, EntityKey, EntityKind};

pub use filter::{FilterEngine, FilterState, TypeFilter};

pub use markers::{
    canvas::{CanvasOp, MarkerCanvas, RecordingCanvas},
    registry::{MarkerRegistry, ReconcileReport},
    style::{GlyphCatalog, MarkerStyle, VisualState},
    MarkerHandle, MarkerId,
};

pub use selection::{SelectionController, SelectionState};

pub use sync::coordinator::{DashboardState, SyncCoordinator};

pub use backend::{Backend, EntityDraft};

#[cfg(feature = "http")]
pub use backend::http::HttpBackend;

pub use dashboard::Dashboard;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, DashError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    #[cfg(feature = "http")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend rejected request ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid entity key: {0}")]
    InvalidKey(String),

    #[error("{key} belongs to protected category '{category}' and cannot be deleted here")]
    ProtectedCategory { key: EntityKey, category: String },

    #[error("Entity not found: {0}")]
    NotFound(EntityKey),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = DashError;

/// Initializes `env_logger` from `RUST_LOG`. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init();
}
