//! Configuration system for marker styling, viewport behavior and the backend
//!
//! Configuration is hierarchical: a [`DashboardProfile`] preset resolves to a
//! complete [`DashboardConfig`], whose sections can also be deserialized from
//! JSON with any field omitted falling back to its default.

use crate::{
    constants::{
        DEFAULT_ICON_SIZE, FOCUS_ZOOM, GLYPH_EMPHASIS_SCALE, GLYPH_MARKER_BOX,
        IMAGE_EMPHASIS_SCALE, UPLOAD_PREFIX, Z_HOVERED, Z_IDLE, Z_IMAGE, Z_SELECTED,
    },
    core::geo::LatLng,
    DashError, Result,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardProfile {
    Default,
    Compact,
    Custom(DashboardConfig),
}

impl DashboardProfile {
    pub fn resolve(&self) -> DashboardConfig {
        match self {
            Self::Default => DashboardConfig::default(),
            Self::Compact => DashboardConfig {
                markers: MarkerStyleConfig {
                    default_icon_size: 24,
                    glyph_box: 34,
                    image_emphasis_scale: 1.1,
                    glyph_emphasis_scale: 1.1,
                    ..MarkerStyleConfig::default()
                },
                viewport: ViewportConfig {
                    focus_zoom: 14.0,
                    ..ViewportConfig::default()
                },
                ..DashboardConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for DashboardProfile {
    fn default() -> Self {
        Self::Default
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub markers: MarkerStyleConfig,
    pub viewport: ViewportConfig,
    pub backend: BackendConfig,
    /// Categories whose places must be managed from dedicated editors
    pub protected_categories: Vec<String>,
}

impl DashboardConfig {
    /// Parses a configuration document, filling omitted fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.markers.default_icon_size == 0 {
            return Err(DashError::Config(
                "markers.default_icon_size must be positive".to_string(),
            ));
        }
        if !self.viewport.initial_center.is_valid() {
            return Err(DashError::Config(format!(
                "viewport.initial_center {} is out of range",
                self.viewport.initial_center
            )));
        }
        if self.backend.base_url.is_empty() {
            return Err(DashError::Config("backend.base_url is empty".to_string()));
        }
        Ok(())
    }

    pub fn is_protected_category(&self, category: &str) -> bool {
        self.protected_categories.iter().any(|c| c == category)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            markers: MarkerStyleConfig::default(),
            viewport: ViewportConfig::default(),
            backend: BackendConfig::default(),
            protected_categories: ["Bus Stop", "BUS_STOP", "Bus Terminus", "TOUR_STOP", "Tours"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyleConfig {
    pub default_icon_size: u32,
    pub glyph_box: u32,
    pub upload_prefix: String,
    pub image_emphasis_scale: f32,
    pub glyph_emphasis_scale: f32,
    pub idle_border_color: String,
    pub selected_border_color: String,
    pub event_border_color: String,
    pub z_idle: i32,
    pub z_image: i32,
    pub z_hovered: i32,
    pub z_selected: i32,
}

impl MarkerStyleConfig {
    pub fn is_upload(&self, icon: &str) -> bool {
        icon.starts_with(&self.upload_prefix)
    }
}

impl Default for MarkerStyleConfig {
    fn default() -> Self {
        Self {
            default_icon_size: DEFAULT_ICON_SIZE,
            glyph_box: GLYPH_MARKER_BOX,
            upload_prefix: UPLOAD_PREFIX.to_string(),
            image_emphasis_scale: IMAGE_EMPHASIS_SCALE,
            glyph_emphasis_scale: GLYPH_EMPHASIS_SCALE,
            idle_border_color: "#ffffff".to_string(),
            selected_border_color: "#0ea5e9".to_string(),
            event_border_color: "#f43f5e".to_string(),
            z_idle: Z_IDLE,
            z_image: Z_IMAGE,
            z_hovered: Z_HOVERED,
            z_selected: Z_SELECTED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    /// Zoom used when flying to a selected entity
    pub focus_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            initial_center: LatLng::new(36.045, 14.25),
            initial_zoom: 13.0,
            focus_zoom: FOCUS_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub places_path: String,
    pub events_path: String,
    pub request_timeout_ms: u64,
}

impl BackendConfig {
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            places_path: "/api/places".to_string(),
            events_path: "/api/events".to_string(),
            request_timeout_ms: 15_000,
        }
    }
}
