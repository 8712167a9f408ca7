use crate::{
    constants::{EVENTS_CATEGORY, PIN_GLYPH},
    core::config::MarkerStyleConfig,
    entity::{Entity, EntityKind},
    prelude::HashMap,
};
use once_cell::sync::Lazy;

/// Built-in category glyphs
static BUILTIN_GLYPHS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("Landscape", "🌄"),
        ("Viewpoint", "🔭"),
        ("Historical Building", "🏛️"),
        ("Nature Spot", "🌳"),
        ("Art & Culture", "🎭"),
        ("Food & Drink", "🍔"),
        ("Shopping", "🛍️"),
        ("Diving Site", "🤿"),
        ("Beach", "🏖️"),
        ("Public Toilet", "🚽"),
        ("Ferry Terminal", "⛴️"),
        ("Boat Tour", "🚤"),
        ("Bus Terminus", "🚌"),
        ("Bus Stop", "🚏"),
        ("BUS_STOP", "🚏"),
        ("TOUR_STOP", "🗺️"),
        ("Tours", "🗺️"),
        ("Cities/Towns", "🏘️"),
        (EVENTS_CATEGORY, "🎉"),
        ("Other Site", "📍"),
    ]
    .into_iter()
    .collect()
});

/// Category-to-glyph lookup.
///
/// Custom categories registered at runtime shadow the built-in table.
#[derive(Debug, Clone, Default)]
pub struct GlyphCatalog {
    custom: HashMap<String, String>,
}

impl GlyphCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, category: impl Into<String>, glyph: impl Into<String>) {
        self.custom.insert(category.into(), glyph.into());
    }

    pub fn unregister(&mut self, category: &str) -> Option<String> {
        self.custom.remove(category)
    }

    /// Glyph for a category, falling back to the generic pin
    pub fn glyph_for(&self, category: Option<&str>) -> &str {
        category
            .and_then(|c| {
                self.custom
                    .get(c)
                    .map(String::as_str)
                    .or_else(|| BUILTIN_GLYPHS.get(c).copied())
            })
            .unwrap_or(PIN_GLYPH)
    }

    /// Every known category name, built-ins first then custom ones, each sorted
    pub fn categories(&self) -> Vec<String> {
        let mut builtin: Vec<_> = BUILTIN_GLYPHS.keys().map(|c| c.to_string()).collect();
        builtin.sort();
        let mut custom: Vec<_> = self
            .custom
            .keys()
            .filter(|c| !BUILTIN_GLYPHS.contains_key(c.as_str()))
            .cloned()
            .collect();
        custom.sort();
        builtin.extend(custom);
        builtin
    }
}

/// Interaction state of a marker, in increasing order of emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VisualState {
    #[default]
    Idle,
    Hovered,
    Selected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerVisual {
    /// Uploaded image drawn without background chrome, anchored at its center
    Image {
        url: String,
        size: u32,
        anchor: (f32, f32),
    },
    /// Glyph inside a bordered circle
    Glyph {
        glyph: String,
        border_color: String,
        box_size: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub visual: MarkerVisual,
    pub scale: f32,
    pub z_index: i32,
    pub state: VisualState,
}

impl MarkerStyle {
    /// Derives the style of an entity's marker.
    ///
    /// An icon under the upload prefix renders as an image sized by
    /// `icon_size`. Any other icon string is used as the glyph itself;
    /// without one the glyph comes from the category (events always use the
    /// events glyph).
    pub fn derive(
        entity: &Entity,
        state: VisualState,
        config: &MarkerStyleConfig,
        glyphs: &GlyphCatalog,
    ) -> Self {
        let emphasized = state != VisualState::Idle;

        if let Some(url) = entity.icon.as_deref().filter(|i| config.is_upload(i)) {
            let size = entity.icon_size.unwrap_or(config.default_icon_size);
            let half = size as f32 / 2.0;
            return Self {
                visual: MarkerVisual::Image {
                    url: url.to_string(),
                    size,
                    anchor: (half, half),
                },
                scale: if emphasized {
                    config.image_emphasis_scale
                } else {
                    1.0
                },
                z_index: z_for(state, config.z_image, config),
                state,
            };
        }

        let glyph = match (entity.icon.as_deref(), entity.kind()) {
            (Some(icon), _) => icon.to_string(),
            (None, EntityKind::Place) => glyphs.glyph_for(entity.category.as_deref()).to_string(),
            (None, EntityKind::Event) => glyphs.glyph_for(Some(EVENTS_CATEGORY)).to_string(),
        };
        let border_color = match (state, entity.kind()) {
            (VisualState::Selected, _) => &config.selected_border_color,
            (_, EntityKind::Event) => &config.event_border_color,
            (_, EntityKind::Place) => &config.idle_border_color,
        };

        Self {
            visual: MarkerVisual::Glyph {
                glyph,
                border_color: border_color.clone(),
                box_size: config.glyph_box,
            },
            scale: if emphasized {
                config.glyph_emphasis_scale
            } else {
                1.0
            },
            z_index: z_for(state, config.z_idle, config),
            state,
        }
    }
}

fn z_for(state: VisualState, idle: i32, config: &MarkerStyleConfig) -> i32 {
    match state {
        VisualState::Idle => idle,
        VisualState::Hovered => config.z_hovered,
        VisualState::Selected => config.z_selected,
    }
}
