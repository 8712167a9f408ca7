//! Core constants taken from the dashboard's marker conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Pixel size of an uploaded image icon when the record carries no `iconSize`.
pub const DEFAULT_ICON_SIZE: u32 = 32;

/// Square box (in pixels) of the glyph-in-circle marker, border included.
pub const GLYPH_MARKER_BOX: u32 = 46;

/// Stored uploads are served under this path; an icon with this prefix is an image.
pub const UPLOAD_PREFIX: &str = "/uploads/";

/// Category literal that gates the visibility of events under a category filter.
pub const EVENTS_CATEGORY: &str = "Events";

/// Glyph used when a category has no mapping.
pub const PIN_GLYPH: &str = "📍";

/// Emphasis scale of an image marker when hovered or selected.
pub const IMAGE_EMPHASIS_SCALE: f32 = 1.2;

/// Emphasis scale of a glyph marker when hovered or selected.
pub const GLYPH_EMPHASIS_SCALE: f32 = 1.15;

/// z-index of an idle glyph marker.
pub const Z_IDLE: i32 = 0;

/// z-index of an idle uploaded-image marker (surfaces above glyphs).
pub const Z_IMAGE: i32 = 100;

/// z-index of a hovered ("raised") marker.
pub const Z_HOVERED: i32 = 400;

/// z-index of the selected marker.
pub const Z_SELECTED: i32 = 500;

/// Zoom level the viewport animates to when an entity is selected.
pub const FOCUS_ZOOM: f64 = 15.0;
