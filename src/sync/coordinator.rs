//! Top-level orchestration of store, filters, markers and selection.
//!
//! Every mutation ends in [`SyncCoordinator::rerender`], which derives the
//! visible set from the current store snapshot and reconciles markers
//! against it. Because each pass looks only at the latest snapshot, any
//! number of triggers arriving in any order converge to the same result.

use crate::{
    core::{config::DashboardConfig, geo::LatLng},
    entity::{store::EntityStore, Entity, EntityKey},
    filter::{FilterEngine, FilterState, TypeFilter},
    markers::{
        canvas::MarkerCanvas,
        registry::{MarkerRegistry, ReconcileReport},
        style::GlyphCatalog,
    },
    selection::SelectionController,
};

/// Mutable view state of the dashboard: what is known, what is filtered,
/// what is selected. Only the coordinator mutates it.
#[derive(Debug, Clone)]
pub struct DashboardState {
    store: EntityStore,
    filter: FilterState,
    selection: SelectionController,
}

impl DashboardState {
    pub fn new(focus_zoom: f64) -> Self {
        Self {
            store: EntityStore::new(),
            filter: FilterState::default(),
            selection: SelectionController::new(focus_zoom),
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }
}

pub struct SyncCoordinator<C: MarkerCanvas> {
    state: DashboardState,
    registry: MarkerRegistry,
    canvas: C,
    passes: u64,
}

impl<C: MarkerCanvas> SyncCoordinator<C> {
    pub fn new(config: &DashboardConfig, canvas: C) -> Self {
        Self {
            state: DashboardState::new(config.viewport.focus_zoom),
            registry: MarkerRegistry::new(config.markers.clone()),
            canvas,
            passes: 0,
        }
    }

    pub fn with_glyphs(mut self, glyphs: GlyphCatalog) -> Self {
        self.registry = self.registry.with_glyphs(glyphs);
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn store(&self) -> &EntityStore {
        &self.state.store
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Number of reconciliation passes run so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    // --- backend outcomes --------------------------------------------------------------------

    /// Replaces the store with freshly listed places and events
    pub fn on_loaded(&mut self, places: Vec<Entity>, events: Vec<Entity>) -> ReconcileReport {
        log::info!("loaded {} places and {} events", places.len(), events.len());
        self.state.store.replace_all(places.into_iter().chain(events));
        if let Some(key) = self.state.selection.selected() {
            if !self.state.store.contains(&key) {
                self.state.selection.clear(&mut self.registry, &mut self.canvas);
            }
        }
        self.rerender()
    }

    pub fn on_created(&mut self, entity: Entity) -> ReconcileReport {
        log::info!("created {} '{}'", entity.key(), entity.name);
        self.state.store.upsert(entity);
        self.rerender()
    }

    /// Full replace of the stored entity, applied before reconciling
    pub fn on_updated(&mut self, entity: Entity) -> ReconcileReport {
        let key = entity.key();
        if self.state.store.upsert(entity).is_none() {
            log::debug!("update for unknown {}; inserted", key);
        }
        log::info!("updated {}", key);
        self.rerender()
    }

    pub fn on_deleted(&mut self, key: EntityKey) -> ReconcileReport {
        if self.state.selection.is_selected(&key) {
            self.state.selection.clear(&mut self.registry, &mut self.canvas);
        }
        if self.state.store.remove(&key).is_some() {
            log::info!("deleted {}", key);
        }
        self.rerender()
    }

    // --- filters -----------------------------------------------------------------------------

    pub fn set_filter(&mut self, filter: FilterState) -> ReconcileReport {
        self.state.filter = filter;
        self.rerender()
    }

    pub fn set_type_filter(&mut self, type_filter: TypeFilter) -> ReconcileReport {
        self.state.filter.type_filter = type_filter;
        self.rerender()
    }

    pub fn toggle_category(&mut self, category: &str) -> ReconcileReport {
        self.state.filter.toggle_category(category);
        self.rerender()
    }

    pub fn set_search(&mut self, text: impl Into<String>) -> ReconcileReport {
        self.state.filter.search_text = text.into();
        self.rerender()
    }

    /// Rows of the list panel, alphabetical by name
    pub fn list_view(&self) -> Vec<&Entity> {
        FilterEngine::apply_sorted(self.state.store.iter(), &self.state.filter)
    }

    // --- selection ---------------------------------------------------------------------------

    pub fn select(&mut self, key: EntityKey) {
        self.state
            .selection
            .select(key, &self.state.store, &mut self.registry, &mut self.canvas);
    }

    pub fn hover(&mut self, key: EntityKey, entering: bool) {
        self.state
            .selection
            .hover(key, entering, &mut self.registry, &mut self.canvas);
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear(&mut self.registry, &mut self.canvas);
    }

    /// Map click: selects the nearest marker within `radius_m`, or clears the selection
    pub fn click_at(&mut self, position: LatLng, radius_m: f64) -> Option<EntityKey> {
        match self.registry.nearest(&position, radius_m) {
            Some(key) => {
                self.select(key);
                Some(key)
            }
            None => {
                self.clear_selection();
                None
            }
        }
    }

    // --- glyphs ------------------------------------------------------------------------------

    /// Registers a custom category glyph; live markers of that category are restyled in place
    pub fn register_glyph(
        &mut self,
        category: impl Into<String>,
        glyph: impl Into<String>,
    ) -> ReconcileReport {
        self.registry.glyphs_mut().register(category, glyph);
        self.rerender()
    }

    /// Drops a custom glyph so the category falls back to its built-in one
    pub fn unregister_glyph(&mut self, category: &str) -> ReconcileReport {
        if self.registry.glyphs_mut().unregister(category).is_none() {
            log::debug!("no custom glyph registered for '{}'", category);
        }
        self.rerender()
    }

    // --- pipeline ----------------------------------------------------------------------------

    /// Filter the current snapshot, reconcile markers, reassert selection styling.
    ///
    /// Safe to call any number of times; each call converges on the current store.
    pub fn rerender(&mut self) -> ReconcileReport {
        let visible = FilterEngine::apply(self.state.store.iter(), &self.state.filter);
        let selection = &self.state.selection;
        let report =
            self.registry
                .reconcile(&visible, |key| selection.visual_state(key), &mut self.canvas);
        self.state
            .selection
            .reassert(&mut self.registry, &mut self.canvas);
        self.passes += 1;
        report
    }

    /// Destroys every marker and recreates the visible set with fresh ids
    pub fn rebuild(&mut self) -> ReconcileReport {
        log::debug!("rebuilding {} markers", self.registry.len());
        self.registry.clear(&mut self.canvas);
        self.rerender()
    }
}
