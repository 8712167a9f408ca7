use crate::{
    core::{
        config::MarkerStyleConfig,
        geo::{LatLng, LatLngBounds},
    },
    entity::{Entity, EntityKey},
    markers::{
        canvas::MarkerCanvas,
        style::{GlyphCatalog, MarkerStyle, VisualState},
        MarkerHandle, MarkerId,
    },
    prelude::{HashMap, HashSet},
    spatial::index::SpatialIndex,
};

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<EntityKey>,
    pub updated: Vec<EntityKey>,
    pub unchanged: Vec<EntityKey>,
    pub removed: Vec<EntityKey>,
    /// Entities that passed the filter but have no usable coordinates
    pub skipped: Vec<EntityKey>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Owns every marker on the map, keyed by [`EntityKey`].
///
/// [`MarkerRegistry::reconcile`] is the only code path that creates or
/// destroys markers. Everything else may only restyle existing ones.
pub struct MarkerRegistry {
    markers: HashMap<EntityKey, MarkerHandle>,
    /// Keys sorted by z-index, lowest first
    render_order: Vec<EntityKey>,
    spatial: SpatialIndex,
    next_id: u64,
    config: MarkerStyleConfig,
    glyphs: GlyphCatalog,
}

impl MarkerRegistry {
    pub fn new(config: MarkerStyleConfig) -> Self {
        Self {
            markers: HashMap::default(),
            render_order: Vec::new(),
            spatial: SpatialIndex::new(),
            next_id: 1,
            config,
            glyphs: GlyphCatalog::new(),
        }
    }

    pub fn with_glyphs(mut self, glyphs: GlyphCatalog) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn glyphs(&self) -> &GlyphCatalog {
        &self.glyphs
    }

    /// Custom glyphs take effect on the next reconciliation pass
    pub fn glyphs_mut(&mut self) -> &mut GlyphCatalog {
        &mut self.glyphs
    }

    /// Brings the marker set in line with `entities`.
    ///
    /// Markers whose key is absent from `entities` are destroyed, missing
    /// ones are created, and the rest are moved/restyled in place so their
    /// [`MarkerId`] survives. Entities without coordinates are skipped.
    /// `state_of` supplies the interaction state used to style each marker.
    pub fn reconcile<F>(
        &mut self,
        entities: &[&Entity],
        state_of: F,
        canvas: &mut dyn MarkerCanvas,
    ) -> ReconcileReport
    where
        F: Fn(&EntityKey) -> VisualState,
    {
        let mut report = ReconcileReport::default();

        let mut target: HashMap<EntityKey, (&Entity, LatLng)> = HashMap::default();
        let mut target_order = Vec::with_capacity(entities.len());
        for entity in entities {
            let key = entity.key();
            match entity.position() {
                Some(position) => {
                    if target.insert(key, (*entity, position)).is_none() {
                        target_order.push(key);
                    }
                }
                None => report.skipped.push(key),
            }
        }

        let stale: Vec<EntityKey> = self
            .markers
            .keys()
            .filter(|key| !target.contains_key(key))
            .copied()
            .collect();
        for key in stale {
            self.destroy(key, canvas);
            report.removed.push(key);
        }

        for key in target_order {
            let (entity, position) = target[&key];
            let style = MarkerStyle::derive(entity, state_of(&key), &self.config, &self.glyphs);

            match self.markers.get_mut(&key) {
                Some(handle) => {
                    let changed = handle.position != position || handle.style != style;
                    let moved_from = handle.position;
                    handle.position = position;
                    handle.style = style;
                    handle.source = entity.clone();
                    if changed {
                        canvas.update_marker(handle);
                        self.spatial.relocate(key, moved_from, position);
                        report.updated.push(key);
                    } else {
                        report.unchanged.push(key);
                    }
                }
                None => {
                    let id = MarkerId(self.next_id);
                    self.next_id += 1;
                    let handle = MarkerHandle::new(id, entity.clone(), position, style);
                    canvas.add_marker(&handle);
                    self.spatial.insert(key, position);
                    self.markers.insert(key, handle);
                    report.created.push(key);
                }
            }
        }

        self.update_render_order();

        log::debug!(
            "reconciled markers: {} created, {} updated, {} removed, {} skipped, {} live",
            report.created.len(),
            report.updated.len(),
            report.removed.len(),
            report.skipped.len(),
            self.markers.len()
        );
        report
    }

    /// Destroys every marker. The next [`MarkerRegistry::reconcile`] rebuilds from scratch.
    pub fn clear(&mut self, canvas: &mut dyn MarkerCanvas) {
        for (_, handle) in self.markers.drain() {
            canvas.remove_marker(handle.id());
        }
        self.spatial.clear();
        self.render_order.clear();
    }

    fn destroy(&mut self, key: EntityKey, canvas: &mut dyn MarkerCanvas) {
        if let Some(handle) = self.markers.remove(&key) {
            canvas.remove_marker(handle.id());
            self.spatial.remove(key, handle.position);
        }
        self.render_order.retain(|k| *k != key);
    }

    /// Re-derives a live marker's style for a new interaction state.
    ///
    /// Returns `false` when no marker exists for `key`. The canvas is only
    /// touched when the style actually changes.
    pub fn restyle(
        &mut self,
        key: &EntityKey,
        state: VisualState,
        canvas: &mut dyn MarkerCanvas,
    ) -> bool {
        let Some(handle) = self.markers.get_mut(key) else {
            return false;
        };
        let style = MarkerStyle::derive(&handle.source, state, &self.config, &self.glyphs);
        if handle.style != style {
            handle.style = style;
            canvas.update_marker(handle);
            self.update_render_order();
        }
        true
    }

    /// Re-sorts the render order by z-index, keeping key order among equals
    pub fn update_render_order(&mut self) {
        let markers = &self.markers;
        self.render_order = markers.keys().copied().collect();
        self.render_order.sort_by(|a, b| {
            let z_a = markers.get(a).map(|m| m.z_index()).unwrap_or(0);
            let z_b = markers.get(b).map(|m| m.z_index()).unwrap_or(0);
            z_a.cmp(&z_b).then(a.cmp(b))
        });
    }

    pub fn get(&self, key: &EntityKey) -> Option<&MarkerHandle> {
        self.markers.get(key)
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        self.markers.contains_key(key)
    }

    pub fn keys(&self) -> HashSet<EntityKey> {
        self.markers.keys().copied().collect()
    }

    /// Markers in paint order, topmost last
    pub fn render_order(&self) -> Vec<&MarkerHandle> {
        self.render_order
            .iter()
            .filter_map(|key| self.markers.get(key))
            .collect()
    }

    /// Keys of markers inside `bounds`
    pub fn query_bounds(&self, bounds: &LatLngBounds) -> Vec<EntityKey> {
        self.spatial.query(bounds)
    }

    /// Marker closest to `position` within `max_distance_m` meters
    pub fn nearest(&self, position: &LatLng, max_distance_m: f64) -> Option<EntityKey> {
        self.spatial.nearest_within(position, max_distance_m)
    }

    /// Bounds enclosing every live marker
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.spatial.bounds()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl Default for MarkerRegistry {
    fn default() -> Self {
        Self::new(MarkerStyleConfig::default())
    }
}
