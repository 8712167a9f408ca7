//! Selection and hover state machine
//!
//! At most one entity is selected. Hover is an orthogonal, transient state:
//! it never applies to the selected entity and does not survive a
//! reconciliation pass.

use crate::{
    constants::FOCUS_ZOOM,
    entity::{store::EntityStore, EntityKey},
    markers::{canvas::MarkerCanvas, registry::MarkerRegistry, style::VisualState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(EntityKey),
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    state: SelectionState,
    hovered: Option<EntityKey>,
    focus_zoom: f64,
}

impl SelectionController {
    pub fn new(focus_zoom: f64) -> Self {
        Self {
            state: SelectionState::Idle,
            hovered: None,
            focus_zoom,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn selected(&self) -> Option<EntityKey> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Selected(key) => Some(key),
        }
    }

    pub fn hovered(&self) -> Option<EntityKey> {
        self.hovered
    }

    pub fn is_selected(&self, key: &EntityKey) -> bool {
        self.selected().as_ref() == Some(key)
    }

    /// Interaction state a marker for `key` should be drawn with
    pub fn visual_state(&self, key: &EntityKey) -> VisualState {
        if self.is_selected(key) {
            VisualState::Selected
        } else if self.hovered.as_ref() == Some(key) {
            VisualState::Hovered
        } else {
            VisualState::Idle
        }
    }

    /// Selects `key`, demoting any previous selection and dropping hover.
    ///
    /// The viewport flies to the entity only when it has valid coordinates;
    /// otherwise a warning is logged and the selection still takes effect.
    pub fn select(
        &mut self,
        key: EntityKey,
        store: &EntityStore,
        registry: &mut MarkerRegistry,
        canvas: &mut dyn MarkerCanvas,
    ) {
        let previous = self.selected();
        let hovered = self.hovered.take();
        self.state = SelectionState::Selected(key);

        for other in [previous, hovered].into_iter().flatten() {
            if other != key {
                registry.restyle(&other, VisualState::Idle, canvas);
            }
        }
        registry.restyle(&key, VisualState::Selected, canvas);

        match store.get(&key).and_then(|e| e.position()) {
            Some(position) => canvas.fly_to(position, self.focus_zoom),
            None => log::warn!("selected {} has no valid coordinates; viewport left in place", key),
        }
        log::debug!("selection: {:?} -> {}", previous, key);
    }

    /// Pointer entered (`entering = true`) or left a marker or list row.
    ///
    /// No-op for the selected entity.
    pub fn hover(
        &mut self,
        key: EntityKey,
        entering: bool,
        registry: &mut MarkerRegistry,
        canvas: &mut dyn MarkerCanvas,
    ) {
        if self.is_selected(&key) {
            return;
        }
        if entering {
            if let Some(previous) = self.hovered.replace(key) {
                if previous != key {
                    registry.restyle(&previous, VisualState::Idle, canvas);
                }
            }
            registry.restyle(&key, VisualState::Hovered, canvas);
        } else if self.hovered == Some(key) {
            self.hovered = None;
            registry.restyle(&key, VisualState::Idle, canvas);
        }
    }

    /// Returns to `Idle`, restoring the previously selected marker's baseline style
    pub fn clear(&mut self, registry: &mut MarkerRegistry, canvas: &mut dyn MarkerCanvas) {
        let previous = self.selected();
        let hovered = self.hovered.take();
        self.state = SelectionState::Idle;

        for key in [previous, hovered].into_iter().flatten() {
            registry.restyle(&key, VisualState::Idle, canvas);
        }
        if let Some(key) = previous {
            log::debug!("selection cleared (was {})", key);
        }
    }

    /// Re-applies interaction styling after a reconciliation pass.
    ///
    /// Hover is dropped; the selected marker, if rendered, is forced back
    /// to its selected style.
    pub fn reassert(&mut self, registry: &mut MarkerRegistry, canvas: &mut dyn MarkerCanvas) {
        if let Some(key) = self.hovered.take() {
            registry.restyle(&key, VisualState::Idle, canvas);
        }
        if let Some(key) = self.selected() {
            registry.restyle(&key, VisualState::Selected, canvas);
        }
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(FOCUS_ZOOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::geo::LatLng,
        entity::Entity,
        markers::canvas::{CanvasOp, RecordingCanvas},
    };

    struct Fixture {
        store: EntityStore,
        registry: MarkerRegistry,
        canvas: RecordingCanvas,
        selection: SelectionController,
    }

    fn fixture() -> Fixture {
        let mut store = EntityStore::new();
        store.upsert(Entity::place(1, "Citadel").with_position(36.046, 14.239));
        store.upsert(Entity::place(2, "Ramla").with_position(36.062, 14.284));
        store.upsert(Entity::event(1, "Festa").with_position(36.044, 14.240));
        store.upsert(Entity::place(3, "Not geocoded"));

        let mut registry = MarkerRegistry::default();
        let mut canvas = RecordingCanvas::new();
        let visible: Vec<&Entity> = store.iter().collect();
        registry.reconcile(&visible, |_| VisualState::Idle, &mut canvas);
        canvas.take_ops();

        Fixture {
            store,
            registry,
            canvas,
            selection: SelectionController::default(),
        }
    }

    fn state_of(f: &Fixture, key: EntityKey) -> VisualState {
        f.registry.get(&key).unwrap().state()
    }

    #[test]
    fn test_select_restyles_and_flies() {
        let mut f = fixture();
        let citadel = EntityKey::place(1);

        f.selection.select(citadel, &f.store, &mut f.registry, &mut f.canvas);

        assert_eq!(f.selection.state(), SelectionState::Selected(citadel));
        assert_eq!(state_of(&f, citadel), VisualState::Selected);
        assert_eq!(f.canvas.view(), Some((LatLng::new(36.046, 14.239), FOCUS_ZOOM)));
    }

    #[test]
    fn test_select_demotes_previous() {
        let mut f = fixture();
        f.selection.select(EntityKey::place(1), &f.store, &mut f.registry, &mut f.canvas);
        f.selection.select(EntityKey::event(1), &f.store, &mut f.registry, &mut f.canvas);

        assert_eq!(state_of(&f, EntityKey::place(1)), VisualState::Idle);
        assert_eq!(state_of(&f, EntityKey::event(1)), VisualState::Selected);
    }

    #[test]
    fn test_hover_on_selected_is_noop() {
        let mut f = fixture();
        let citadel = EntityKey::place(1);
        f.selection.select(citadel, &f.store, &mut f.registry, &mut f.canvas);
        f.canvas.take_ops();

        f.selection.hover(citadel, true, &mut f.registry, &mut f.canvas);

        assert_eq!(state_of(&f, citadel), VisualState::Selected);
        assert_eq!(f.selection.hovered(), None);
        assert!(f.canvas.ops().is_empty());
    }

    #[test]
    fn test_hover_enter_and_leave() {
        let mut f = fixture();
        let ramla = EntityKey::place(2);
        let festa = EntityKey::event(1);

        f.selection.hover(ramla, true, &mut f.registry, &mut f.canvas);
        assert_eq!(state_of(&f, ramla), VisualState::Hovered);

        f.selection.hover(festa, true, &mut f.registry, &mut f.canvas);
        assert_eq!(state_of(&f, ramla), VisualState::Idle);
        assert_eq!(state_of(&f, festa), VisualState::Hovered);

        // Leaving a marker that is no longer hovered changes nothing.
        f.selection.hover(ramla, false, &mut f.registry, &mut f.canvas);
        assert_eq!(f.selection.hovered(), Some(festa));

        f.selection.hover(festa, false, &mut f.registry, &mut f.canvas);
        assert_eq!(state_of(&f, festa), VisualState::Idle);
        assert_eq!(f.selection.hovered(), None);
    }

    #[test]
    fn test_hovered_sits_between_idle_and_selected() {
        let mut f = fixture();
        f.selection.select(EntityKey::place(1), &f.store, &mut f.registry, &mut f.canvas);
        f.selection.hover(EntityKey::place(2), true, &mut f.registry, &mut f.canvas);

        let order: Vec<_> = f.registry.render_order().iter().map(|m| m.key()).collect();
        assert_eq!(order.last(), Some(&EntityKey::place(1)));
        assert_eq!(order[order.len() - 2], EntityKey::place(2));
    }

    #[test]
    fn test_select_without_coordinates_skips_viewport() {
        let mut f = fixture();
        let pending = EntityKey::place(3);

        f.selection.select(pending, &f.store, &mut f.registry, &mut f.canvas);

        assert_eq!(f.selection.selected(), Some(pending));
        assert!(!f.canvas.ops().iter().any(|op| matches!(op, CanvasOp::FlyTo(..))));
    }

    #[test]
    fn test_clear_restores_baseline() {
        let mut f = fixture();
        f.selection.hover(EntityKey::place(2), true, &mut f.registry, &mut f.canvas);
        f.selection.select(EntityKey::place(1), &f.store, &mut f.registry, &mut f.canvas);
        f.selection.clear(&mut f.registry, &mut f.canvas);

        assert_eq!(f.selection.state(), SelectionState::Idle);
        assert_eq!(state_of(&f, EntityKey::place(1)), VisualState::Idle);
        assert_eq!(state_of(&f, EntityKey::place(2)), VisualState::Idle);
    }

    #[test]
    fn test_reassert_drops_hover() {
        let mut f = fixture();
        f.selection.select(EntityKey::place(1), &f.store, &mut f.registry, &mut f.canvas);
        f.selection.hover(EntityKey::place(2), true, &mut f.registry, &mut f.canvas);

        f.selection.reassert(&mut f.registry, &mut f.canvas);

        assert_eq!(f.selection.hovered(), None);
        assert_eq!(state_of(&f, EntityKey::place(2)), VisualState::Idle);
        assert_eq!(state_of(&f, EntityKey::place(1)), VisualState::Selected);
    }
}
