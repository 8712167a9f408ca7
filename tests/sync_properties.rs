use mapdash::prelude::*;

/// End-to-end behavior of the synchronization pipeline as seen from the coordinator
#[cfg(test)]
mod sync_properties {
    use super::*;

    fn coordinator() -> SyncCoordinator<RecordingCanvas> {
        SyncCoordinator::new(&DashboardConfig::default(), RecordingCanvas::new())
    }

    fn seeded() -> SyncCoordinator<RecordingCanvas> {
        let mut sync = coordinator();
        sync.on_loaded(
            vec![
                Entity::place(1, "Ramla Bay").with_category("Beach").with_position(36.061, 14.284),
                Entity::place(2, "Xlendi Bay").with_category("Beach").with_position(36.029, 14.215),
                Entity::place(3, "Citadel Walk").with_category("Tours").with_position(36.046, 14.239),
            ],
            vec![
                Entity::event(1, "Carnival").with_position(36.044, 14.240),
                Entity::event(2, "Bay Festival").with_position(36.025, 14.299),
            ],
        );
        sync
    }

    #[test]
    fn test_namespacing_place_and_event_with_same_id() {
        let mut sync = coordinator();
        sync.on_created(Entity::place(5, "Place five").with_position(36.0, 14.2));
        sync.on_created(Entity::event(5, "Event five").with_position(36.0, 14.2));

        let place_marker = sync.registry().get(&EntityKey::place(5)).unwrap().id();
        let event_marker = sync.registry().get(&EntityKey::event(5)).unwrap().id();
        assert_ne!(place_marker, event_marker);

        sync.on_deleted(EntityKey::place(5));
        assert_eq!(
            sync.registry().get(&EntityKey::event(5)).map(|m| m.id()),
            Some(event_marker)
        );
    }

    #[test]
    fn test_filter_composition() {
        let mut sync = seeded();
        sync.set_filter(FilterState::new().with_type(TypeFilter::All).with_categories(["Beach"]));

        let mut keys: Vec<_> = sync.registry().keys().into_iter().collect();
        keys.sort();
        assert_eq!(keys, vec![EntityKey::place(1), EntityKey::place(2)]);
    }

    #[test]
    fn test_events_gating() {
        let mut sync = seeded();
        assert_eq!(sync.registry().len(), 5);

        sync.set_filter(FilterState::new().with_categories(["Tours"]));
        let keys = sync.registry().keys();
        assert!(!keys.contains(&EntityKey::event(1)));
        assert!(!keys.contains(&EntityKey::event(2)));
        assert!(keys.contains(&EntityKey::place(3)));
    }

    #[test]
    fn test_reconciliation_convergence_under_burst() {
        let mut sync = seeded();
        let bay_id = sync.registry().get(&EntityKey::event(2)).unwrap().id();

        // Overlapping create + update + delete settle in an arbitrary order.
        sync.on_updated(Entity::event(2, "Bay Festival").with_position(36.026, 14.299));
        sync.on_created(Entity::place(4, "Dwejra").with_category("Landscape").with_position(36.05, 14.19));
        sync.on_deleted(EntityKey::place(1));
        sync.on_updated(Entity::place(4, "Dwejra Bay").with_category("Landscape").with_position(36.05, 14.19));
        sync.rerender();
        sync.rerender();

        let expected: HashSet<_> = sync
            .store()
            .iter()
            .filter(|e| e.is_renderable())
            .map(|e| e.key())
            .collect();
        assert_eq!(sync.registry().keys(), expected);
        assert_eq!(sync.canvas().attached_count(), expected.len());
        assert_eq!(sync.registry().get(&EntityKey::event(2)).unwrap().id(), bay_id);
        assert_eq!(sync.registry().get(&EntityKey::place(4)).unwrap().title(), "Dwejra Bay");
    }

    #[test]
    fn test_no_duplicate_canvas_markers_after_many_passes() {
        let mut sync = seeded();
        for _ in 0..5 {
            sync.toggle_category("Beach");
            sync.set_search("a");
            sync.set_search("");
        }
        sync.set_filter(FilterState::default());

        assert_eq!(sync.canvas().attached_count(), sync.registry().len());
        assert_eq!(sync.registry().len(), 5);
    }

    #[test]
    fn test_selection_hover_precedence() {
        let mut sync = seeded();
        let citadel = EntityKey::place(3);

        sync.select(citadel);
        sync.hover(citadel, true);

        assert_eq!(sync.registry().get(&citadel).unwrap().state(), VisualState::Selected);
        assert_eq!(sync.state().selection().hovered(), None);
    }

    #[test]
    fn test_hover_does_not_survive_rerender() {
        let mut sync = seeded();
        sync.hover(EntityKey::place(1), true);
        assert_eq!(
            sync.registry().get(&EntityKey::place(1)).unwrap().state(),
            VisualState::Hovered
        );

        sync.rerender();

        assert_eq!(sync.state().selection().hovered(), None);
        assert_eq!(
            sync.registry().get(&EntityKey::place(1)).unwrap().state(),
            VisualState::Idle
        );
    }

    #[test]
    fn test_idempotent_delete() {
        let mut sync = seeded();
        sync.on_deleted(EntityKey::place(2));
        let after_first: Vec<Entity> = sync.store().iter().cloned().collect();
        let markers_after_first = sync.registry().keys();

        sync.on_deleted(EntityKey::place(2));

        assert_eq!(sync.store().iter().cloned().collect::<Vec<_>>(), after_first);
        assert_eq!(sync.registry().keys(), markers_after_first);
    }

    #[test]
    fn test_unrenderable_exclusion() {
        let mut sync = seeded();
        let pending = Entity::from_record(
            EntityKind::Place,
            serde_json::json!({ "id": 9, "name": "Pending", "latitude": null, "longitude": 14.2 }),
        )
        .unwrap();
        let report = sync.on_created(pending);

        assert_eq!(report.skipped, vec![EntityKey::place(9)]);
        assert!(!sync.registry().contains(&EntityKey::place(9)));
        assert!(sync.store().all(None).iter().any(|e| e.key() == EntityKey::place(9)));
    }

    #[test]
    fn test_list_view_is_alphabetical_and_filtered() {
        let mut sync = seeded();
        sync.set_search("bay");

        let names: Vec<_> = sync.list_view().iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["Bay Festival", "Ramla Bay", "Xlendi Bay"]);
    }

    #[test]
    fn test_markers_in_view() {
        let sync = seeded();
        let south_east = LatLngBounds::from_coords(36.0, 14.28, 36.07, 14.31);

        let mut keys = sync.registry().query_bounds(&south_east);
        keys.sort();
        assert_eq!(keys, vec![EntityKey::place(1), EntityKey::event(2)]);
        assert!(sync.registry().bounds().unwrap().contains(&LatLng::new(36.046, 14.239)));
    }
}
