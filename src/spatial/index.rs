use crate::{
    core::geo::{LatLng, LatLngBounds},
    entity::EntityKey,
};

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A rendered marker position indexed via an R-tree
#[derive(Debug, Clone, Copy)]
pub struct SpatialItem {
    pub key: EntityKey,
    pub position: LatLng,
}

impl SpatialItem {
    pub fn new(key: EntityKey, position: LatLng) -> Self {
        Self { key, position }
    }

    fn coords(&self) -> [f64; 2] {
        [self.position.lng, self.position.lat]
    }
}

impl PartialEq for SpatialItem {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

// --- rstar integration -------------------------------------------------------------------------

impl RTreeObject for SpatialItem {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coords())
    }
}

impl PointDistance for SpatialItem {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let [x, y] = self.coords();
        let dx = x - point[0];
        let dy = y - point[1];
        dx * dx + dy * dy
    }
}

/// R-tree of rendered marker positions keyed by entity
#[derive(Debug, Default)]
pub struct SpatialIndex {
    rtree: RTree<SpatialItem>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: EntityKey, position: LatLng) {
        self.rtree.insert(SpatialItem::new(key, position));
    }

    /// Removes the entry for `key` recorded at `position`
    pub fn remove(&mut self, key: EntityKey, position: LatLng) -> bool {
        self.rtree.remove(&SpatialItem::new(key, position)).is_some()
    }

    pub fn relocate(&mut self, key: EntityKey, from: LatLng, to: LatLng) {
        if from != to {
            self.remove(key, from);
            self.insert(key, to);
        }
    }

    pub fn query(&self, bounds: &LatLngBounds) -> Vec<EntityKey> {
        let envelope = AABB::from_corners(
            [bounds.south_west.lng, bounds.south_west.lat],
            [bounds.north_east.lng, bounds.north_east.lat],
        );
        self.rtree
            .locate_in_envelope(&envelope)
            .map(|item| item.key)
            .collect()
    }

    /// Closest entry within `max_distance_m` meters of `point`
    pub fn nearest_within(&self, point: &LatLng, max_distance_m: f64) -> Option<EntityKey> {
        self.rtree
            .nearest_neighbor_iter(&[point.lng, point.lat])
            .map(|item| (item.key, item.position.distance_to(point)))
            .take(8)
            .filter(|(_, distance)| *distance <= max_distance_m)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(key, _)| key)
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        if self.rtree.size() == 0 {
            return None;
        }
        let env = self.rtree.root().envelope();
        Some(LatLngBounds::from_coords(
            env.lower()[1],
            env.lower()[0],
            env.upper()[1],
            env.upper()[0],
        ))
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_and_remove() {
        let mut index = SpatialIndex::new();
        index.insert(EntityKey::place(1), LatLng::new(36.04, 14.24));
        index.insert(EntityKey::event(1), LatLng::new(36.06, 14.28));
        index.insert(EntityKey::place(2), LatLng::new(35.90, 14.50));

        let gozo = LatLngBounds::from_coords(36.0, 14.1, 36.1, 14.35);
        let mut found = index.query(&gozo);
        found.sort();
        assert_eq!(found, vec![EntityKey::place(1), EntityKey::event(1)]);

        assert!(index.remove(EntityKey::event(1), LatLng::new(36.06, 14.28)));
        assert!(!index.remove(EntityKey::event(1), LatLng::new(36.06, 14.28)));
        assert_eq!(index.query(&gozo), vec![EntityKey::place(1)]);
    }

    #[test]
    fn test_same_position_different_kinds() {
        let mut index = SpatialIndex::new();
        let spot = LatLng::new(36.0, 14.2);
        index.insert(EntityKey::place(5), spot);
        index.insert(EntityKey::event(5), spot);

        assert!(index.remove(EntityKey::place(5), spot));
        assert_eq!(index.len(), 1);
        assert_eq!(index.nearest_within(&spot, 1.0), Some(EntityKey::event(5)));
    }

    #[test]
    fn test_nearest_within_radius() {
        let mut index = SpatialIndex::new();
        index.insert(EntityKey::place(1), LatLng::new(36.0, 14.2));

        assert_eq!(
            index.nearest_within(&LatLng::new(36.0001, 14.2), 50.0),
            Some(EntityKey::place(1))
        );
        assert_eq!(index.nearest_within(&LatLng::new(36.1, 14.2), 50.0), None);
    }

    #[test]
    fn test_bounds_and_relocate() {
        let mut index = SpatialIndex::new();
        assert!(index.bounds().is_none());

        index.insert(EntityKey::place(1), LatLng::new(36.0, 14.2));
        index.insert(EntityKey::place(2), LatLng::new(36.1, 14.3));
        index.relocate(EntityKey::place(2), LatLng::new(36.1, 14.3), LatLng::new(35.9, 14.1));

        let bounds = index.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(35.9, 14.1));
        assert_eq!(bounds.north_east, LatLng::new(36.0, 14.2));
    }
}
