use serde::{Deserialize, Serialize};

/// Mean earth radius used for great-circle distances
const EARTH_RADIUS: f64 = 6378137.0;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a coordinate from optional parts.
    ///
    /// Returns `None` unless both parts are present and finite; an entity
    /// without a usable position cannot be placed on the map.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Self::new(lat, lng))
            }
            _ => None,
        }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Calculates the distance in meters to another LatLng using the Haversine formula
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Smallest bounds enclosing every point, or `None` for an empty iterator
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(*first, *first);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(36.045, 14.25);
        assert_eq!(coord.lat, 36.045);
        assert_eq!(coord.lng, 14.25);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_from_parts_rejects_missing_and_non_finite() {
        assert!(LatLng::from_parts(Some(36.0), Some(14.0)).is_some());
        assert!(LatLng::from_parts(None, Some(14.0)).is_none());
        assert!(LatLng::from_parts(Some(36.0), None).is_none());
        assert!(LatLng::from_parts(Some(f64::NAN), Some(14.0)).is_none());
        assert!(LatLng::from_parts(Some(36.0), Some(f64::INFINITY)).is_none());
    }

    #[test]
    fn test_lat_lng_distance() {
        let victoria = LatLng::new(36.0443, 14.2397);
        let mgarr = LatLng::new(36.0250, 14.2990);
        let distance = victoria.distance_to(&mgarr);

        // Roughly 5.7 km across the island
        assert!((distance - 5_700.0).abs() < 500.0);
    }

    #[test]
    fn test_bounds_from_points() {
        let points = [
            LatLng::new(36.0, 14.2),
            LatLng::new(36.1, 14.1),
            LatLng::new(35.9, 14.3),
        ];
        let bounds = LatLngBounds::from_points(points.iter()).unwrap();

        assert_eq!(bounds.south_west, LatLng::new(35.9, 14.1));
        assert_eq!(bounds.north_east, LatLng::new(36.1, 14.3));
        assert!(bounds.contains(&LatLng::new(36.0, 14.2)));
        assert!(!bounds.contains(&LatLng::new(37.0, 14.2)));
        assert!(LatLngBounds::from_points(std::iter::empty()).is_none());
    }
}
