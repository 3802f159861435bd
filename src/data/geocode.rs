//! Static neighbourhood lookup. Not a geocoding service: a closed table of
//! the areas sitters list, with Downtown Seattle standing in for anything
//! the table does not know.

use crate::core::{constants::DEFAULT_CENTER, geo::LatLng};
use fxhash::FxHashMap;
use once_cell::sync::Lazy;

static LOCATIONS: Lazy<FxHashMap<&'static str, LatLng>> = Lazy::new(|| {
    [
        ("Downtown Seattle", LatLng::new(47.6062, -122.3321)),
        ("Capitol Hill", LatLng::new(47.6205, -122.3212)),
        ("Fremont", LatLng::new(47.6513, -122.3501)),
        ("Ballard", LatLng::new(47.6685, -122.3834)),
        ("Queen Anne", LatLng::new(47.6236, -122.3564)),
        ("Wallingford", LatLng::new(47.6615, -122.334)),
        ("University District", LatLng::new(47.6587, -122.3138)),
        ("Beacon Hill", LatLng::new(47.5739, -122.3089)),
    ]
    .into_iter()
    .collect()
});

/// Coordinate for a location name. Exact match; unknown names get the
/// default center. Never fails.
pub fn geocode_location(name: &str) -> LatLng {
    LOCATIONS.get(name).copied().unwrap_or(DEFAULT_CENTER)
}

/// Whether `name` is in the table
pub fn is_known_location(name: &str) -> bool {
    LOCATIONS.contains_key(name)
}

/// All known location names, sorted
pub fn known_locations() -> Vec<&'static str> {
    let mut names: Vec<_> = LOCATIONS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_locations() {
        assert_eq!(geocode_location("Fremont"), LatLng::new(47.6513, -122.3501));
        assert_eq!(geocode_location("Beacon Hill"), LatLng::new(47.5739, -122.3089));
        assert_eq!(known_locations().len(), 8);
        assert!(is_known_location("Ballard"));
    }

    #[test]
    fn test_unknown_falls_back_to_downtown() {
        for name in ["", "Tacoma", "fremont", "Downtown Seattle "] {
            assert_eq!(geocode_location(name), DEFAULT_CENTER);
        }
        assert!(!is_known_location("Tacoma"));
    }
}
