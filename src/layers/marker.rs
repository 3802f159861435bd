use crate::{
    core::geo::{distance_miles, travel_time_label, LatLng},
    data::{geocode::geocode_location, listing::Listing},
    geolocation::UserLocation,
};
use std::cmp::Ordering;

/// A listing placed on the map
#[derive(Debug, Clone, PartialEq)]
pub struct ListingMarker {
    pub id: String,
    pub coordinates: LatLng,
    pub hourly_rate: f64,
    /// Miles from the user, when their location is known
    pub distance_miles: Option<f64>,
    pub travel_time: Option<String>,
}

/// "18" for whole dollars, "18.5" otherwise
pub fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{:.0}", rate)
    } else {
        format!("{}", rate)
    }
}

impl ListingMarker {
    pub fn from_listing(listing: &Listing, user: Option<&UserLocation>) -> Self {
        let coordinates = geocode_location(&listing.location);
        let distance = user.map(|u| distance_miles(&u.lat_lng(), &coordinates));
        Self {
            id: listing.id.clone(),
            coordinates,
            hourly_rate: listing.hourly_rate,
            distance_miles: distance,
            travel_time: distance.map(travel_time_label),
        }
    }

    /// Badge text, e.g. "$18/hr"
    pub fn label(&self) -> String {
        format!("${}/hr", format_rate(self.hourly_rate))
    }

    /// Second badge line, e.g. "1.1 mi • 3 min". Only with a known distance.
    pub fn detail(&self) -> Option<String> {
        let miles = self.distance_miles?;
        let eta = self.travel_time.as_deref().unwrap_or_default();
        Some(format!("{:.1} mi • {}", miles, eta))
    }
}

/// Markers for `listings`. With a user location they are ordered nearest
/// first (stable on ties); without one the input order is kept.
pub fn build_markers(listings: &[Listing], user: Option<&UserLocation>) -> Vec<ListingMarker> {
    let mut markers: Vec<ListingMarker> = listings
        .iter()
        .map(|listing| ListingMarker::from_listing(listing, user))
        .collect();

    if user.is_some() {
        markers.sort_by(|a, b| {
            let (a, b) = (a.distance_miles.unwrap_or(0.0), b.distance_miles.unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        });
    }

    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::listing::sample_listings;

    fn at_fremont() -> UserLocation {
        UserLocation {
            lat: 47.6513,
            lng: -122.3501,
            accuracy: Some(20.0),
        }
    }

    #[test]
    fn test_labels() {
        let marker = ListingMarker::from_listing(&sample_listings()[2], None);
        assert_eq!(marker.label(), "$16/hr");
        assert_eq!(marker.detail(), None);

        let listing = Listing::new("x", "Fremont", 18.5);
        assert_eq!(ListingMarker::from_listing(&listing, None).label(), "$18.5/hr");
    }

    #[test]
    fn test_no_location_keeps_order() {
        let markers = build_markers(&sample_listings(), None);
        let ids: Vec<_> = markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert!(markers.iter().all(|m| m.distance_miles.is_none() && m.travel_time.is_none()));
    }

    #[test]
    fn test_sorted_by_distance_from_user() {
        let user = at_fremont();
        let markers = build_markers(&sample_listings(), Some(&user));
        assert_eq!(markers[0].id, "3");
        assert_eq!(markers[0].distance_miles, Some(0.0));
        assert_eq!(markers[0].travel_time.as_deref(), Some("0 min"));
        assert_eq!(markers[0].detail().as_deref(), Some("0.0 mi • 0 min"));

        for pair in markers.windows(2) {
            assert!(pair[0].distance_miles <= pair[1].distance_miles);
        }
    }

    #[test]
    fn test_equal_distances_keep_input_order() {
        let listings = vec![
            Listing::new("a", "Tacoma", 10.0),
            Listing::new("b", "Downtown Seattle", 10.0),
            Listing::new("c", "Nowhere", 10.0),
        ];
        // all three geocode to the default center
        let markers = build_markers(&listings, Some(&at_fremont()));
        let ids: Vec<_> = markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
