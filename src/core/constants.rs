//! Engine-wide magic numbers, kept in one place so they are easy to tweak.

use crate::core::geo::LatLng;

/// Default square tile size in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit used when clamping the map center. Kept inside the true
/// Web-Mercator limit (~85.0511) so `ln(tan + sec)` stays finite.
pub const MAX_LATITUDE: f64 = 85.0;

/// Lowest zoom the controls can reach.
pub const MIN_ZOOM: u8 = 3;

/// Highest zoom the controls can reach.
pub const MAX_ZOOM: u8 = 18;

/// Zoom used on mount and on reset when no user location is known.
pub const DEFAULT_ZOOM: u8 = 12;

/// Zoom applied after a successful geolocation fix.
pub const LOCATED_ZOOM: u8 = 14;

/// Downtown Seattle, the default map center and geocoding fallback.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 47.6062,
    lng: -122.3321,
};

/// Viewport size used until the host reports a real one.
pub const DEFAULT_VIEWPORT_SIZE: (f64, f64) = (800.0, 600.0);

/// Earth radius in statute miles for Haversine distances.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Flat average driving speed for travel-time estimates.
pub const AVERAGE_SPEED_MPH: f64 = 25.0;

/// Markers further than this outside the viewport are not drawn.
pub const MARKER_CULL_MARGIN: f64 = 50.0;

/// Marker hit box, anchored at the bottom-center of the price pill.
pub const MARKER_HIT_WIDTH: f64 = 80.0;
pub const MARKER_HIT_HEIGHT: f64 = 28.0;
pub const MARKER_HIT_HEIGHT_WITH_DISTANCE: f64 = 44.0;

/// Popup card dimensions used for placement clamping.
pub const POPUP_WIDTH_RESERVE: f64 = 280.0;
pub const POPUP_HEIGHT_OFFSET: f64 = 200.0;
pub const POPUP_MIN_TOP: f64 = 20.0;

/// Accuracy rings are only drawn for fixes better than this (meters).
pub const ACCURACY_RING_MAX_METERS: f64 = 100.0;

/// Largest accuracy ring diameter in pixels.
pub const ACCURACY_RING_MAX_DIAMETER: f64 = 100.0;

/// Default geolocation request options.
pub const GEOLOCATION_TIMEOUT_MS: u64 = 10_000;
pub const GEOLOCATION_MAX_AGE_MS: u64 = 300_000;

/// Default tile cache capacity (tiles).
pub const TILE_CACHE_SIZE: usize = 512;
