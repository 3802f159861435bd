use crate::core::constants::{AVERAGE_SPEED_MPH, EARTH_RADIUS_MILES, MAX_LATITUDE, TILE_SIZE};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Calculates the great-circle distance to another LatLng in miles
    pub fn distance_miles_to(&self, other: &LatLng) -> f64 {
        distance_miles(self, other)
    }

    /// Clamps latitude to the range the map center may occupy
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Returns a copy with the latitude clamped. Longitude is left alone.
    pub fn clamped(&self) -> Self {
        Self::new(Self::clamp_lat(self.lat), self.lng)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or world-pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Haversine distance between two coordinates, in miles.
pub fn distance_miles(a: &LatLng, b: &LatLng) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Rough driving time for a distance at a flat city speed.
///
/// Under an hour renders as `"N min"`; otherwise `"Hh Mm"`, or just `"Hh"`
/// when the minutes come out to zero.
pub fn travel_time_label(distance_miles: f64) -> String {
    let minutes = (distance_miles / AVERAGE_SPEED_MPH * 60.0).round().max(0.0) as u64;

    if minutes < 60 {
        format!("{} min", minutes)
    } else {
        let hours = minutes / 60;
        let rest = minutes % 60;
        if rest > 0 {
            format!("{}h {}m", hours, rest)
        } else {
            format!("{}h", hours)
        }
    }
}

/// World size in pixels at an integer zoom level.
pub fn world_scale(zoom: u8) -> f64 {
    2_f64.powi(zoom as i32) * TILE_SIZE
}

/// Mercator y in unit space, `(1 - ln(tan φ + sec φ) / π) / 2`.
fn mercator_unit_y(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

/// Projects a coordinate into world-pixel space at `zoom`.
///
/// Tile placement and marker placement both go through here so they can
/// never disagree.
pub fn project(lat_lng: &LatLng, zoom: u8) -> Point {
    let scale = world_scale(zoom);
    Point::new(
        (lat_lng.lng + 180.0) / 360.0 * scale,
        mercator_unit_y(lat_lng.lat) * scale,
    )
}

/// Inverse of [`project`].
pub fn unproject(pixel: &Point, zoom: u8) -> LatLng {
    let scale = world_scale(zoom);
    let lng = pixel.x / scale * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * pixel.y / scale)).sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// Raw slippy-map tile index for a coordinate. May fall outside
/// `[0, 2^zoom)` when the longitude has drifted past ±180.
pub fn tile_index(lat_lng: &LatLng, zoom: u8) -> (i64, i64) {
    let n = 2_f64.powi(zoom as i32);
    let x = ((lat_lng.lng + 180.0) / 360.0 * n).floor() as i64;
    let y = (mercator_unit_y(lat_lng.lat) * n).floor() as i64;
    (x, y)
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Tile containing `lat_lng` at `zoom`, or `None` if the index is off
    /// the tile grid.
    pub fn from_lat_lng(lat_lng: &LatLng, zoom: u8) -> Option<Self> {
        let (x, y) = tile_index(lat_lng, zoom);
        Self::from_index(x, y, zoom)
    }

    /// Builds a tile from signed indices, rejecting anything outside the grid.
    pub fn from_index(x: i64, y: i64, zoom: u8) -> Option<Self> {
        let n = Self::grid_size(zoom);
        if x < 0 || y < 0 || x >= n || y >= n {
            return None;
        }
        Some(Self::new(x as u32, y as u32, zoom))
    }

    /// Number of tiles along one axis at `zoom`.
    pub fn grid_size(zoom: u8) -> i64 {
        1_i64 << zoom
    }

    /// World-pixel position of the tile's north-west corner.
    pub fn world_origin(&self) -> Point {
        Point::new(self.x as f64 * TILE_SIZE, self.y as f64 * TILE_SIZE)
    }

    /// Checks if the tile is valid for its zoom level
    pub fn is_valid(&self) -> bool {
        let n = Self::grid_size(self.z);
        (self.x as i64) < n && (self.y as i64) < n
    }
}
