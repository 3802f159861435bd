use crate::core::{
    bounds::Bounds,
    config::PanMode,
    constants::{DEFAULT_VIEWPORT_SIZE, MAX_ZOOM, MIN_ZOOM, TILE_SIZE},
    geo::{self, LatLng, Point, TileCoord},
};
use serde::{Deserialize, Serialize};

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view. Latitude is clamped, longitude never is.
    pub center: LatLng,
    /// The current (integer) zoom level
    pub zoom: u8,
    /// The size of the viewport in pixels
    pub size: Point,
    /// Pixel displacement applied by drags since the last reset
    pub pan: Point,
    /// The minimum allowed zoom level
    pub min_zoom: u8,
    /// The maximum allowed zoom level
    pub max_zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        let (w, h) = DEFAULT_VIEWPORT_SIZE;
        Self::new(
            crate::core::constants::DEFAULT_CENTER,
            crate::core::constants::DEFAULT_ZOOM,
            Point::new(w, h),
        )
    }
}

impl Viewport {
    /// Creates a new viewport with the standard `[3, 18]` zoom limits
    pub fn new(center: LatLng, zoom: u8, size: Point) -> Self {
        Self {
            center: center.clamped(),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            size,
            pan: Point::default(),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    /// Sets the zoom limits, re-clamping the current zoom. Limits never
    /// leave `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom_limits(&mut self, min_zoom: u8, max_zoom: u8) {
        self.min_zoom = min_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.max_zoom = max_zoom.clamp(self.min_zoom, MAX_ZOOM);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the center, clamping latitude
    pub fn set_center(&mut self, center: LatLng) {
        self.center = center.clamped();
    }

    /// Sets the zoom level, clamping to the allowed range
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Steps the zoom by `delta` levels, clamping to the allowed range
    pub fn zoom_by(&mut self, delta: i32) {
        let target = (self.zoom as i32 + delta).clamp(self.min_zoom as i32, self.max_zoom as i32);
        self.zoom = target as u8;
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Clears the accumulated drag offset
    pub fn reset_pan(&mut self) {
        self.pan = Point::default();
    }

    /// World size in pixels at the current zoom
    pub fn scale(&self) -> f64 {
        geo::world_scale(self.zoom)
    }

    /// Projects a LatLng to world pixel coordinates at the current zoom
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        geo::project(lat_lng, self.zoom)
    }

    /// World-pixel position of the viewport's top-left corner
    fn world_top_left(&self) -> Point {
        let center = self.project(&self.center);
        Point::new(center.x - self.size.x / 2.0, center.y - self.size.y / 2.0)
    }

    /// Converts a geographical coordinate to container-relative pixels
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        self.project(lat_lng).subtract(&self.world_top_left())
    }

    /// Converts container-relative pixels back to a coordinate
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        geo::unproject(&pixel.add(&self.world_top_left()), self.zoom)
    }

    /// Container-relative position of a tile's top-left corner
    pub fn tile_offset(&self, tile: &TileCoord) -> Point {
        tile.world_origin().subtract(&self.world_top_left())
    }

    /// Pixel bounds of the visible surface
    pub fn pixel_bounds(&self) -> Bounds {
        Bounds::from_size(self.size)
    }

    /// Tiles covering the viewport plus a one-tile margin, clipped to the
    /// tile grid at the current zoom.
    pub fn tiles_in_view(&self) -> Vec<TileCoord> {
        let top_left = self.world_top_left();
        let n = TileCoord::grid_size(self.zoom);

        let first = |px: f64| ((px / TILE_SIZE).floor() as i64 - 1).max(0);
        let last = |px: f64| ((px / TILE_SIZE).floor() as i64 + 1).min(n - 1);

        let (min_x, max_x) = (first(top_left.x), last(top_left.x + self.size.x));
        let (min_y, max_y) = (first(top_left.y), last(top_left.y + self.size.y));

        let mut tiles = Vec::new();
        for x in min_x..=max_x {
            for y in min_y..=max_y {
                if let Some(tile) = TileCoord::from_index(x, y, self.zoom) {
                    tiles.push(tile);
                }
            }
        }
        tiles
    }

    /// Moves the center for a drag that started at `anchor` with the pointer
    /// now `delta` pixels away from where it went down.
    pub fn pan_from_anchor(&mut self, anchor: LatLng, delta: Point, mode: PanMode) {
        let center = match mode {
            PanMode::Linear => {
                let scale = self.scale();
                let lng_delta = -(delta.x / scale) * 360.0;
                let lat_delta = (delta.y / scale) * 180.0;
                LatLng::new(anchor.lat + lat_delta, anchor.lng + lng_delta)
            }
            PanMode::Mercator => {
                let anchor_px = self.project(&anchor);
                geo::unproject(&anchor_px.subtract(&delta), self.zoom)
            }
        };
        self.set_center(center);
    }
}
