use crate::core::{bounds::Bounds, geo::Point};

/// Screen-space culling helpers.
pub struct Culling;

impl Culling {
    /// Whether a marker at `pixel` should be drawn on a surface of `size`.
    /// Markers up to `margin` pixels outside any edge are kept so their
    /// labels do not pop in at the border.
    pub fn marker_visible(size: Point, pixel: &Point, margin: f64) -> bool {
        Bounds::from_size(size).expanded(margin).contains(pixel)
    }
}
