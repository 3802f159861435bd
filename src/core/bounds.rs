use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in viewport pixels. All edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The whole drawing surface, top-left at the origin
    pub fn from_size(size: Point) -> Self {
        Self::new(Point::default(), size)
    }

    /// A badge of `width` x `height` standing on `anchor`, horizontally
    /// centered on it. Markers are drawn this way.
    pub fn badge(anchor: Point, width: f64, height: f64) -> Self {
        let half = width / 2.0;
        Self::new(
            Point::new(anchor.x - half, anchor.y - height),
            Point::new(anchor.x + half, anchor.y),
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, point: &Point) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// Grown by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Bounds {
        let grow = Point::new(margin, margin);
        Bounds::new(self.min.subtract(&grow), self.max.add(&grow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_edges_are_inclusive() {
        let b = Bounds::from_size(Point::new(800.0, 600.0));
        assert!(b.contains(&Point::new(0.0, 0.0)));
        assert!(b.contains(&Point::new(800.0, 600.0)));
        assert!(!b.contains(&Point::new(800.1, 10.0)));
    }

    #[test]
    fn test_badge_sits_above_anchor() {
        let badge = Bounds::badge(Point::new(100.0, 100.0), 80.0, 28.0);
        assert_eq!(badge.width(), 80.0);
        assert_eq!(badge.height(), 28.0);
        assert!(badge.contains(&Point::new(60.0, 72.0)));
        assert!(!badge.contains(&Point::new(100.0, 101.0)));
    }

    #[test]
    fn test_margin_grows_every_side() {
        let b = Bounds::from_size(Point::new(100.0, 100.0)).expanded(50.0);
        assert_eq!(b.width(), 200.0);
        assert_eq!(b.height(), 200.0);
        assert!(b.contains(&Point::new(-50.0, 150.0)));
        assert!(!b.contains(&Point::new(150.5, 0.0)));
    }
}
