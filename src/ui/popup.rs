use crate::core::{
    constants::{POPUP_HEIGHT_OFFSET, POPUP_MIN_TOP, POPUP_WIDTH_RESERVE},
    geo::Point,
};

/// The single listing popup. At most one is open at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopupState {
    pub open_listing_id: Option<String>,
    /// Marker position the popup was opened at, container-relative
    pub pixel_position: Point,
}

impl PopupState {
    pub fn open(&mut self, listing_id: impl Into<String>, pixel_position: Point) {
        self.open_listing_id = Some(listing_id.into());
        self.pixel_position = pixel_position;
    }

    pub fn close(&mut self) {
        self.open_listing_id = None;
    }

    pub fn is_open(&self) -> bool {
        self.open_listing_id.is_some()
    }

    pub fn is_open_for(&self, listing_id: &str) -> bool {
        self.open_listing_id.as_deref() == Some(listing_id)
    }

    /// Top-left corner for the popup card on a surface of `size`, kept clear
    /// of the right edge and the top.
    pub fn placement(&self, size: Point) -> Point {
        Point::new(
            self.pixel_position.x.min(size.x - POPUP_WIDTH_RESERVE),
            (self.pixel_position.y - POPUP_HEIGHT_OFFSET).max(POPUP_MIN_TOP),
        )
    }
}
