//! Map overlays. Tiles are drawn by the host; the engine only positions
//! listing markers.

pub mod marker;

pub use marker::{build_markers, ListingMarker};
