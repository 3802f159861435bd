//! Map chrome as plain state: what the host draws around the tiles.

pub mod controls;
pub mod popup;

pub use controls::{control_states, status_line, ControlState, MapControl};
pub use popup::PopupState;

/// Overlay text shown until the first tile arrives
pub const LOADING_TILES_TEXT: &str = "Loading map tiles...";

/// Placeholder colours for a tile that failed to load, as RGB
pub const FAILED_TILE_FILL: [u8; 3] = [0xf3, 0xf4, 0xf6];
pub const FAILED_TILE_BORDER: [u8; 3] = [0xd1, 0xd5, 0xdb];
