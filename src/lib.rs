//! # sittermap
//!
//! Map engine and marketplace plumbing for a childcare marketplace.
//!
//! The heart of the crate is a small slippy-map engine: Web-Mercator tile
//! addressing, pixel projection, drag-to-pan, discrete zoom, geolocation
//! recentering and distance/ETA estimation for sitter listings. Around it
//! sit the listing data layer, search filtering, the booking flow and the
//! identity-provider webhook.
//!
//! Nothing here is tied to a rendering surface; `sittermap-app` drives the
//! engine from an egui window.

pub mod booking;
pub mod core;
pub mod data;
pub mod geolocation;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod spatial;
pub mod tiles;
pub mod ui;
pub mod webhook;

pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::Bounds,
    config::{MapConfig, PanMode},
    geo::{distance_miles, travel_time_label, LatLng, Point, TileCoord},
    map::InteractiveMap,
    viewport::Viewport,
};

pub use data::{
    geocode::geocode_location,
    listing::{sample_listings, Listing},
    search::{filter_and_sort, SearchFilters, SortOption},
};

pub use geolocation::{GeoPosition, GeolocationError, GeolocationProvider, UserLocation};

pub use input::{events::InputEvent, events::MapEvent, handler::InputHandler};

pub use layers::marker::ListingMarker;

pub use tiles::source::{MapStyle, TileSource};

pub use ui::{controls::MapControl, popup::PopupState};

pub use webhook::{WebhookHandler, WebhookRequest, WebhookResponse};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("Webhook error: {0}")]
    Webhook(#[from] webhook::WebhookError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Booking error: {0}")]
    Booking(String),

    #[error("Tile error: {0}")]
    Tile(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Install `env_logger` with an `info` default filter.
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
