//! Prelude module for common sittermap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use sittermap::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{MapConfig, PanMode, TileLoadingConfig},
    geo::{distance_miles, travel_time_label, LatLng, Point, TileCoord},
    map::{InteractiveMap, PlacedMarker},
    viewport::Viewport,
};

pub use crate::data::{
    geocode::geocode_location,
    listing::{sample_listings, Listing},
    search::{filter_and_sort, SearchFilters, SortOption},
    source::{load_listings, ListingSource, ListingsLoad},
};

pub use crate::geolocation::{
    FixedLocator, GeoPosition, GeolocationError, GeolocationOptions, GeolocationProvider,
    UserLocation,
};

pub use crate::input::{
    events::{InputEvent, MapEvent},
    handler::InputHandler,
};

pub use crate::layers::marker::ListingMarker;

pub use crate::tiles::{MapStyle, TileKey, TileResult, TileState};

pub use crate::ui::{controls::MapControl, popup::PopupState};

pub use crate::{Error as MapError, Result};

pub use std::{collections::VecDeque, sync::Arc};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
