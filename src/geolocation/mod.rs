//! One-shot position lookups
//!
//! The engine asks a [`GeolocationProvider`] for the current position and
//! gets back either a fix or one of a handful of classified failures. Hosts
//! pick the provider: a configured fixed location on desktop, the browser's
//! positioning API under the `wasm` feature.

mod provider;

#[cfg(feature = "wasm")]
pub mod browser;

pub use provider::{CachedLocator, FixedLocator, UnsupportedLocator};

use crate::core::{
    constants::{
        ACCURACY_RING_MAX_DIAMETER, ACCURACY_RING_MAX_METERS, GEOLOCATION_MAX_AGE_MS,
        GEOLOCATION_TIMEOUT_MS,
    },
    geo::LatLng,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Options passed along with every position request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationOptions {
    pub enable_high_accuracy: bool,
    /// Give up after this many milliseconds
    pub timeout_ms: u64,
    /// Accept a cached fix no older than this
    pub maximum_age_ms: u64,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: GEOLOCATION_TIMEOUT_MS,
            maximum_age_ms: GEOLOCATION_MAX_AGE_MS,
        }
    }
}

/// A position fix as reported by a provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of the 95% confidence circle, in meters
    pub accuracy: Option<f64>,
}

/// The user's location as held by the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub lat: f64,
    pub lng: f64,
    pub accuracy: Option<f64>,
}

impl UserLocation {
    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Pixel diameter of the accuracy ring, if the fix is tight enough to
    /// be worth drawing one.
    pub fn accuracy_ring_diameter(&self) -> Option<f64> {
        match self.accuracy {
            Some(meters) if meters > 0.0 && meters < ACCURACY_RING_MAX_METERS => {
                Some((meters / 10.0).min(ACCURACY_RING_MAX_DIAMETER))
            }
            _ => None,
        }
    }
}

impl From<GeoPosition> for UserLocation {
    fn from(position: GeoPosition) -> Self {
        Self {
            lat: position.latitude,
            lng: position.longitude,
            accuracy: position.accuracy,
        }
    }
}

/// Why a position request failed. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location access denied. Please enable location services.")]
    PermissionDenied,

    #[error("Location information unavailable.")]
    PositionUnavailable,

    #[error("Location request timed out.")]
    Timeout,

    #[error("Geolocation is not supported on this platform.")]
    Unsupported,

    #[error("Unable to get your location")]
    Unknown(String),
}

impl GeolocationError {
    /// Maps a W3C `GeolocationPositionError.code` onto the classified errors
    pub fn from_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Unknown(message.into()),
        }
    }
}

/// Anything that can answer "where am I?" once.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<GeoPosition, GeolocationError>;
}
