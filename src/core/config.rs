//! Configuration for the map engine
//!
//! `MapConfig` bundles everything a host can tune: the starting view, zoom
//! limits, how drags are converted to coordinate deltas, geolocation request
//! options and tile caching. It serializes to JSON so a viewer can keep it on
//! disk, and every field has a default so partial files load cleanly.

use crate::{
    core::{
        constants::{
            DEFAULT_CENTER, DEFAULT_VIEWPORT_SIZE, DEFAULT_ZOOM, LOCATED_ZOOM, MARKER_CULL_MARGIN,
            MAX_ZOOM, MIN_ZOOM, TILE_CACHE_SIZE,
        },
        geo::{LatLng, Point},
    },
    geolocation::GeolocationOptions,
    tiles::source::MapStyle,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable pointing at a JSON config file.
pub const CONFIG_ENV_VAR: &str = "SITTERMAP_CONFIG";

/// How a drag's pixel delta is turned into a new center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PanMode {
    /// Longitude and latitude both move linearly with the pixel delta.
    /// Drifts from the true projection at high zoom and high latitude.
    #[default]
    Linear,
    /// Exact inverse Web-Mercator: the grabbed point stays under the pointer.
    Mercator,
}

/// Tile fetching and caching options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLoadingConfig {
    /// Number of decoded tiles kept in the LRU cache
    pub cache_size: usize,
    /// Imagery style shown on mount
    pub style: MapStyle,
    /// User-Agent sent to tile servers (OSM rejects anonymous clients)
    pub user_agent: String,
}

impl Default for TileLoadingConfig {
    fn default() -> Self {
        Self {
            cache_size: TILE_CACHE_SIZE,
            style: MapStyle::Standard,
            user_agent: concat!("sittermap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub viewport_size: Point,
    pub default_center: LatLng,
    pub default_zoom: u8,
    /// Zoom applied when centering on the user's location
    pub located_zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub pan_mode: PanMode,
    /// Markers further than this outside the viewport are culled
    pub marker_margin: f64,
    pub geolocation: GeolocationOptions,
    pub tiles: TileLoadingConfig,
    /// Fixed "current location" for hosts without a positioning service
    pub home_location: Option<LatLng>,
}

impl Default for MapConfig {
    fn default() -> Self {
        let (w, h) = DEFAULT_VIEWPORT_SIZE;
        Self {
            viewport_size: Point::new(w, h),
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            located_zoom: LOCATED_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            pan_mode: PanMode::default(),
            marker_margin: MARKER_CULL_MARGIN,
            geolocation: GeolocationOptions::default(),
            tiles: TileLoadingConfig::default(),
            home_location: None,
        }
    }
}

impl MapConfig {
    /// Central Seattle with a fixed home in Fremont, for desktop hosts
    /// without a positioning service
    pub fn seattle() -> Self {
        Self {
            home_location: Some(LatLng::new(47.6513, -122.3501)),
            ..Self::default()
        }
    }

    /// Loads a config from a JSON file and validates it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Parses and validates a JSON config
    pub fn from_json(text: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from `$SITTERMAP_CONFIG` when set, otherwise the defaults
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.is_empty() => {
                log::info!("loading map config from {}", path);
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Serializes to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the invariants the engine relies on
    pub fn validate(&self) -> Result<()> {
        if self.min_zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} is above max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.min_zoom < MIN_ZOOM || self.max_zoom > MAX_ZOOM {
            return Err(MapError::Config(format!(
                "zoom limits {}..={} fall outside {}..={}",
                self.min_zoom, self.max_zoom, MIN_ZOOM, MAX_ZOOM
            )));
        }
        for (name, zoom) in [("default_zoom", self.default_zoom), ("located_zoom", self.located_zoom)] {
            if !(self.min_zoom..=self.max_zoom).contains(&zoom) {
                return Err(MapError::Config(format!(
                    "{} {} is outside {}..={}",
                    name, zoom, self.min_zoom, self.max_zoom
                )));
            }
        }
        if self.viewport_size.x <= 0.0 || self.viewport_size.y <= 0.0 {
            return Err(MapError::Config("viewport_size must be positive".to_string()));
        }
        if self.marker_margin < 0.0 {
            return Err(MapError::Config("marker_margin must not be negative".to_string()));
        }
        if self.tiles.cache_size == 0 {
            return Err(MapError::Config("tiles.cache_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_zoom, 12);
        assert_eq!(config.located_zoom, 14);
        assert_eq!(config.pan_mode, PanMode::Linear);
        assert_eq!(config.geolocation.timeout_ms, 10_000);
        assert_eq!(config.geolocation.maximum_age_ms, 300_000);
        assert!(config.geolocation.enable_high_accuracy);
    }

    #[test]
    fn test_seattle_preset() {
        let config = MapConfig::seattle();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_center, DEFAULT_CENTER);
        assert!(config.home_location.is_some());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            MapConfig::from_json(r#"{"pan_mode": "mercator", "home_location": {"lat": 47.65, "lng": -122.35}}"#)
                .unwrap();
        assert_eq!(config.pan_mode, PanMode::Mercator);
        assert_eq!(config.home_location, Some(LatLng::new(47.65, -122.35)));
        assert_eq!(config.max_zoom, 18);
        assert_eq!(config.tiles.style, MapStyle::Standard);
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut config = MapConfig::default();
        config.tiles.style = MapStyle::Satellite;
        let json = config.to_json().unwrap();
        assert_eq!(MapConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_zoom_range_rejected() {
        let err = MapConfig::from_json(r#"{"min_zoom": 10, "max_zoom": 5}"#).unwrap_err();
        assert!(matches!(err, MapError::Config(_)));
    }

    #[test]
    fn test_zoom_limits_stay_within_tile_range() {
        for json in [
            r#"{"min_zoom": 0, "max_zoom": 22, "default_zoom": 1}"#,
            r#"{"min_zoom": 2}"#,
            r#"{"max_zoom": 19}"#,
            r#"{"default_zoom": 17, "max_zoom": 16}"#,
            r#"{"located_zoom": 4, "min_zoom": 5}"#,
        ] {
            assert!(
                matches!(MapConfig::from_json(json), Err(MapError::Config(_))),
                "{} should be rejected",
                json
            );
        }
        assert!(MapConfig::from_json(r#"{"min_zoom": 5, "max_zoom": 16}"#).is_ok());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = MapConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, MapError::Serialization(_)));
    }
}
