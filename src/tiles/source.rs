use crate::core::geo::TileCoord;
use serde::{Deserialize, Serialize};

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;

    /// Credit line shown in the map corner
    fn attribution(&self) -> &'static str;
}

/// The standard OpenStreetMap raster tiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenStreetMapSource;

impl TileSource for OpenStreetMapSource {
    fn url(&self, coord: TileCoord) -> String {
        format!("https://tile.openstreetmap.org/{}/{}/{}.png", coord.z, coord.x, coord.y)
    }

    fn attribution(&self) -> &'static str {
        "© OpenStreetMap"
    }
}

/// Esri World Imagery. Note the `{z}/{y}/{x}` order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SatelliteSource;

impl TileSource for SatelliteSource {
    fn url(&self, coord: TileCoord) -> String {
        format!(
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{}/{}/{}",
            coord.z, coord.y, coord.x
        )
    }

    fn attribution(&self) -> &'static str {
        "© Esri"
    }
}

/// Which imagery the map shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    #[default]
    Standard,
    Satellite,
}

impl MapStyle {
    pub fn toggled(self) -> Self {
        match self {
            MapStyle::Standard => MapStyle::Satellite,
            MapStyle::Satellite => MapStyle::Standard,
        }
    }

    pub fn source(self) -> &'static dyn TileSource {
        match self {
            MapStyle::Standard => &OpenStreetMapSource,
            MapStyle::Satellite => &SatelliteSource,
        }
    }

    pub fn attribution(self) -> &'static str {
        self.source().attribution()
    }

    pub fn tile_url(self, coord: TileCoord) -> String {
        self.source().url(coord)
    }

    /// Label for the style toggle button
    pub fn toggle_label(self) -> &'static str {
        match self {
            MapStyle::Standard => "Satellite",
            MapStyle::Satellite => "Map",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let coord = TileCoord::new(656, 1430, 12);
        assert_eq!(
            MapStyle::Standard.tile_url(coord),
            "https://tile.openstreetmap.org/12/656/1430.png"
        );
        assert_eq!(
            MapStyle::Satellite.tile_url(coord),
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/12/1430/656"
        );
    }

    #[test]
    fn test_toggle_and_attribution() {
        let style = MapStyle::default();
        assert_eq!(style.attribution(), "© OpenStreetMap");
        assert_eq!(style.toggled(), MapStyle::Satellite);
        assert_eq!(style.toggled().attribution(), "© Esri");
        assert_eq!(style.toggled().toggled(), style);
    }
}
