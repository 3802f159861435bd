pub mod cache;
pub mod loader;
pub mod source;

// Re-exports for convenience
pub use cache::{TileCache, TileKey};
#[cfg(feature = "tokio-runtime")]
pub use loader::TileLoader;
pub use loader::{TileFetcher, TileResult, TileState, TileTracker};
pub use source::{MapStyle, OpenStreetMapSource, SatelliteSource, TileSource};
