mod viewer;

use anyhow::Context;
use sittermap::{
    data::source::{load_listings, ListingSource, RestListingSource, StoreConfig},
    MapConfig,
};
use viewer::SitterMapApp;

/// Standalone sitter map viewer
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = MapConfig::load().context("loading map config")?;

    let source = StoreConfig::from_env().map(RestListingSource::new);
    let listings = load_listings(source.as_ref().map(|s| s as &dyn ListingSource)).await;
    log::info!(
        "{} listings loaded{}",
        listings.listings.len(),
        if listings.from_fallback { " (sample data)" } else { "" }
    );

    let app = SitterMapApp::new(config, listings, tokio::runtime::Handle::current())?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Sitter Map"),
        ..Default::default()
    };

    eframe::run_native(
        "sittermap-app",
        options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with error: {}", e))?;

    Ok(())
}
