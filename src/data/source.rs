//! Where listings come from
//!
//! The hosted store is reached through its PostgREST endpoint. When it is
//! not configured, or the request fails, the built-in sample dataset is
//! served instead so the map and search views are never empty.

use crate::{
    data::listing::{sample_listings, Listing},
    Result,
};
use async_trait::async_trait;

pub const STORE_URL_ENV: &str = "SUPABASE_URL";
pub const STORE_KEY_ENV: &str = "SUPABASE_ANON_KEY";
/// Sitters shown on the map page
pub const LISTING_LIMIT: usize = 4;

/// Connection details for the hosted listing store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub anon_key: String,
}

impl StoreConfig {
    /// Reads the store URL and key from the environment. Missing either one
    /// means the store is not configured.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var(STORE_URL_ENV).ok().filter(|v| !v.is_empty());
        let anon_key = std::env::var(STORE_KEY_ENV).ok().filter(|v| !v.is_empty());

        if url.is_none() {
            log::warn!("{} is not set. Listing store features will be disabled.", STORE_URL_ENV);
        }
        if anon_key.is_none() {
            log::warn!("{} is not set. Listing store features will be disabled.", STORE_KEY_ENV);
        }

        Some(Self {
            url: url?,
            anon_key: anon_key?,
        })
    }
}

/// Something that can produce the bookable listings
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Available, verified sitters, best rated first
    async fn fetch_available(&self) -> Result<Vec<Listing>>;
}

/// Reads listings from the store's REST interface
pub struct RestListingSource {
    client: reqwest::Client,
    config: StoreConfig,
}

impl RestListingSource {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Full query URL for the available-sitters request
    pub fn query_url(&self) -> String {
        format!(
            "{}/rest/v1/babysitters?select=*&availability_status=eq.available&is_verified=eq.true&order=rating.desc&limit={}",
            self.config.url.trim_end_matches('/'),
            LISTING_LIMIT
        )
    }
}

#[async_trait]
impl ListingSource for RestListingSource {
    async fn fetch_available(&self) -> Result<Vec<Listing>> {
        let listings = self
            .client
            .get(self.query_url())
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Listing>>()
            .await?;

        log::info!("fetched {} listings from store", listings.len());
        Ok(listings)
    }
}

/// Outcome of loading listings for display
#[derive(Debug, Clone, PartialEq)]
pub struct ListingsLoad {
    pub listings: Vec<Listing>,
    /// Set when the store was configured but the request failed
    pub error: Option<String>,
    /// True when the sample dataset is being shown
    pub from_fallback: bool,
}

/// Fetches listings, falling back to the sample dataset when `source` is
/// missing or fails.
pub async fn load_listings(source: Option<&dyn ListingSource>) -> ListingsLoad {
    let Some(source) = source else {
        log::warn!("listing store not configured, using sample data");
        return ListingsLoad {
            listings: sample_listings(),
            error: None,
            from_fallback: true,
        };
    };

    match source.fetch_available().await {
        Ok(listings) => ListingsLoad {
            listings,
            error: None,
            from_fallback: false,
        },
        Err(e) => {
            log::error!("error fetching listings: {}", e);
            ListingsLoad {
                listings: sample_listings(),
                error: Some(e.to_string()),
                from_fallback: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;

    struct FailingSource;

    #[async_trait]
    impl ListingSource for FailingSource {
        async fn fetch_available(&self) -> Result<Vec<Listing>> {
            Err(MapError::Store("connection refused".to_string()))
        }
    }

    struct OneListing;

    #[async_trait]
    impl ListingSource for OneListing {
        async fn fetch_available(&self) -> Result<Vec<Listing>> {
            Ok(vec![Listing::new("42", "Queen Anne", 30.0)])
        }
    }

    #[tokio::test]
    async fn test_unconfigured_store_uses_samples() {
        let load = load_listings(None).await;
        assert!(load.from_fallback);
        assert!(load.error.is_none());
        assert_eq!(load.listings, sample_listings());
    }

    #[tokio::test]
    async fn test_failing_store_falls_back_with_error() {
        let load = load_listings(Some(&FailingSource)).await;
        assert!(load.from_fallback);
        assert_eq!(load.listings.len(), 4);
        assert!(load.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_working_store_is_used() {
        let load = load_listings(Some(&OneListing)).await;
        assert!(!load.from_fallback);
        assert_eq!(load.listings.len(), 1);
        assert_eq!(load.listings[0].id, "42");
    }

    #[test]
    fn test_query_url() {
        let source = RestListingSource::new(StoreConfig {
            url: "https://example.supabase.co/".to_string(),
            anon_key: "key".to_string(),
        });
        assert_eq!(
            source.query_url(),
            "https://example.supabase.co/rest/v1/babysitters?select=*&availability_status=eq.available&is_verified=eq.true&order=rating.desc&limit=4"
        );
    }
}
