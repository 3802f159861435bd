use crate::{
    tiles::cache::{TileCache, TileKey},
    MapError, Result,
};
use fxhash::FxHashMap;
use std::sync::Arc;

/// Where a tile is in its one and only download attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileState {
    Loading,
    Loaded,
    /// Shown as a neutral placeholder; never retried
    Failed(String),
}

/// Finished download, sent back to whoever renders tiles
#[derive(Debug, Clone)]
pub struct TileResult {
    pub key: TileKey,
    pub result: std::result::Result<Arc<Vec<u8>>, String>,
}

/// Per-tile download state as seen by the engine
#[derive(Debug, Default)]
pub struct TileTracker {
    states: FxHashMap<TileKey, TileState>,
    any_loaded: bool,
}

impl TileTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as loading. Returns false if it was already requested,
    /// in which case the caller must not start another download.
    pub fn request(&mut self, key: TileKey) -> bool {
        if self.states.contains_key(&key) {
            return false;
        }
        self.states.insert(key, TileState::Loading);
        true
    }

    /// Records a finished download
    pub fn complete(&mut self, result: &TileResult) {
        let state = match &result.result {
            Ok(_) => {
                if !self.any_loaded {
                    log::info!("first map tile loaded");
                }
                self.any_loaded = true;
                TileState::Loaded
            }
            Err(e) => {
                log::warn!("tile {:?} failed: {}", result.key, e);
                TileState::Failed(e.clone())
            }
        };
        self.states.insert(result.key, state);
    }

    pub fn state(&self, key: &TileKey) -> Option<&TileState> {
        self.states.get(key)
    }

    /// True once any tile has arrived; drives the loading overlay
    pub fn any_loaded(&self) -> bool {
        self.any_loaded
    }

    pub fn pending(&self) -> usize {
        self.states
            .values()
            .filter(|s| **s == TileState::Loading)
            .count()
    }
}

/// Downloads tile bytes over HTTP
#[derive(Debug, Clone)]
pub struct TileFetcher {
    client: reqwest::Client,
}

impl TileFetcher {
    /// Public tile servers reject requests without a User-Agent
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, key: TileKey) -> Result<Vec<u8>> {
        let url = key.url();
        log::debug!("fetch tile {:?} from {}", key.coord, url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MapError::Tile(format!("HTTP {} for {}", response.status(), url)));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Fetches tiles on a tokio runtime and reports each result over a
/// channel. Every tile is requested independently; a failure affects
/// only that tile.
#[cfg(feature = "tokio-runtime")]
pub struct TileLoader {
    fetcher: TileFetcher,
    cache: TileCache,
    tx: crossbeam_channel::Sender<TileResult>,
    runtime: tokio::runtime::Handle,
}

#[cfg(feature = "tokio-runtime")]
impl TileLoader {
    pub fn new(
        fetcher: TileFetcher,
        cache: TileCache,
        tx: crossbeam_channel::Sender<TileResult>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        Self {
            fetcher,
            cache,
            tx,
            runtime,
        }
    }

    pub fn cache(&self) -> &TileCache {
        &self.cache
    }

    /// Start downloading `key`. Cached tiles are reported immediately.
    pub fn start_download(&self, key: TileKey) {
        if let Some(data) = self.cache.get(&key) {
            let _ = self.tx.send(TileResult {
                key,
                result: Ok(data),
            });
            return;
        }

        let fetcher = self.fetcher.clone();
        let cache = self.cache.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = match fetcher.fetch(key).await {
                Ok(bytes) => {
                    log::debug!("downloaded tile {:?} ({} bytes)", key.coord, bytes.len());
                    let data = Arc::new(bytes);
                    cache.insert(key, data.clone());
                    Ok(data)
                }
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(TileResult { key, result });
        });
    }
}
