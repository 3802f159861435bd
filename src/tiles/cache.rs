use crate::{core::geo::TileCoord, tiles::source::MapStyle};
use lru::LruCache;
use std::{
    num::NonZeroUsize,
    sync::{Arc, Mutex},
};

/// A tile is identified by its imagery style as well as its coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub style: MapStyle,
    pub coord: TileCoord,
}

impl TileKey {
    pub fn new(style: MapStyle, coord: TileCoord) -> Self {
        Self { style, coord }
    }

    pub fn url(&self) -> String {
        self.style.tile_url(self.coord)
    }
}

/// In-memory cache of downloaded tile bytes using LRU eviction.
/// Clones share the same storage.
#[derive(Debug, Clone)]
pub struct TileCache {
    cache: Arc<Mutex<LruCache<TileKey, Arc<Vec<u8>>>>>,
}

impl TileCache {
    /// Create a new tile cache with the given capacity (at least one tile)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub fn get(&self, key: &TileKey) -> Option<Arc<Vec<u8>>> {
        self.cache.lock().ok()?.get(key).cloned()
    }

    pub fn insert(&self, key: TileKey, data: Arc<Vec<u8>>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, data);
        }
    }

    pub fn contains(&self, key: &TileKey) -> bool {
        self.cache
            .lock()
            .ok()
            .map(|cache| cache.contains(key))
            .unwrap_or(false)
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().ok().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new(crate::core::constants::TILE_CACHE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(x: u32, style: MapStyle) -> TileKey {
        TileKey::new(style, TileCoord::new(x, 0, 3))
    }

    #[test]
    fn test_styles_are_cached_separately() {
        let cache = TileCache::new(4);
        cache.insert(key(1, MapStyle::Standard), Arc::new(vec![1]));

        assert!(cache.contains(&key(1, MapStyle::Standard)));
        assert!(!cache.contains(&key(1, MapStyle::Satellite)));
        assert_eq!(*cache.get(&key(1, MapStyle::Standard)).unwrap(), vec![1]);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = TileCache::new(2);
        cache.insert(key(1, MapStyle::Standard), Arc::new(vec![1]));
        cache.insert(key(2, MapStyle::Standard), Arc::new(vec![2]));
        // touch 1 so 2 becomes the oldest
        cache.get(&key(1, MapStyle::Standard));
        cache.insert(key(3, MapStyle::Standard), Arc::new(vec![3]));

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&key(1, MapStyle::Standard)));
        assert!(!cache.contains(&key(2, MapStyle::Standard)));
    }

    #[test]
    fn test_zero_capacity_still_holds_one() {
        let cache = TileCache::new(0);
        cache.insert(key(1, MapStyle::Standard), Arc::new(vec![1]));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
