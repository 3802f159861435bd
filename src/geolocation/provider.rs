use super::{GeoPosition, GeolocationError, GeolocationOptions, GeolocationProvider};
use crate::core::geo::LatLng;
use async_trait::async_trait;
use instant::Instant;
use std::time::Duration;
use std::sync::Mutex;

/// Always reports the same position. Used for hosts with a configured home
/// location and in tests.
#[derive(Debug, Clone)]
pub struct FixedLocator {
    position: GeoPosition,
}

impl FixedLocator {
    pub fn new(position: GeoPosition) -> Self {
        Self { position }
    }

    pub fn at(lat_lng: LatLng, accuracy: Option<f64>) -> Self {
        Self::new(GeoPosition {
            latitude: lat_lng.lat,
            longitude: lat_lng.lng,
            accuracy,
        })
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl GeolocationProvider for FixedLocator {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<GeoPosition, GeolocationError> {
        Ok(self.position)
    }
}

/// For platforms with no positioning service at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedLocator;

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl GeolocationProvider for UnsupportedLocator {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> Result<GeoPosition, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// Wraps a provider and answers from the last successful fix while it is
/// younger than `options.maximum_age_ms`.
pub struct CachedLocator<P> {
    inner: P,
    last_fix: Mutex<Option<(GeoPosition, Instant)>>,
}

impl<P: GeolocationProvider> CachedLocator<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            last_fix: Mutex::new(None),
        }
    }

    /// A zero `max_age` never answers from the cache.
    fn cached(&self, max_age: Duration) -> Option<GeoPosition> {
        if max_age.is_zero() {
            return None;
        }
        let guard = self.last_fix.lock().ok()?;
        match *guard {
            Some((position, taken_at)) if taken_at.elapsed() <= max_age => Some(position),
            _ => None,
        }
    }

    fn remember(&self, position: GeoPosition) {
        if let Ok(mut guard) = self.last_fix.lock() {
            *guard = Some((position, Instant::now()));
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<P: GeolocationProvider> GeolocationProvider for CachedLocator<P> {
    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> Result<GeoPosition, GeolocationError> {
        if let Some(position) = self.cached(Duration::from_millis(options.maximum_age_ms)) {
            log::debug!("answering position request from cache");
            return Ok(position);
        }

        let position = self.inner.current_position(options).await?;
        self.remember(position);
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLocator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeolocationProvider for CountingLocator {
        async fn current_position(
            &self,
            _options: &GeolocationOptions,
        ) -> Result<GeoPosition, GeolocationError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as f64;
            Ok(GeoPosition { latitude: n, longitude: n, accuracy: None })
        }
    }

    #[tokio::test]
    async fn test_fixed_and_unsupported() {
        let options = GeolocationOptions::default();
        let fixed = FixedLocator::at(LatLng::new(47.65, -122.35), Some(12.0));
        let pos = fixed.current_position(&options).await.unwrap();
        assert_eq!(pos.latitude, 47.65);
        assert_eq!(pos.accuracy, Some(12.0));

        let err = UnsupportedLocator.current_position(&options).await.unwrap_err();
        assert_eq!(err, GeolocationError::Unsupported);
    }

    #[tokio::test]
    async fn test_cache_respects_maximum_age() {
        let locator = CachedLocator::new(CountingLocator { calls: AtomicUsize::new(0) });

        let options = GeolocationOptions::default();
        let first = locator.current_position(&options).await.unwrap();
        let second = locator.current_position(&options).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(locator.inner.calls.load(Ordering::SeqCst), 1);

        let no_cache = GeolocationOptions { maximum_age_ms: 0, ..options };
        let third = locator.current_position(&no_cache).await.unwrap();
        assert_ne!(first, third);
        assert_eq!(locator.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_maximum_age_always_asks() {
        let locator = CachedLocator::new(CountingLocator { calls: AtomicUsize::new(0) });
        let options = GeolocationOptions { maximum_age_ms: 0, ..GeolocationOptions::default() };

        // back to back, well inside one clock tick
        for _ in 0..3 {
            locator.current_position(&options).await.unwrap();
        }
        assert_eq!(locator.inner.calls.load(Ordering::SeqCst), 3);
    }
}
