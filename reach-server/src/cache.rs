//! Caching layer for transit provider responses.
//!
//! Published timetables change rarely, and one analysis often reaches the
//! same route from several nearby stops; neighbouring searches share most of
//! their routes and stops. Timetables and stop details are cached. Nearby
//! searches are not: coordinates are continuous, so keys would rarely repeat.
//!
//! Failed lookups are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{
    CalendarKind, Origin, OriginPoint, RouteRef, StopDetails, StopRef, TimetableRun, TransitMode,
};
use crate::odpt::OdptError;
use crate::reach::TransitProvider;

/// Cache key for timetables: (mode, route, calendar).
type TimetableKey = (TransitMode, RouteRef, CalendarKind);

/// Cached timetable entry.
type TimetableEntry = Arc<Vec<TimetableRun>>;

/// Cache key for stop details: (mode, stop).
type StopKey = (TransitMode, StopRef);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries, per cache.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Set the TTL for cached entries.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the maximum number of cached entries.
    pub fn with_max_capacity(mut self, n: u64) -> Self {
        self.max_capacity = n;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Cache for provider responses.
pub struct TransitCache {
    /// Timetables, keyed by (mode, route, calendar).
    timetables: MokaCache<TimetableKey, TimetableEntry>,

    /// Stop details, keyed by (mode, stop). Unknown stops are cached as
    /// `None`.
    stops: MokaCache<StopKey, Option<StopDetails>>,
}

impl TransitCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let timetables = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let stops = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { timetables, stops }
    }

    /// Get a cached timetable.
    pub async fn get_timetable(&self, key: &TimetableKey) -> Option<TimetableEntry> {
        self.timetables.get(key).await
    }

    /// Insert a timetable into the cache.
    pub async fn insert_timetable(&self, key: TimetableKey, entry: TimetableEntry) {
        self.timetables.insert(key, entry).await;
    }

    /// Get cached stop details. The outer `Option` is the cache hit.
    pub async fn get_stop(&self, key: &StopKey) -> Option<Option<StopDetails>> {
        self.stops.get(key).await
    }

    /// Insert stop details into the cache.
    pub async fn insert_stop(&self, key: StopKey, details: Option<StopDetails>) {
        self.stops.insert(key, details).await;
    }
}

/// Transit provider with caching.
///
/// Wraps any `TransitProvider` and caches timetable and stop detail
/// responses.
pub struct CachedProvider<P> {
    provider: P,
    cache: TransitCache,
}

impl<P: TransitProvider> CachedProvider<P> {
    /// Create a new cached provider.
    pub fn new(provider: P, cache_config: &CacheConfig) -> Self {
        Self {
            provider,
            cache: TransitCache::new(cache_config),
        }
    }
}

impl<P: TransitProvider + Sync> TransitProvider for CachedProvider<P> {
    async fn find_stops_near(
        &self,
        mode: TransitMode,
        origin: &Origin,
    ) -> Result<Vec<OriginPoint>, OdptError> {
        self.provider.find_stops_near(mode, origin).await
    }

    async fn get_timetable(
        &self,
        mode: TransitMode,
        route: &RouteRef,
        calendar: CalendarKind,
    ) -> Result<Arc<Vec<TimetableRun>>, OdptError> {
        let key = (mode, route.clone(), calendar);

        if let Some(cached) = self.cache.get_timetable(&key).await {
            return Ok(cached);
        }

        let runs = self.provider.get_timetable(mode, route, calendar).await?;
        self.cache.insert_timetable(key, runs.clone()).await;

        Ok(runs)
    }

    async fn get_stop_details(
        &self,
        mode: TransitMode,
        stop: &StopRef,
    ) -> Result<Option<StopDetails>, OdptError> {
        let key = (mode, stop.clone());

        if let Some(cached) = self.cache.get_stop(&key).await {
            return Ok(cached);
        }

        let details = self.provider.get_stop_details(mode, stop).await?;
        self.cache.insert_stop(key, details.clone()).await;

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, TimeOfDay, Visit, VisitKind};
    use std::sync::Mutex;

    /// Provider that counts calls and can be told to fail.
    #[derive(Default)]
    struct CountingProvider {
        calls: Mutex<usize>,
        fail: Mutex<bool>,
    }

    impl CountingProvider {
        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }

        fn record(&self) -> Result<(), OdptError> {
            *self.calls.lock().unwrap() += 1;
            if *self.fail.lock().unwrap() {
                return Err(OdptError::RateLimited {
                    resource: "odpt:BusTimetable".into(),
                });
            }
            Ok(())
        }
    }

    impl TransitProvider for CountingProvider {
        async fn find_stops_near(
            &self,
            _mode: TransitMode,
            _origin: &Origin,
        ) -> Result<Vec<OriginPoint>, OdptError> {
            self.record()?;
            Ok(Vec::new())
        }

        async fn get_timetable(
            &self,
            _mode: TransitMode,
            route: &RouteRef,
            _calendar: CalendarKind,
        ) -> Result<Arc<Vec<TimetableRun>>, OdptError> {
            self.record()?;
            let visit = Visit::new(
                StopRef::new(route.as_str()).unwrap(),
                TimeOfDay::from_secs(100),
                VisitKind::Departure,
            );
            Ok(Arc::new(vec![TimetableRun::new(None, vec![visit])]))
        }

        async fn get_stop_details(
            &self,
            _mode: TransitMode,
            stop: &StopRef,
        ) -> Result<Option<StopDetails>, OdptError> {
            self.record()?;
            if stop.as_str() == "unknown" {
                return Ok(None);
            }
            Ok(Some(StopDetails {
                name: stop.to_string(),
                location: Coordinate::new(35.0, 139.0),
            }))
        }
    }

    fn cached() -> CachedProvider<CountingProvider> {
        CachedProvider::new(CountingProvider::default(), &CacheConfig::default())
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(3600));
        assert_eq!(config.max_capacity, 1000);
    }

    #[test]
    fn config_builder() {
        let config = CacheConfig::default()
            .with_ttl(Duration::from_secs(5))
            .with_max_capacity(10);
        assert_eq!(config.ttl, Duration::from_secs(5));
        assert_eq!(config.max_capacity, 10);
    }

    #[tokio::test]
    async fn timetable_fetched_once_per_key() {
        let provider = cached();
        let route = RouteRef::new("R1").unwrap();

        let first = provider
            .get_timetable(TransitMode::Bus, &route, CalendarKind::Weekday)
            .await
            .unwrap();
        let second = provider
            .get_timetable(TransitMode::Bus, &route, CalendarKind::Weekday)
            .await
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.provider.calls(), 1);

        // A different calendar or mode is a different entry.
        provider
            .get_timetable(TransitMode::Bus, &route, CalendarKind::Holiday)
            .await
            .unwrap();
        provider
            .get_timetable(TransitMode::Train, &route, CalendarKind::Weekday)
            .await
            .unwrap();
        assert_eq!(provider.provider.calls(), 3);
    }

    #[tokio::test]
    async fn unknown_stop_is_cached() {
        let provider = cached();
        let stop = StopRef::new("unknown").unwrap();

        for _ in 0..2 {
            let details = provider
                .get_stop_details(TransitMode::Bus, &stop)
                .await
                .unwrap();
            assert!(details.is_none());
        }
        assert_eq!(provider.provider.calls(), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let provider = cached();
        let stop = StopRef::new("S1").unwrap();

        *provider.provider.fail.lock().unwrap() = true;
        assert!(
            provider
                .get_stop_details(TransitMode::Bus, &stop)
                .await
                .is_err()
        );

        *provider.provider.fail.lock().unwrap() = false;
        let details = provider
            .get_stop_details(TransitMode::Bus, &stop)
            .await
            .unwrap();
        assert_eq!(details.unwrap().name, "S1");
        assert_eq!(provider.provider.calls(), 2);
    }

    #[tokio::test]
    async fn nearby_search_is_not_cached() {
        let provider = cached();
        let origin = Origin::new(35.0, 139.0, 100).unwrap();

        provider
            .find_stops_near(TransitMode::Bus, &origin)
            .await
            .unwrap();
        provider
            .find_stops_near(TransitMode::Bus, &origin)
            .await
            .unwrap();
        assert_eq!(provider.provider.calls(), 2);
    }
}
