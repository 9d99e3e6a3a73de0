//! Providers Module - External Data Sources
//!
//! Signal acquisition boundary: weather and seismic feeds are slow,
//! rate-limited, fallible network dependencies. The engine assumes no
//! freshness beyond the most recent successful fetch and never retries
//! here; retry/backoff belongs to the caller.

pub mod openweather;
pub mod usgs;

pub use openweather::*;
pub use usgs::*;

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use crate::models::{
    EngineConfig, EngineResult, ForecastSample, Location, SeismicEvent, WeatherSnapshot,
};
use crate::utils::SnapshotCache;

/// Abstract capability the engine depends on for raw signals
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Current conditions for a location
    async fn fetch_weather(&self, location: Location) -> EngineResult<WeatherSnapshot>;

    /// Short-range forecast samples for a location
    async fn fetch_forecast(&self, location: Location) -> EngineResult<Vec<ForecastSample>>;

    /// Feed events no older than `window`
    async fn fetch_recent_seismic_events(
        &self,
        window: Duration,
    ) -> EngineResult<Vec<SeismicEvent>>;
}

/// Production signal source: OpenWeather + USGS, with the weather path
/// fronted by a TTL cache so a provider outage can degrade to the most
/// recent successful snapshot instead of losing the signal
pub struct LiveSignalSource {
    weather: OpenWeatherClient,
    seismic: UsgsClient,
    cache: SnapshotCache,
}

impl LiveSignalSource {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            weather: OpenWeatherClient::new(config),
            seismic: UsgsClient::new(config),
            cache: SnapshotCache::with_ttl(config.snapshot_ttl_secs),
        }
    }

    pub fn cache_stats(&self) -> crate::utils::CacheStats {
        self.cache.stats()
    }
}

#[async_trait]
impl SignalSource for LiveSignalSource {
    async fn fetch_weather(&self, location: Location) -> EngineResult<WeatherSnapshot> {
        if let Some(snapshot) = self.cache.get(location) {
            return Ok(snapshot);
        }

        match self.weather.current_weather(location).await {
            Ok(snapshot) => {
                self.cache.set(location, snapshot.clone());
                Ok(snapshot)
            }
            Err(err) => {
                // Stale beats missing for this domain
                if let Some(snapshot) = self.cache.get_stale(location) {
                    warn!("⚠️ Weather fetch failed ({}), serving stale snapshot", err);
                    return Ok(snapshot);
                }
                Err(err)
            }
        }
    }

    async fn fetch_forecast(&self, location: Location) -> EngineResult<Vec<ForecastSample>> {
        self.weather.forecast(location).await
    }

    async fn fetch_recent_seismic_events(
        &self,
        window: Duration,
    ) -> EngineResult<Vec<SeismicEvent>> {
        self.seismic.recent_events(window).await
    }
}
