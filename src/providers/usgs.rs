//! USGS Earthquake Feed Client
//!
//! Pulls the rolling GeoJSON summary feed and maps it onto seismic events.
//! The feed is global; proximity filtering happens in the engine against
//! the query location, this client only applies the lookback window.
//!
//! Feed: https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.geojson
//! Free, no API key required

use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::models::{EngineConfig, EngineError, EngineResult, Location, SeismicEvent};

// ============================================
// GEOJSON FEED TYPES
// ============================================

/// Top-level GeoJSON response from the USGS feed
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<QuakeFeature>,
}

/// A single earthquake event
#[derive(Debug, Deserialize)]
struct QuakeFeature {
    #[serde(default)]
    properties: QuakeProperties,
    #[serde(default)]
    geometry: QuakeGeometry,
}

#[derive(Debug, Default, Deserialize)]
struct QuakeProperties {
    /// Magnitude; occasionally null in the feed
    mag: Option<f64>,
    /// Event time, ms since epoch
    time: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct QuakeGeometry {
    /// [longitude, latitude, depth_km]
    #[serde(default)]
    coordinates: Vec<f64>,
}

// ============================================
// CLIENT
// ============================================

/// USGS feed HTTP client
pub struct UsgsClient {
    client: reqwest::Client,
    feed_url: String,
    timeout: Duration,
}

impl UsgsClient {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            feed_url: config.usgs_feed_url.clone(),
            timeout: config.request_timeout,
        }
    }

    /// Fetch feed events no older than `window`
    pub async fn recent_events(&self, window: Duration) -> EngineResult<Vec<SeismicEvent>> {
        debug!("🌍 USGS: fetching seismic feed");

        let response = self
            .client
            .get(&self.feed_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(EngineError::from)?;

        if response.status().as_u16() == 429 {
            return Err(EngineError::rate_limited());
        }
        if !response.status().is_success() {
            return Err(EngineError::seismic_fetch_failed(format!(
                "USGS feed error: {}",
                response.status()
            )));
        }

        let data: FeatureCollection = response.json().await.map_err(EngineError::from)?;

        let cutoff_ms = Utc::now().timestamp_millis() - window.as_millis() as i64;
        let events = events_from_feed(data, cutoff_ms);

        debug!("🌍 USGS: {} events within the lookback window", events.len());

        Ok(events)
    }
}

/// Map feed features onto events, dropping malformed geometry and
/// anything older than the cutoff
fn events_from_feed(data: FeatureCollection, cutoff_ms: i64) -> Vec<SeismicEvent> {
    data.features
        .into_iter()
        .filter_map(|feature| {
            let coords = &feature.geometry.coordinates;
            if coords.len() < 2 {
                return None;
            }
            let time_ms = feature.properties.time.unwrap_or(0);
            if time_ms < cutoff_ms {
                return None;
            }
            Some(SeismicEvent {
                // GeoJSON order is [lon, lat, depth]
                epicenter: Location::new(coords[1], coords[0]),
                magnitude: feature.properties.mag.unwrap_or(0.0),
                time_ms,
            })
        })
        .collect()
}
