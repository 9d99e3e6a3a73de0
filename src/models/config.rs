//! Configuration module for Hazard Sentry
//!
//! Single source of truth for provider endpoints, engine thresholds and
//! model artifact locations. No hardcoded values outside this module.

use std::path::PathBuf;
use std::time::Duration;

/// Proximity radius for the earthquake catalog filter (km)
pub const SEISMIC_RADIUS_KM: f64 = 100.0;

/// Lookback window for the rolling seismic feed (days)
pub const SEISMIC_LOOKBACK_DAYS: u64 = 30;

/// Model artifact filenames, keyed by hazard domain
pub const CYCLONE_MODEL_FILE: &str = "cyclone_gbt.onnx";
pub const EARTHQUAKE_MODEL_FILE: &str = "earthquake_mlp.onnx";
pub const EARTHQUAKE_SCALER_FILE: &str = "earthquake_scaler.json";

/// Configuration for the risk engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the current-weather/forecast provider
    pub weather_api_url: String,
    /// API key for the weather provider
    pub weather_api_key: String,
    /// URL of the rolling seismic-event GeoJSON feed
    pub usgs_feed_url: String,
    /// Timeout for provider requests
    pub request_timeout: Duration,
    /// Proximity radius for the earthquake catalog (km)
    pub seismic_radius_km: f64,
    /// Lookback window for the seismic feed
    pub seismic_lookback: Duration,
    /// Worker pool bound for batch assessments
    pub max_concurrent_assessments: usize,
    /// Directory holding the pretrained model artifacts
    pub model_dir: PathBuf,
    /// TTL for cached weather snapshots (seconds)
    pub snapshot_ttl_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weather_api_url: std::env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5".to_string()),
            weather_api_key: std::env::var("OPENWEATHER_API_KEY").unwrap_or_default(),
            usgs_feed_url: std::env::var("USGS_FEED_URL").unwrap_or_else(|_| {
                "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.geojson"
                    .to_string()
            }),
            // Providers are slow, rate-limited network dependencies;
            // requests carry an explicit timeout and are never retried here.
            request_timeout: Duration::from_secs(12),
            seismic_radius_km: SEISMIC_RADIUS_KM,
            seismic_lookback: Duration::from_secs(SEISMIC_LOOKBACK_DAYS * 24 * 3600),
            max_concurrent_assessments: 8,
            model_dir: std::env::var("HAZARD_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./models")),
            snapshot_ttl_secs: 300,
        }
    }
}

impl EngineConfig {
    pub fn cyclone_model_path(&self) -> PathBuf {
        self.model_dir.join(CYCLONE_MODEL_FILE)
    }

    pub fn earthquake_model_path(&self) -> PathBuf {
        self.model_dir.join(EARTHQUAKE_MODEL_FILE)
    }

    pub fn earthquake_scaler_path(&self) -> PathBuf {
        self.model_dir.join(EARTHQUAKE_SCALER_FILE)
    }
}
