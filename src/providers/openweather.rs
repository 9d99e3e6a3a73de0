//! OpenWeather API Client
//!
//! Fetches current conditions and the short-range forecast keyed by
//! coordinates. Only the fields the feature builders consume are mapped;
//! everything else in the provider payload is ignored.
//!
//! API: https://api.openweathermap.org/data/2.5/{weather,forecast}
//! Requests are metric (m/s, hPa, °C) and carry an explicit timeout.

use serde::Deserialize;
use tracing::debug;

use crate::models::{
    EngineConfig, EngineError, EngineResult, ForecastSample, Location, WeatherSnapshot,
};

/// How many forecast samples feed the trend features
pub const FORECAST_SAMPLES: usize = 5;

// ============================================
// PROVIDER RESPONSE TYPES
// ============================================

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    #[serde(default)]
    wind: Option<WindBlock>,
    #[serde(default)]
    main: Option<MainBlock>,
    #[serde(default)]
    visibility: Option<f64>,
    #[serde(default)]
    clouds: Option<CloudsBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct WindBlock {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct MainBlock {
    temp: Option<f64>,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    pressure: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct CloudsBlock {
    all: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    #[serde(default)]
    main: Option<MainBlock>,
    #[serde(default)]
    wind: Option<WindBlock>,
}

// ============================================
// CLIENT
// ============================================

/// OpenWeather HTTP client
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: std::time::Duration,
}

impl OpenWeatherClient {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.weather_api_url.clone(),
            api_key: config.weather_api_key.clone(),
            timeout: config.request_timeout,
        }
    }

    /// Fetch current conditions for a location.
    /// The snapshot's forecast list comes back empty; callers attach it
    /// from `forecast` so a forecast failure only loses the trend.
    pub async fn current_weather(&self, location: Location) -> EngineResult<WeatherSnapshot> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url, location.latitude, location.longitude, self.api_key
        );

        debug!("🌦️ OpenWeather: fetching current conditions for {}", location);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(EngineError::from)?;

        if response.status().as_u16() == 429 {
            return Err(EngineError::rate_limited());
        }
        if !response.status().is_success() {
            return Err(EngineError::weather_fetch_failed(format!(
                "Weather API error: {}",
                response.status()
            )));
        }

        let data: CurrentWeatherResponse = response.json().await.map_err(EngineError::from)?;

        Ok(snapshot_from_response(data))
    }

    /// Fetch the short forecast; entries beyond the trend window are dropped
    pub async fn forecast(&self, location: Location) -> EngineResult<Vec<ForecastSample>> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            self.base_url, location.latitude, location.longitude, self.api_key
        );

        debug!("🌦️ OpenWeather: fetching forecast for {}", location);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(EngineError::from)?;

        if response.status().as_u16() == 429 {
            return Err(EngineError::rate_limited());
        }
        if !response.status().is_success() {
            return Err(EngineError::forecast_fetch_failed(format!(
                "Forecast API error: {}",
                response.status()
            )));
        }

        let data: ForecastResponse = response.json().await.map_err(EngineError::from)?;

        let samples = data
            .list
            .into_iter()
            .take(FORECAST_SAMPLES)
            .map(|entry| {
                let main = entry.main.unwrap_or_default();
                let wind = entry.wind.unwrap_or_default();
                ForecastSample {
                    temp: main.temp,
                    pressure: main.pressure,
                    humidity: main.humidity,
                    wind_speed: wind.speed,
                    wind_direction: wind.deg,
                }
            })
            .collect();

        Ok(samples)
    }
}

/// Map the provider payload onto a snapshot, applying the fallback
/// defaults the historical models were trained against
fn snapshot_from_response(data: CurrentWeatherResponse) -> WeatherSnapshot {
    let wind = data.wind.unwrap_or_default();
    let main = data.main.unwrap_or_default();

    let temperature = main.temp.unwrap_or(25.0);

    WeatherSnapshot {
        wind_speed: wind.speed.unwrap_or(0.0),
        wind_direction: wind.deg.unwrap_or(0.0),
        pressure: main.pressure.unwrap_or(1013.0),
        humidity: main.humidity.unwrap_or(50.0),
        temperature,
        feels_like: main.feels_like.unwrap_or(temperature),
        temp_min: main.temp_min.unwrap_or(temperature - 2.0),
        temp_max: main.temp_max.unwrap_or(temperature + 2.0),
        visibility: data.visibility.unwrap_or(10000.0),
        cloud_cover: data.clouds.and_then(|c| c.all).unwrap_or(0.0),
        forecast: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_defaults_for_sparse_payload() {
        let data: CurrentWeatherResponse = serde_json::from_str("{}").unwrap();
        let snapshot = snapshot_from_response(data);

        assert_eq!(snapshot.wind_speed, 0.0);
        assert_eq!(snapshot.pressure, 1013.0);
        assert_eq!(snapshot.humidity, 50.0);
        assert_eq!(snapshot.temperature, 25.0);
        assert_eq!(snapshot.feels_like, 25.0);
        assert_eq!(snapshot.temp_min, 23.0);
        assert_eq!(snapshot.temp_max, 27.0);
        assert_eq!(snapshot.visibility, 10000.0);
        assert_eq!(snapshot.cloud_cover, 0.0);
        assert!(snapshot.forecast.is_empty());
    }

    #[test]
    fn test_snapshot_maps_provider_fields() {
        let payload = r#"{
            "wind": {"speed": 18.5, "deg": 210},
            "main": {"temp": 29.3, "feels_like": 33.0, "temp_min": 28.0,
                     "temp_max": 31.0, "pressure": 996, "humidity": 84},
            "visibility": 4000,
            "clouds": {"all": 92}
        }"#;
        let data: CurrentWeatherResponse = serde_json::from_str(payload).unwrap();
        let snapshot = snapshot_from_response(data);

        assert_eq!(snapshot.wind_speed, 18.5);
        assert_eq!(snapshot.wind_direction, 210.0);
        assert_eq!(snapshot.pressure, 996.0);
        assert_eq!(snapshot.humidity, 84.0);
        assert_eq!(snapshot.visibility, 4000.0);
        assert_eq!(snapshot.cloud_cover, 92.0);
    }

    #[test]
    fn test_forecast_entries_map_to_optional_samples() {
        let payload = r#"{
            "list": [
                {"main": {"temp": 27.0, "pressure": 1001, "humidity": 70},
                 "wind": {"speed": 12.0, "deg": 180}},
                {"wind": {"speed": 15.0}},
                {}
            ]
        }"#;
        let data: ForecastResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(data.list.len(), 3);

        let first = &data.list[0];
        assert_eq!(first.main.as_ref().unwrap().temp, Some(27.0));
        assert_eq!(first.wind.as_ref().unwrap().speed, Some(12.0));
        assert!(data.list[2].main.is_none());
    }
}
