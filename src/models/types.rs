//! Type definitions for Hazard Sentry
//! All core data structures for hazard risk assessment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::geo;

/// Minimum-distance sentinel reported when a catalog holds no events
pub const DISTANT_SENTINEL_KM: f64 = 1000.0;

/// Geographic coordinates in degrees (WGS84-like, no datum correction)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both coordinates are finite and in range.
    /// Invalid locations degrade to sentinel results, they never panic.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Risk severity, ordinal 0 (none) to 3 (high).
/// Comparisons always mean "more severe".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum RiskLevel {
    None = 0,
    Low = 1,
    Moderate = 2,
    High = 3,
}

impl RiskLevel {
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "NONE",
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::None => "✅",
            RiskLevel::Low => "🟡",
            RiskLevel::Moderate => "🟠",
            RiskLevel::High => "🔴",
        }
    }
}

/// One future sample from the short-range forecast.
/// Absent fields fall back to the current conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub temp: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
}

/// Point-in-time weather conditions for a location, plus up to 5
/// forecast samples. Produced fresh per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees ("from" convention)
    pub wind_direction: f64,
    /// Sea-level pressure in hPa
    pub pressure: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Temperature in °C
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Visibility in meters
    pub visibility: f64,
    /// Cloud cover in %
    pub cloud_cover: f64,
    /// Short forecast trend (up to 5 samples)
    pub forecast: Vec<ForecastSample>,
}

impl WeatherSnapshot {
    /// Mean forecast wind speed; samples without a value fall back to the
    /// current wind speed, and an empty forecast collapses to it entirely.
    pub fn wind_speed_trend(&self) -> f64 {
        if self.forecast.is_empty() {
            return self.wind_speed;
        }
        let sum: f64 = self
            .forecast
            .iter()
            .map(|s| s.wind_speed.unwrap_or(self.wind_speed))
            .sum();
        sum / self.forecast.len() as f64
    }
}

/// A single seismic event from the provider feed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeismicEvent {
    pub epicenter: Location,
    pub magnitude: f64,
    /// Epoch time in milliseconds
    pub time_ms: i64,
}

/// A feed event reduced to what the engine ranks on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuake {
    pub magnitude: f64,
    pub distance_km: f64,
    pub time_ms: i64,
}

/// Recent seismic events within the proximity radius of a query location,
/// ranked by (descending magnitude, ascending distance)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeismicCatalog {
    pub events: Vec<NearbyQuake>,
}

impl SeismicCatalog {
    /// Derive a catalog by filtering a provider feed to events within
    /// `radius_km` of `origin`. Malformed epicenters measure as infinitely
    /// distant and drop out of the filter.
    pub fn from_feed(origin: Location, feed: &[SeismicEvent], radius_km: f64) -> Self {
        let mut events: Vec<NearbyQuake> = feed
            .iter()
            .filter_map(|event| {
                let distance_km = geo::haversine_km(origin, event.epicenter);
                if distance_km < radius_km {
                    Some(NearbyQuake {
                        magnitude: event.magnitude,
                        distance_km,
                        time_ms: event.time_ms,
                    })
                } else {
                    None
                }
            })
            .collect();

        events.sort_by(|a, b| {
            b.magnitude
                .partial_cmp(&a.magnitude)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.distance_km
                        .partial_cmp(&b.distance_km)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });

        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Top-ranked event (strongest, then closest)
    pub fn strongest(&self) -> Option<&NearbyQuake> {
        self.events.first()
    }

    pub fn max_magnitude(&self) -> f64 {
        self.events
            .iter()
            .map(|q| q.magnitude)
            .fold(0.0, f64::max)
    }

    pub fn min_distance_km(&self) -> f64 {
        self.events
            .iter()
            .map(|q| q.distance_km)
            .fold(DISTANT_SENTINEL_KM, f64::min)
    }

    /// Magnitude sum, a proxy for cumulative seismic energy
    pub fn magnitude_sum(&self) -> f64 {
        self.events.iter().map(|q| q.magnitude).sum()
    }
}

/// The engine's sole output type, consumed identically by alerting,
/// batch sampling, and manual diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Maximum severity among every contributing sub-judgment
    pub risk_level: RiskLevel,
    /// One clause per contributing signal, newline-separated
    pub details: String,
    /// Model probability in [0,1]; None when scoring was unavailable.
    /// Diagnostic, not authoritative.
    pub raw_score: Option<f64>,
}

impl RiskAssessment {
    /// Conservative level-0 assessment for a signal that could not be
    /// obtained. Callers must not read this as a guarantee of safety.
    pub fn no_signal(details: impl Into<String>) -> Self {
        Self {
            risk_level: RiskLevel::None,
            details: details.into(),
            raw_score: None,
        }
    }
}

/// Both hazard verdicts for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardReport {
    pub location: Location,
    pub assessed_at: DateTime<Utc>,
    pub cyclone: RiskAssessment,
    pub earthquake: RiskAssessment,
}

impl HazardReport {
    /// Pretty print for the diagnostic CLI
    pub fn summary(&self) -> String {
        let mut output = format!("\n📍 Location {}\n", self.location);
        output.push_str(&format!(
            "   {} Cyclone:    {} ({})\n",
            self.cyclone.risk_level.emoji(),
            self.cyclone.risk_level.as_str(),
            self.cyclone.risk_level.as_u8(),
        ));
        for line in self.cyclone.details.lines() {
            output.push_str(&format!("      {}\n", line));
        }
        if let Some(score) = self.cyclone.raw_score {
            output.push_str(&format!("      model score: {:.3}\n", score));
        }
        output.push_str(&format!(
            "   {} Earthquake: {} ({})\n",
            self.earthquake.risk_level.emoji(),
            self.earthquake.risk_level.as_str(),
            self.earthquake.risk_level.as_u8(),
        ));
        for line in self.earthquake.details.lines() {
            output.push_str(&format!("      {}\n", line));
        }
        if let Some(score) = self.earthquake.raw_score {
            output.push_str(&format!("      model score: {:.3}\n", score));
        }
        output
    }
}
