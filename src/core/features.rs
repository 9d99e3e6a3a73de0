//! Feature Builders
//!
//! Deterministically map raw signal snapshots into the fixed-order numeric
//! rows the pretrained models were fitted on. Each hazard domain has a
//! named-field struct and a single serialization function to the model's
//! column order; the slot order is part of the trained-model contract and
//! never changes without retraining.

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::f64::consts::PI;

use crate::models::{Location, SeismicCatalog, WeatherSnapshot};

/// Cyclone model input width
pub const CYCLONE_FEATURE_WIDTH: usize = 30;

/// Earthquake model input width
pub const EARTHQUAKE_FEATURE_WIDTH: usize = 6;

/// Column names of the cyclone training set, in the exact order the model
/// expects. The `precipitation` column carries visibility/1000: the
/// historical training set substituted visibility for true precipitation.
pub const CYCLONE_FEATURE_COLUMNS: [&str; CYCLONE_FEATURE_WIDTH] = [
    "temperature_2m",
    "relative_humidity_2m",
    "wind_speed_10m",
    "wind_direction_10m",
    "pressure_msl",
    "cloud_cover",
    "precipitation",
    "wind_u",
    "wind_v",
    "final_lat",
    "final_lon",
    "abs_latitude",
    "month",
    "day",
    "hour",
    "sin_month",
    "cos_month",
    "sin_day",
    "cos_day",
    "sin_hour",
    "cos_hour",
    "is_monsoon",
    "is_cyclone_season",
    "in_bay_of_bengal",
    "in_arabian_sea",
    "temp_pressure_ratio",
    "wind_pressure_interaction",
    "humid_temp_index",
    "precip_temp_humid",
    "wind_fluctuation",
];

// ============================================
// DERIVATION HELPERS
// ============================================

/// U and V components of wind. Meteorological convention: direction is
/// where the wind comes FROM, hence the negated components.
pub fn wind_components(wind_speed: f64, wind_direction_deg: f64) -> (f64, f64) {
    let direction_rad = wind_direction_deg.to_radians();
    let wind_u = -wind_speed * direction_rad.sin();
    let wind_v = -wind_speed * direction_rad.cos();
    (wind_u, wind_v)
}

/// Sine/cosine pair encoding a periodic value. Avoids the discontinuity
/// of raw month/day/hour values at period boundaries.
fn cyclical(value: f64, period: f64) -> (f64, f64) {
    let angle = 2.0 * PI * value / period;
    (angle.sin(), angle.cos())
}

/// Monsoon season runs June through September
pub fn is_monsoon_season(month: u32) -> bool {
    (6..=9).contains(&month)
}

/// Cyclone season covers April-June and September-December
pub fn is_cyclone_season(month: u32) -> bool {
    matches!(month, 4 | 5 | 6 | 9 | 10 | 11 | 12)
}

/// Coarse rectangular region boxes, not polygons
pub fn region_flags(latitude: f64, longitude: f64) -> (bool, bool) {
    let in_bay_of_bengal =
        (85.0..=95.0).contains(&longitude) && (10.0..=22.0).contains(&latitude);
    let in_arabian_sea =
        (60.0..=75.0).contains(&longitude) && (10.0..=22.0).contains(&latitude);
    (in_bay_of_bengal, in_arabian_sea)
}

// ============================================
// CYCLONE FEATURES
// ============================================

/// Named cyclone feature set. Field names mirror the training columns so
/// a reordering cannot silently mismatch the trained schema.
#[derive(Debug, Clone, PartialEq)]
pub struct CycloneFeatures {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub pressure: f64,
    pub cloud_cover: f64,
    /// visibility/1000, the training set's precipitation stand-in
    pub precipitation: f64,
    pub wind_u: f64,
    pub wind_v: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub abs_latitude: f64,
    pub month: f64,
    pub day: f64,
    pub hour: f64,
    pub sin_month: f64,
    pub cos_month: f64,
    pub sin_day: f64,
    pub cos_day: f64,
    pub sin_hour: f64,
    pub cos_hour: f64,
    pub is_monsoon: bool,
    pub is_cyclone_season: bool,
    pub in_bay_of_bengal: bool,
    pub in_arabian_sea: bool,
    pub temp_pressure_ratio: f64,
    pub wind_pressure_interaction: f64,
    pub humid_temp_index: f64,
    pub precip_temp_humid: f64,
    pub wind_fluctuation: f64,
}

impl CycloneFeatures {
    /// Build the feature set from a snapshot. `at` is the injected wall
    /// clock; callers outside tests pass `Utc::now()`.
    pub fn build(snapshot: &WeatherSnapshot, location: Location, at: DateTime<Utc>) -> Self {
        let month = at.month();
        let day = at.day();
        let hour = at.hour();

        let (sin_month, cos_month) = cyclical(month as f64, 12.0);
        let (sin_day, cos_day) = cyclical(day as f64, 31.0);
        let (sin_hour, cos_hour) = cyclical(hour as f64, 24.0);

        let (wind_u, wind_v) = wind_components(snapshot.wind_speed, snapshot.wind_direction);
        let (in_bay_of_bengal, in_arabian_sea) =
            region_flags(location.latitude, location.longitude);

        let temp_pressure_ratio = if snapshot.pressure != 0.0 {
            snapshot.temperature / snapshot.pressure
        } else {
            0.0
        };

        Self {
            temperature: snapshot.temperature,
            humidity: snapshot.humidity,
            wind_speed: snapshot.wind_speed,
            wind_direction: snapshot.wind_direction,
            pressure: snapshot.pressure,
            cloud_cover: snapshot.cloud_cover,
            precipitation: snapshot.visibility / 1000.0,
            wind_u,
            wind_v,
            latitude: location.latitude,
            longitude: location.longitude,
            abs_latitude: location.latitude.abs(),
            month: month as f64,
            day: day as f64,
            hour: hour as f64,
            sin_month,
            cos_month,
            sin_day,
            cos_day,
            sin_hour,
            cos_hour,
            is_monsoon: is_monsoon_season(month),
            is_cyclone_season: is_cyclone_season(month),
            in_bay_of_bengal,
            in_arabian_sea,
            temp_pressure_ratio,
            wind_pressure_interaction: snapshot.wind_speed * snapshot.pressure / 1000.0,
            humid_temp_index: snapshot.humidity * snapshot.temperature / 100.0,
            precip_temp_humid: snapshot.visibility * snapshot.temperature * snapshot.humidity
                / 1000.0,
            wind_fluctuation: (snapshot.wind_speed - snapshot.wind_speed_trend()).abs(),
        }
    }

    /// Serialize to the model row, in CYCLONE_FEATURE_COLUMNS order
    pub fn to_row(&self) -> [f64; CYCLONE_FEATURE_WIDTH] {
        [
            self.temperature,
            self.humidity,
            self.wind_speed,
            self.wind_direction,
            self.pressure,
            self.cloud_cover,
            self.precipitation,
            self.wind_u,
            self.wind_v,
            self.latitude,
            self.longitude,
            self.abs_latitude,
            self.month,
            self.day,
            self.hour,
            self.sin_month,
            self.cos_month,
            self.sin_day,
            self.cos_day,
            self.sin_hour,
            self.cos_hour,
            self.is_monsoon as u8 as f64,
            self.is_cyclone_season as u8 as f64,
            self.in_bay_of_bengal as u8 as f64,
            self.in_arabian_sea as u8 as f64,
            self.temp_pressure_ratio,
            self.wind_pressure_interaction,
            self.humid_temp_index,
            self.precip_temp_humid,
            self.wind_fluctuation,
        ]
    }
}

// ============================================
// EARTHQUAKE FEATURES
// ============================================

/// Named earthquake feature set over a proximity-filtered catalog
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeFeatures {
    pub latitude: f64,
    pub longitude: f64,
    pub event_count: f64,
    /// 0 when the catalog is empty
    pub max_magnitude: f64,
    /// Distant sentinel (1000 km) when the catalog is empty
    pub min_distance_km: f64,
    /// Magnitude sum, a proxy for cumulative seismic energy
    pub magnitude_sum: f64,
}

impl EarthquakeFeatures {
    pub fn build(location: Location, catalog: &SeismicCatalog) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            event_count: catalog.len() as f64,
            max_magnitude: catalog.max_magnitude(),
            min_distance_km: catalog.min_distance_km(),
            magnitude_sum: catalog.magnitude_sum(),
        }
    }

    /// Serialize to the model row: lat, lon, count, max magnitude,
    /// min distance, magnitude sum
    pub fn to_row(&self) -> [f64; EARTHQUAKE_FEATURE_WIDTH] {
        [
            self.latitude,
            self.longitude,
            self.event_count,
            self.max_magnitude,
            self.min_distance_km,
            self.magnitude_sum,
        ]
    }
}

/// Right-pad a raw feature slice with zeros up to the model's declared
/// input width. Tolerance policy for already-trained models, not a
/// correctness guarantee; wider input is truncated.
pub fn pad_to_width(values: &[f64], width: usize) -> Vec<f64> {
    let mut row: Vec<f64> = values.iter().copied().take(width).collect();
    row.resize(width, 0.0);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            wind_speed: 20.0,
            wind_direction: 90.0,
            pressure: 1000.0,
            humidity: 80.0,
            temperature: 30.0,
            feels_like: 34.0,
            temp_min: 28.0,
            temp_max: 32.0,
            visibility: 8000.0,
            cloud_cover: 75.0,
            forecast: Vec::new(),
        }
    }

    #[test]
    fn test_wind_components_follow_from_convention() {
        // Wind from the north blows southward: u = 0, v = -speed
        let (u, v) = wind_components(10.0, 0.0);
        assert!(u.abs() < 1e-9);
        assert!((v + 10.0).abs() < 1e-9);

        // Wind from the east: u = -speed, v = 0
        let (u, v) = wind_components(10.0, 90.0);
        assert!((u + 10.0).abs() < 1e-9);
        assert!(v.abs() < 1e-9);
    }

    #[test]
    fn test_season_flags() {
        assert!(is_monsoon_season(6));
        assert!(is_monsoon_season(9));
        assert!(!is_monsoon_season(5));
        assert!(!is_monsoon_season(10));

        assert!(is_cyclone_season(4));
        assert!(is_cyclone_season(12));
        assert!(!is_cyclone_season(1));
        assert!(!is_cyclone_season(7));
    }

    #[test]
    fn test_region_boxes() {
        // Bay of Bengal
        assert_eq!(region_flags(15.0, 90.0), (true, false));
        // Arabian Sea
        assert_eq!(region_flags(15.0, 70.0), (false, true));
        // Neither
        assert_eq!(region_flags(40.0, 90.0), (false, false));
        assert_eq!(region_flags(15.0, 100.0), (false, false));
    }

    #[test]
    fn test_cyclone_row_matches_column_schema() {
        let at = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let location = Location::new(15.0, 90.0);
        let features = CycloneFeatures::build(&snapshot(), location, at);
        let row = features.to_row();

        assert_eq!(row.len(), CYCLONE_FEATURE_COLUMNS.len());
        assert_eq!(CYCLONE_FEATURE_COLUMNS[0], "temperature_2m");
        assert_eq!(row[0], 30.0);
        assert_eq!(CYCLONE_FEATURE_COLUMNS[6], "precipitation");
        assert_eq!(row[6], 8.0); // visibility / 1000
        assert_eq!(CYCLONE_FEATURE_COLUMNS[11], "abs_latitude");
        assert_eq!(row[11], 15.0);
        assert_eq!(CYCLONE_FEATURE_COLUMNS[21], "is_monsoon");
        assert_eq!(row[21], 1.0); // July
        assert_eq!(CYCLONE_FEATURE_COLUMNS[23], "in_bay_of_bengal");
        assert_eq!(row[23], 1.0);
        assert_eq!(CYCLONE_FEATURE_COLUMNS[29], "wind_fluctuation");
        assert_eq!(row[29], 0.0); // empty forecast collapses the trend
    }

    #[test]
    fn test_cyclone_interaction_terms() {
        let at = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let features = CycloneFeatures::build(&snapshot(), Location::new(15.0, 90.0), at);

        assert!((features.temp_pressure_ratio - 0.03).abs() < 1e-9);
        assert!((features.wind_pressure_interaction - 20.0).abs() < 1e-9);
        assert!((features.humid_temp_index - 24.0).abs() < 1e-9);
        assert!((features.precip_temp_humid - 19200.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_pressure_guard() {
        let mut s = snapshot();
        s.pressure = 0.0;
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let features = CycloneFeatures::build(&s, Location::new(0.0, 0.0), at);
        assert_eq!(features.temp_pressure_ratio, 0.0);
    }

    #[test]
    fn test_wind_fluctuation_uses_forecast_trend() {
        let mut s = snapshot();
        s.forecast = vec![
            crate::models::ForecastSample {
                wind_speed: Some(26.0),
                ..Default::default()
            },
            crate::models::ForecastSample {
                wind_speed: Some(30.0),
                ..Default::default()
            },
        ];
        let at = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let features = CycloneFeatures::build(&s, Location::new(15.0, 90.0), at);
        // trend = 28, current = 20
        assert!((features.wind_fluctuation - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_cyclical_encoding_is_continuous_at_boundaries() {
        // December and January should sit near each other on the circle
        let (sin_dec, cos_dec) = cyclical(12.0, 12.0);
        let (sin_jan, cos_jan) = cyclical(1.0, 12.0);
        let gap = ((sin_dec - sin_jan).powi(2) + (cos_dec - cos_jan).powi(2)).sqrt();
        let linear_gap = 11.0;
        assert!(gap < 1.0, "cyclical gap {} should beat linear {}", gap, linear_gap);
    }

    #[test]
    fn test_feature_builder_is_deterministic() {
        let at = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let location = Location::new(15.0, 90.0);
        let s = snapshot();

        let first = CycloneFeatures::build(&s, location, at);
        let second = CycloneFeatures::build(&s, location, at);
        assert_eq!(first, second);
        assert_eq!(first.to_row(), second.to_row());
    }

    #[test]
    fn test_earthquake_features_from_empty_catalog() {
        let catalog = SeismicCatalog::default();
        let features = EarthquakeFeatures::build(Location::new(12.0, 77.0), &catalog);
        let row = features.to_row();

        assert_eq!(row, [12.0, 77.0, 0.0, 0.0, 1000.0, 0.0]);
    }

    #[test]
    fn test_padding_policy() {
        let padded = pad_to_width(&[1.0, 2.0, 3.0, 4.0], EARTHQUAKE_FEATURE_WIDTH);
        assert_eq!(padded.len(), EARTHQUAKE_FEATURE_WIDTH);
        assert_eq!(padded, vec![1.0, 2.0, 3.0, 4.0, 0.0, 0.0]);

        // Wider input is truncated, not an error
        let truncated = pad_to_width(&[1.0; 8], EARTHQUAKE_FEATURE_WIDTH);
        assert_eq!(truncated.len(), EARTHQUAKE_FEATURE_WIDTH);
    }
}
