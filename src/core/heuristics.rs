//! Heuristic Risk Evaluators
//!
//! Pure threshold rules over raw signals, independent of any trained
//! model. They keep raising alarms when a model artifact is missing or
//! miscalibrated.

use crate::models::{RiskLevel, SeismicCatalog, WeatherSnapshot};

/// Beaufort-derived wind thresholds in m/s
pub const HURRICANE_FORCE_MS: f64 = 32.7;
pub const STORM_FORCE_MS: f64 = 24.5;
pub const STRONG_WIND_MS: f64 = 13.9;

/// A threshold-based judgment. `detail` is present only when the rule
/// actually fired, so level-0 verdicts contribute nothing to the fused
/// detail text.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicVerdict {
    pub level: RiskLevel,
    pub detail: Option<String>,
}

impl HeuristicVerdict {
    pub fn none() -> Self {
        Self {
            level: RiskLevel::None,
            detail: None,
        }
    }

    fn elevated(level: RiskLevel, detail: String) -> Self {
        Self {
            level,
            detail: Some(detail),
        }
    }
}

/// Judge cyclone risk from the current wind speed alone
pub fn evaluate_cyclone(snapshot: &WeatherSnapshot) -> HeuristicVerdict {
    let wind_speed = snapshot.wind_speed;

    if wind_speed > HURRICANE_FORCE_MS {
        HeuristicVerdict::elevated(
            RiskLevel::High,
            "Hurricane force winds detected!".to_string(),
        )
    } else if wind_speed > STORM_FORCE_MS {
        HeuristicVerdict::elevated(RiskLevel::Moderate, "Storm force winds detected!".to_string())
    } else if wind_speed > STRONG_WIND_MS {
        HeuristicVerdict::elevated(RiskLevel::Low, "Strong winds detected!".to_string())
    } else {
        HeuristicVerdict::none()
    }
}

/// Judge earthquake risk from the top-ranked event of the catalog.
///
/// Only the strongest (then closest) event is evaluated; a weaker event
/// qualifying for a higher tier never outranks it.
pub fn evaluate_earthquake(catalog: &SeismicCatalog) -> HeuristicVerdict {
    let strongest = match catalog.strongest() {
        Some(quake) => quake,
        None => return HeuristicVerdict::none(),
    };

    if strongest.magnitude >= 6.0 && strongest.distance_km < 50.0 {
        HeuristicVerdict::elevated(
            RiskLevel::High,
            format!(
                "USGS: Major earthquake M{:.1} detected {:.1}km away!",
                strongest.magnitude, strongest.distance_km
            ),
        )
    } else if strongest.magnitude >= 5.0 && strongest.distance_km < 75.0 {
        HeuristicVerdict::elevated(
            RiskLevel::Moderate,
            format!(
                "USGS: Significant earthquake M{:.1} detected {:.1}km away",
                strongest.magnitude, strongest.distance_km
            ),
        )
    } else if strongest.magnitude >= 4.0 && strongest.distance_km < 100.0 {
        HeuristicVerdict::elevated(
            RiskLevel::Low,
            format!(
                "USGS: Moderate earthquake M{:.1} detected {:.1}km away",
                strongest.magnitude, strongest.distance_km
            ),
        )
    } else {
        HeuristicVerdict::none()
    }
}
