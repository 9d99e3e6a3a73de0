//! Integration tests for the risk fusion engine
//!
//! Drive the full assessment pipeline over a mock signal source. Model
//! artifacts are absent, so scoring reports the unavailable verdict and
//! the fused level equals the heuristic level exactly.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use hazard_sentry::{
    EngineConfig, EngineError, EngineResult, ForecastSample, Location, ModelRegistry,
    RiskAnalyzer, RiskLevel, SeismicEvent, SignalSource, WeatherSnapshot,
};

/// Canned signal source; a `None` slot simulates a provider failure
struct MockSignalSource {
    weather: Option<WeatherSnapshot>,
    forecast: Option<Vec<ForecastSample>>,
    events: Option<Vec<SeismicEvent>>,
}

impl MockSignalSource {
    fn calm() -> Self {
        Self {
            weather: Some(snapshot_with_wind(5.0)),
            forecast: Some(Vec::new()),
            events: Some(Vec::new()),
        }
    }
}

#[async_trait]
impl SignalSource for MockSignalSource {
    async fn fetch_weather(&self, _location: Location) -> EngineResult<WeatherSnapshot> {
        self.weather
            .clone()
            .ok_or_else(|| EngineError::weather_fetch_failed("mock outage"))
    }

    async fn fetch_forecast(&self, _location: Location) -> EngineResult<Vec<ForecastSample>> {
        self.forecast
            .clone()
            .ok_or_else(|| EngineError::forecast_fetch_failed("mock outage"))
    }

    async fn fetch_recent_seismic_events(
        &self,
        _window: Duration,
    ) -> EngineResult<Vec<SeismicEvent>> {
        self.events
            .clone()
            .ok_or_else(|| EngineError::seismic_fetch_failed("mock outage"))
    }
}

fn snapshot_with_wind(wind_speed: f64) -> WeatherSnapshot {
    WeatherSnapshot {
        wind_speed,
        wind_direction: 200.0,
        pressure: 995.0,
        humidity: 85.0,
        temperature: 29.0,
        feels_like: 33.0,
        temp_min: 27.0,
        temp_max: 31.0,
        visibility: 6000.0,
        cloud_cover: 90.0,
        forecast: Vec::new(),
    }
}

/// Event roughly `km` kilometers due north of the origin (0, 0);
/// one degree of latitude is ~111.19 km
fn quake_north_of_origin(km: f64, magnitude: f64) -> SeismicEvent {
    SeismicEvent {
        epicenter: Location::new(km / 111.19, 0.0),
        magnitude,
        time_ms: 1_700_000_000_000,
    }
}

fn analyzer_with(source: MockSignalSource) -> RiskAnalyzer {
    // No artifacts under this directory: scoring is unavailable by design
    let config = EngineConfig {
        model_dir: PathBuf::from("/nonexistent/hazard-models"),
        ..EngineConfig::default()
    };
    let models = Arc::new(ModelRegistry::load(&config));
    RiskAnalyzer::new(config, Arc::new(source), models)
}

#[tokio::test]
async fn test_cyclone_heuristic_drives_fused_level_when_model_unavailable() {
    let analyzer = analyzer_with(MockSignalSource {
        weather: Some(snapshot_with_wind(40.0)),
        forecast: Some(Vec::new()),
        events: Some(Vec::new()),
    });

    let assessment = analyzer.assess_cyclone_risk(Location::new(15.0, 90.0)).await;

    assert_eq!(assessment.risk_level, RiskLevel::High);
    assert!(assessment.details.contains("Hurricane force winds detected!"));
    // Model never scored, so the fused level equals the heuristic level
    // and the diagnostic probability is absent
    assert!(assessment.raw_score.is_none());
}

#[tokio::test]
async fn test_cyclone_wind_ladder_through_the_engine() {
    for (wind_speed, expected) in [
        (35.0, RiskLevel::High),
        (30.0, RiskLevel::Moderate),
        (15.0, RiskLevel::Low),
        (5.0, RiskLevel::None),
    ] {
        let analyzer = analyzer_with(MockSignalSource {
            weather: Some(snapshot_with_wind(wind_speed)),
            forecast: Some(Vec::new()),
            events: Some(Vec::new()),
        });
        let assessment = analyzer.assess_cyclone_risk(Location::new(15.0, 90.0)).await;
        assert_eq!(
            assessment.risk_level, expected,
            "wind {} m/s should be {:?}",
            wind_speed, expected
        );
    }
}

#[tokio::test]
async fn test_calm_conditions_yield_no_risk_sentinel() {
    let analyzer = analyzer_with(MockSignalSource::calm());

    let cyclone = analyzer.assess_cyclone_risk(Location::new(15.0, 90.0)).await;
    assert_eq!(cyclone.risk_level, RiskLevel::None);
    assert_eq!(cyclone.details, "No immediate cyclone risk");

    let earthquake = analyzer.assess_earthquake_risk(Location::new(0.0, 0.0)).await;
    assert_eq!(earthquake.risk_level, RiskLevel::None);
    assert_eq!(earthquake.details, "No immediate earthquake risk detected");
}

#[tokio::test]
async fn test_major_earthquake_nearby_is_high_risk() {
    let analyzer = analyzer_with(MockSignalSource {
        weather: Some(snapshot_with_wind(5.0)),
        forecast: Some(Vec::new()),
        events: Some(vec![quake_north_of_origin(40.0, 6.2)]),
    });

    let assessment = analyzer.assess_earthquake_risk(Location::new(0.0, 0.0)).await;

    assert_eq!(assessment.risk_level, RiskLevel::High);
    assert!(assessment.details.contains("Major earthquake M6.2"));
    assert!(assessment.raw_score.is_none());
}

#[tokio::test]
async fn test_only_top_ranked_event_sets_the_tier() {
    // Strongest event (M6.5 at ~90 km) only clears the moderate tier;
    // the closer M5.2 would clear the significant tier but the ranking
    // rule never consults it
    let analyzer = analyzer_with(MockSignalSource {
        weather: Some(snapshot_with_wind(5.0)),
        forecast: Some(Vec::new()),
        events: Some(vec![
            quake_north_of_origin(90.0, 6.5),
            quake_north_of_origin(40.0, 5.2),
        ]),
    });

    let assessment = analyzer.assess_earthquake_risk(Location::new(0.0, 0.0)).await;

    assert_eq!(assessment.risk_level, RiskLevel::Low);
    assert!(assessment.details.contains("M6.5"));
}

#[tokio::test]
async fn test_events_outside_radius_are_ignored() {
    let analyzer = analyzer_with(MockSignalSource {
        weather: Some(snapshot_with_wind(5.0)),
        forecast: Some(Vec::new()),
        events: Some(vec![quake_north_of_origin(150.0, 7.5)]),
    });

    let assessment = analyzer.assess_earthquake_risk(Location::new(0.0, 0.0)).await;
    assert_eq!(assessment.risk_level, RiskLevel::None);
}

#[tokio::test]
async fn test_weather_outage_degrades_to_level_zero() {
    let analyzer = analyzer_with(MockSignalSource {
        weather: None,
        forecast: Some(Vec::new()),
        events: Some(Vec::new()),
    });

    let assessment = analyzer.assess_cyclone_risk(Location::new(15.0, 90.0)).await;

    assert_eq!(assessment.risk_level, RiskLevel::None);
    assert_eq!(assessment.details, "Weather data unavailable");
    assert!(assessment.raw_score.is_none());
}

#[tokio::test]
async fn test_seismic_outage_degrades_to_level_zero() {
    let analyzer = analyzer_with(MockSignalSource {
        weather: Some(snapshot_with_wind(5.0)),
        forecast: Some(Vec::new()),
        events: None,
    });

    let assessment = analyzer.assess_earthquake_risk(Location::new(0.0, 0.0)).await;

    assert_eq!(assessment.risk_level, RiskLevel::None);
    assert_eq!(assessment.details, "Seismic data unavailable");
}

#[tokio::test]
async fn test_forecast_outage_only_loses_the_trend() {
    let analyzer = analyzer_with(MockSignalSource {
        weather: Some(snapshot_with_wind(40.0)),
        forecast: None,
        events: Some(Vec::new()),
    });

    let assessment = analyzer.assess_cyclone_risk(Location::new(15.0, 90.0)).await;

    // The heuristic still fires on the current conditions
    assert_eq!(assessment.risk_level, RiskLevel::High);
}

#[tokio::test]
async fn test_malformed_coordinates_never_abort() {
    let analyzer = analyzer_with(MockSignalSource::calm());
    let bad = Location::new(f64::NAN, 200.0);

    let cyclone = analyzer.assess_cyclone_risk(bad).await;
    assert_eq!(cyclone.risk_level, RiskLevel::None);
    assert_eq!(cyclone.details, "Unable to check cyclone risk");

    let earthquake = analyzer.assess_earthquake_risk(bad).await;
    assert_eq!(earthquake.risk_level, RiskLevel::None);
    assert_eq!(earthquake.details, "Unable to check earthquake risk");
}

#[tokio::test]
async fn test_hazard_report_covers_both_domains() {
    let analyzer = analyzer_with(MockSignalSource {
        weather: Some(snapshot_with_wind(26.0)),
        forecast: Some(Vec::new()),
        events: Some(vec![quake_north_of_origin(40.0, 6.2)]),
    });

    let report = analyzer.assess(Location::new(0.0, 0.0)).await;

    assert_eq!(report.cyclone.risk_level, RiskLevel::Moderate);
    assert_eq!(report.earthquake.risk_level, RiskLevel::High);

    let summary = report.summary();
    assert!(summary.contains("Cyclone"));
    assert!(summary.contains("Earthquake"));
    assert!(summary.contains("Storm force winds detected!"));
}

#[tokio::test]
async fn test_batch_preserves_input_order() {
    let analyzer = analyzer_with(MockSignalSource::calm());
    let locations = vec![
        Location::new(0.0, 0.0),
        Location::new(15.0, 90.0),
        Location::new(-30.0, 150.0),
    ];

    let reports = analyzer.assess_batch(&locations).await;

    assert_eq!(reports.len(), 3);
    for (report, location) in reports.iter().zip(&locations) {
        assert_eq!(report.location, *location);
    }
}

#[tokio::test]
async fn test_stats_track_assessments_and_failures() {
    let analyzer = analyzer_with(MockSignalSource {
        weather: None,
        forecast: Some(Vec::new()),
        events: Some(vec![quake_north_of_origin(40.0, 6.2)]),
    });

    analyzer.assess_cyclone_risk(Location::new(15.0, 90.0)).await;
    analyzer.assess_earthquake_risk(Location::new(0.0, 0.0)).await;

    let stats = analyzer.stats();
    assert_eq!(stats.total_assessments, 2);
    assert_eq!(stats.signal_failures, 1);
    assert_eq!(stats.elevated_verdicts, 1);
}
