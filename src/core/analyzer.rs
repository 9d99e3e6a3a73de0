//! Risk Analyzer
//!
//! Orchestrates the assessment pipeline for one location: signal
//! acquisition, feature building, heuristic and model judgments, fusion.
//! Every assessment is self-contained; the only shared state is the
//! read-mostly model registry.

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::features::{CycloneFeatures, EarthquakeFeatures};
use crate::core::fusion::{fuse, NO_CYCLONE_RISK, NO_EARTHQUAKE_RISK};
use crate::core::heuristics::{evaluate_cyclone, evaluate_earthquake};
use crate::core::scoring::ModelRegistry;
use crate::models::{
    EngineConfig, HazardReport, Location, RiskAssessment, RiskLevel, SeismicCatalog,
};
use crate::providers::SignalSource;

/// Thread-safe assessment counters
#[derive(Default)]
struct AnalyzerStats {
    total_assessments: AtomicU64,
    signal_failures: AtomicU64,
    elevated_verdicts: AtomicU64,
}

/// Snapshot of the analyzer counters
#[derive(Debug, Clone)]
pub struct EngineStats {
    pub total_assessments: u64,
    pub signal_failures: u64,
    pub elevated_verdicts: u64,
}

/// Main engine entry point.
///
/// The public assessment operations never fail for a structurally valid
/// location: every acquisition or scoring failure downgrades to a
/// conservative level-0 contribution with an explanatory detail string.
/// Callers must not read level 0 as a guarantee of safety.
pub struct RiskAnalyzer {
    config: EngineConfig,
    signals: Arc<dyn SignalSource>,
    models: Arc<ModelRegistry>,
    stats: Arc<AnalyzerStats>,
}

impl RiskAnalyzer {
    pub fn new(
        config: EngineConfig,
        signals: Arc<dyn SignalSource>,
        models: Arc<ModelRegistry>,
    ) -> Self {
        Self {
            config,
            signals,
            models,
            stats: Arc::new(AnalyzerStats::default()),
        }
    }

    /// Assess cyclone risk for a location against the current wall clock
    pub async fn assess_cyclone_risk(&self, location: Location) -> RiskAssessment {
        self.assess_cyclone_risk_at(location, Utc::now()).await
    }

    /// Clock-injected cyclone assessment; `at` feeds the cyclical time
    /// features, keeping tests deterministic across midnight and month
    /// boundaries
    pub async fn assess_cyclone_risk_at(
        &self,
        location: Location,
        at: DateTime<Utc>,
    ) -> RiskAssessment {
        self.count_assessment();

        if !location.is_valid() {
            warn!("⚠️ [MALFORMED_COORDINATES] Cyclone check skipped for {}", location);
            return RiskAssessment::no_signal("Unable to check cyclone risk");
        }

        let mut snapshot = match self.signals.fetch_weather(location).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.stats.signal_failures.fetch_add(1, Ordering::Relaxed);
                warn!("⚠️ [{}] Weather fetch failed for {}: {}", err.code_str(), location, err);
                return RiskAssessment::no_signal("Weather data unavailable");
            }
        };

        // A lost forecast only costs the trend features
        match self.signals.fetch_forecast(location).await {
            Ok(samples) => snapshot.forecast = samples,
            Err(err) => {
                self.stats.signal_failures.fetch_add(1, Ordering::Relaxed);
                warn!("⚠️ [{}] Forecast fetch failed for {}: {}", err.code_str(), location, err);
            }
        }

        let heuristic = evaluate_cyclone(&snapshot);
        let features = CycloneFeatures::build(&snapshot, location, at);
        let model = self.models.score_cyclone(&features);

        debug!(
            "🌀 Cyclone {}: wind {:.1} m/s, heuristic {}, model {}",
            location,
            snapshot.wind_speed,
            heuristic.level.as_str(),
            model.level.as_str()
        );

        self.finish(fuse(heuristic, model, NO_CYCLONE_RISK))
    }

    /// Assess earthquake risk for a location from the recent seismic
    /// catalog within the proximity radius
    pub async fn assess_earthquake_risk(&self, location: Location) -> RiskAssessment {
        self.count_assessment();

        if !location.is_valid() {
            warn!("⚠️ [MALFORMED_COORDINATES] Earthquake check skipped for {}", location);
            return RiskAssessment::no_signal("Unable to check earthquake risk");
        }

        let feed = match self
            .signals
            .fetch_recent_seismic_events(self.config.seismic_lookback)
            .await
        {
            Ok(feed) => feed,
            Err(err) => {
                self.stats.signal_failures.fetch_add(1, Ordering::Relaxed);
                warn!("⚠️ [{}] Seismic fetch failed: {}", err.code_str(), err);
                return RiskAssessment::no_signal("Seismic data unavailable");
            }
        };

        let catalog = SeismicCatalog::from_feed(location, &feed, self.config.seismic_radius_km);

        let heuristic = evaluate_earthquake(&catalog);
        let features = EarthquakeFeatures::build(location, &catalog);
        let model = self.models.score_earthquake(&features);

        debug!(
            "🌍 Earthquake {}: {} nearby events, heuristic {}, model {}",
            location,
            catalog.len(),
            heuristic.level.as_str(),
            model.level.as_str()
        );

        self.finish(fuse(heuristic, model, NO_EARTHQUAKE_RISK))
    }

    /// Both hazard verdicts for one location
    pub async fn assess(&self, location: Location) -> HazardReport {
        let (cyclone, earthquake) = tokio::join!(
            self.assess_cyclone_risk(location),
            self.assess_earthquake_risk(location)
        );

        HazardReport {
            location,
            assessed_at: Utc::now(),
            cyclone,
            earthquake,
        }
    }

    /// Assess many locations with bounded concurrency. Reports come back
    /// in input order; assessments themselves run independently, capped
    /// by `max_concurrent_assessments` to respect provider rate limits.
    pub async fn assess_batch(&self, locations: &[Location]) -> Vec<HazardReport> {
        info!(
            "📋 Batch assessment: {} locations, {} concurrent",
            locations.len(),
            self.config.max_concurrent_assessments
        );

        futures_util::stream::iter(locations.iter().copied())
            .map(|location| self.assess(location))
            .buffered(self.config.max_concurrent_assessments.max(1))
            .collect()
            .await
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            total_assessments: self.stats.total_assessments.load(Ordering::Relaxed),
            signal_failures: self.stats.signal_failures.load(Ordering::Relaxed),
            elevated_verdicts: self.stats.elevated_verdicts.load(Ordering::Relaxed),
        }
    }

    fn count_assessment(&self) {
        self.stats.total_assessments.fetch_add(1, Ordering::Relaxed);
    }

    fn finish(&self, assessment: RiskAssessment) -> RiskAssessment {
        if assessment.risk_level > RiskLevel::None {
            self.stats.elevated_verdicts.fetch_add(1, Ordering::Relaxed);
            info!(
                "🚨 Elevated risk {} ({}): {}",
                assessment.risk_level.as_str(),
                assessment.risk_level.as_u8(),
                assessment.details.replace('\n', " | ")
            );
        }
        assessment
    }
}
