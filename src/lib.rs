//! Hazard Sentry Library
//!
//! Disaster risk fusion engine assessing geophysical hazard risk
//! (cyclone, earthquake) for arbitrary coordinates by combining:
//! - Live signals from weather and seismic providers
//! - Physical-threshold heuristics independent of any trained model
//! - Pretrained ONNX classifiers behind a uniform scoring contract
//!
//! Both judgments fuse into one leveled, explainable verdict per hazard.

pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::analyzer::{EngineStats, RiskAnalyzer};
pub use crate::core::features::{CycloneFeatures, EarthquakeFeatures};
pub use crate::core::fusion::fuse;
pub use crate::core::heuristics::{evaluate_cyclone, evaluate_earthquake, HeuristicVerdict};
pub use crate::core::scoring::{ModelRegistry, ModelVerdict};
pub use models::{
    EngineConfig, EngineError, EngineResult, ErrorCode, ForecastSample, HazardReport, Location,
    RiskAssessment, RiskLevel, SeismicCatalog, SeismicEvent, WeatherSnapshot,
};
pub use providers::{LiveSignalSource, OpenWeatherClient, SignalSource, UsgsClient};
pub use utils::{haversine_km, CacheStats, SnapshotCache};
