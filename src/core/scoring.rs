//! Model Scoring Adapters
//!
//! Uniform probability-scoring contract over the pretrained ONNX
//! artifacts: a gradient-boosted classifier for cyclones and a small
//! feed-forward network with input normalization for earthquakes.
//!
//! The registry is built once at process start and injected by `Arc`;
//! there is no module-level model handle. A missing or corrupt artifact
//! is a sentinel unavailable state, not a fault: every scoring call then
//! reports `probability: None` with an explanatory string. Errors during
//! shaping, normalization or inference never cross the adapter boundary.

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use serde::Deserialize;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

use crate::core::features::{
    pad_to_width, CycloneFeatures, EarthquakeFeatures, CYCLONE_FEATURE_WIDTH,
    EARTHQUAKE_FEATURE_WIDTH,
};
use crate::models::{EngineConfig, EngineError, EngineResult, RiskLevel};

/// Scoring outcome for one hazard domain
#[derive(Debug, Clone, PartialEq)]
pub struct ModelVerdict {
    /// Probability in [0,1]; None when scoring was unavailable
    pub probability: Option<f64>,
    pub level: RiskLevel,
    pub detail: String,
}

impl ModelVerdict {
    /// Sentinel verdict for a model that could not score
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self {
            probability: None,
            level: RiskLevel::None,
            detail: detail.into(),
        }
    }
}

/// Probability cut points for the cyclone classifier
pub fn cyclone_verdict(probability: f64) -> ModelVerdict {
    let (level, detail) = if probability > 0.75 {
        (RiskLevel::High, "High cyclone risk predicted by ML model")
    } else if probability > 0.5 {
        (
            RiskLevel::Moderate,
            "Moderate cyclone risk predicted by ML model",
        )
    } else if probability > 0.25 {
        (RiskLevel::Low, "Low cyclone risk predicted by ML model")
    } else {
        (
            RiskLevel::None,
            "No immediate cyclone risk predicted by ML model",
        )
    };

    ModelVerdict {
        probability: Some(probability),
        level,
        detail: detail.to_string(),
    }
}

/// Linear scaling for the earthquake network: trunc(p * 3), clamped.
/// Intentionally different from the cyclone cut points; unifying the two
/// would silently shift alert thresholds without recalibration.
pub fn earthquake_verdict(probability: f64) -> ModelVerdict {
    let level = match ((probability * 3.0) as i64).clamp(0, 3) {
        0 => RiskLevel::None,
        1 => RiskLevel::Low,
        2 => RiskLevel::Moderate,
        _ => RiskLevel::High,
    };

    let detail = match level {
        RiskLevel::None => "ML Model: No immediate earthquake risk predicted.",
        RiskLevel::Low => "ML Model: Low earthquake risk predicted. Stay alert.",
        RiskLevel::Moderate => {
            "ML Model: Moderate earthquake risk predicted. Prepare for potential evacuation."
        }
        RiskLevel::High => "ML Model: High earthquake risk predicted. Immediate action required.",
    };

    ModelVerdict {
        probability: Some(probability),
        level,
        detail: detail.to_string(),
    }
}

// ============================================
// SCALER SIDECAR
// ============================================

/// Fitted per-feature standardization parameters for the earthquake
/// network, stored as a JSON sidecar next to the model artifact
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FeatureScaler {
    pub fn load(path: &Path) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::scaler_invalid(format!("Cannot read scaler {}: {}", path.display(), e))
        })?;
        let scaler: FeatureScaler = serde_json::from_str(&raw)
            .map_err(|e| EngineError::scaler_invalid(format!("Malformed scaler JSON: {}", e)))?;

        if scaler.mean.is_empty() || scaler.mean.len() != scaler.scale.len() {
            return Err(EngineError::scaler_invalid(format!(
                "Scaler vectors disagree: {} means vs {} scales",
                scaler.mean.len(),
                scaler.scale.len()
            )));
        }
        Ok(scaler)
    }

    /// Input width the network was fitted on
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Standardize a row: (x - mean) / scale, with a floor on the scale
    /// so a constant training column cannot divide by zero
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .enumerate()
            .map(|(i, &x)| {
                let mean = self.mean.get(i).copied().unwrap_or(0.0);
                let scale = self.scale.get(i).copied().unwrap_or(1.0).max(1e-8);
                (x - mean) / scale
            })
            .collect()
    }
}

// ============================================
// MODEL REGISTRY
// ============================================

/// One loaded artifact, or the reason it is unavailable.
/// `Session::run` takes `&mut self`, hence the mutex; the registry is
/// otherwise read-only after construction.
enum ModelState {
    Loaded(Mutex<Session>),
    Unavailable(String),
}

/// Pretrained models keyed by hazard domain, loaded once per process
pub struct ModelRegistry {
    cyclone: ModelState,
    earthquake: ModelState,
    earthquake_scaler: Option<FeatureScaler>,
}

impl ModelRegistry {
    /// Load every artifact under the configured model directory.
    /// Never fails: a missing or corrupt artifact degrades that domain
    /// to the unavailable verdict.
    pub fn load(config: &EngineConfig) -> Self {
        let cyclone = Self::load_model("cyclone", &config.cyclone_model_path());
        let earthquake = Self::load_model("earthquake", &config.earthquake_model_path());

        let earthquake_scaler = match FeatureScaler::load(&config.earthquake_scaler_path()) {
            Ok(scaler) => {
                info!("📏 Earthquake scaler loaded ({} features)", scaler.width());
                Some(scaler)
            }
            Err(err) => {
                warn!("⚠️ [{}] {}", err.code_str(), err);
                None
            }
        };

        Self {
            cyclone,
            earthquake,
            earthquake_scaler,
        }
    }

    fn load_model(domain: &str, path: &Path) -> ModelState {
        if !path.exists() {
            warn!("⚠️ [MODEL_MISSING] No {} model at {}", domain, path.display());
            return ModelState::Unavailable(format!("Model not available: {}", path.display()));
        }

        let session = Session::builder().and_then(|b| {
            let mut b = b.with_optimization_level(GraphOptimizationLevel::Level3)?;
            b.commit_from_file(path)
        });

        match session {
            Ok(session) => {
                info!("🧠 {} model loaded from {}", domain, path.display());
                ModelState::Loaded(Mutex::new(session))
            }
            Err(err) => {
                let reason = format!("Model failed to load: {}", err);
                warn!("⚠️ [MODEL_LOAD_FAILED] {} model: {}", domain, err);
                ModelState::Unavailable(reason)
            }
        }
    }

    /// Registry with no loaded artifacts; every scoring call reports the
    /// unavailable verdict. Used where model-free behavior is wanted.
    pub fn empty() -> Self {
        Self {
            cyclone: ModelState::Unavailable("Model not available".to_string()),
            earthquake: ModelState::Unavailable("Model not available".to_string()),
            earthquake_scaler: None,
        }
    }

    pub fn cyclone_available(&self) -> bool {
        matches!(self.cyclone, ModelState::Loaded(_))
    }

    pub fn earthquake_available(&self) -> bool {
        matches!(self.earthquake, ModelState::Loaded(_))
    }

    /// Score the cyclone feature row. The row is produced by the single
    /// serialization function bound to the training column order, so a
    /// width mismatch here is a programmer error, not a runtime state.
    pub fn score_cyclone(&self, features: &CycloneFeatures) -> ModelVerdict {
        let row = features.to_row();
        debug_assert_eq!(row.len(), CYCLONE_FEATURE_WIDTH);

        match &self.cyclone {
            ModelState::Unavailable(reason) => ModelVerdict::unavailable(reason.clone()),
            ModelState::Loaded(session) => match run_inference(session, &row) {
                Ok(probability) => cyclone_verdict(probability),
                Err(err) => {
                    warn!("⚠️ [{}] Cyclone scoring failed: {}", err.code_str(), err);
                    ModelVerdict::unavailable("Error in prediction")
                }
            },
        }
    }

    /// Score the earthquake feature row, right-padding to the fitted
    /// input width and standardizing with the scaler sidecar first
    pub fn score_earthquake(&self, features: &EarthquakeFeatures) -> ModelVerdict {
        match &self.earthquake {
            ModelState::Unavailable(reason) => ModelVerdict::unavailable(reason.clone()),
            ModelState::Loaded(session) => {
                let width = self
                    .earthquake_scaler
                    .as_ref()
                    .map(|s| s.width())
                    .unwrap_or(EARTHQUAKE_FEATURE_WIDTH);
                let row = pad_to_width(&features.to_row(), width);
                let row = match &self.earthquake_scaler {
                    Some(scaler) => scaler.transform(&row),
                    None => row,
                };

                match run_inference(session, &row) {
                    Ok(probability) => earthquake_verdict(probability),
                    Err(err) => {
                        warn!("⚠️ [{}] Earthquake scoring failed: {}", err.code_str(), err);
                        ModelVerdict::unavailable("Unable to make prediction due to error")
                    }
                }
            }
        }
    }
}

/// Run one row through a session and pull the positive-class
/// probability out of the last output slot. Works for both the
/// two-column probability layout of the classifier and the single
/// sigmoid output of the network.
fn run_inference(session: &Mutex<Session>, row: &[f64]) -> EngineResult<f64> {
    let mut session = session
        .lock()
        .map_err(|_| EngineError::inference_failed("Model session poisoned"))?;

    let input: Vec<f32> = row.iter().map(|&v| v as f32).collect();
    let array = Array2::<f32>::from_shape_vec((1, input.len()), input)
        .map_err(|e| EngineError::inference_failed(format!("Input shape error: {}", e)))?;

    let output_name = session
        .outputs()
        .last()
        .map(|o| o.name().to_string())
        .ok_or_else(|| EngineError::inference_failed("Model declares no outputs"))?;

    let tensor = Value::from_array(array)
        .map_err(|e| EngineError::inference_failed(format!("Tensor error: {}", e)))?;

    let outputs = session
        .run(ort::inputs![tensor])
        .map_err(|e| EngineError::inference_failed(format!("Inference failed: {}", e)))?;

    let output = outputs
        .get(&output_name)
        .ok_or_else(|| EngineError::inference_failed("Declared output missing from results"))?;

    let (_, data) = output
        .try_extract_tensor::<f32>()
        .map_err(|e| EngineError::inference_failed(format!("Output extract error: {}", e)))?;

    let probability = data
        .last()
        .copied()
        .ok_or_else(|| EngineError::inference_failed("Empty output tensor"))?;

    Ok((probability as f64).clamp(0.0, 1.0))
}
