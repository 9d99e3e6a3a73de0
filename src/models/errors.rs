//! Centralized Error Handling Module
//!
//! Every failure carries a unique code for logging and monitoring.
//! Codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - WEATHER_xxx / SEISMIC_xxx / PROVIDER_xxx: signal acquisition errors
//! - MODEL_xxx: scoring artifact errors
//! - CFG_xxx: configuration errors
//!
//! None of these surface from the public assessment operations: every
//! failure mode downgrades to a conservative level-0 contribution there.

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct EngineError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl EngineError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Signal Acquisition Errors
    // ============================================
    /// Current-weather fetch failed
    WeatherFetchFailed,
    /// Forecast fetch failed
    ForecastFetchFailed,
    /// Seismic feed fetch failed
    SeismicFetchFailed,
    /// Provider request timed out
    ProviderTimeout,
    /// Provider rate limited (HTTP 429)
    ProviderRateLimited,
    /// Provider payload could not be parsed
    InvalidResponse,

    // ============================================
    // Model Scoring Errors
    // ============================================
    /// Model artifact not found on disk
    ModelMissing,
    /// Model artifact present but failed to load
    ModelLoadFailed,
    /// Inference over a loaded model failed
    ModelInferenceFailed,
    /// Scaler sidecar missing or malformed
    ScalerInvalid,

    // ============================================
    // Input Errors
    // ============================================
    /// Non-numeric or out-of-range coordinates
    MalformedCoordinates,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Missing environment variable
    ConfigMissingEnv,
    /// Invalid configuration value
    ConfigInvalidValue,

    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeatherFetchFailed => "WEATHER_FETCH_FAILED",
            Self::ForecastFetchFailed => "FORECAST_FETCH_FAILED",
            Self::SeismicFetchFailed => "SEISMIC_FETCH_FAILED",
            Self::ProviderTimeout => "PROVIDER_TIMEOUT",
            Self::ProviderRateLimited => "PROVIDER_RATE_LIMITED",
            Self::InvalidResponse => "INVALID_RESPONSE",

            Self::ModelMissing => "MODEL_MISSING",
            Self::ModelLoadFailed => "MODEL_LOAD_FAILED",
            Self::ModelInferenceFailed => "MODEL_INFERENCE_FAILED",
            Self::ScalerInvalid => "SCALER_INVALID",

            Self::MalformedCoordinates => "MALFORMED_COORDINATES",

            Self::ConfigMissingEnv => "CFG_MISSING_ENV",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Signal-acquisition failures degrade that hazard's contribution to
    /// level 0; retry/backoff belongs to the external collaborator.
    pub fn is_signal_failure(&self) -> bool {
        matches!(
            self,
            Self::WeatherFetchFailed
                | Self::ForecastFetchFailed
                | Self::SeismicFetchFailed
                | Self::ProviderTimeout
                | Self::ProviderRateLimited
                | Self::InvalidResponse
        )
    }

    /// Model failures make scoring report an unavailable verdict
    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            Self::ModelMissing
                | Self::ModelLoadFailed
                | Self::ModelInferenceFailed
                | Self::ScalerInvalid
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl EngineError {
    pub fn weather_fetch_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::WeatherFetchFailed, msg)
    }

    pub fn forecast_fetch_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ForecastFetchFailed, msg)
    }

    pub fn seismic_fetch_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SeismicFetchFailed, msg)
    }

    pub fn rate_limited() -> Self {
        Self::new(ErrorCode::ProviderRateLimited, "Rate limited (HTTP 429)")
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidResponse, msg)
    }

    pub fn model_missing(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelMissing, msg)
    }

    pub fn model_load_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelLoadFailed, msg)
    }

    pub fn inference_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ModelInferenceFailed, msg)
    }

    pub fn scaler_invalid(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ScalerInvalid, msg)
    }

    pub fn malformed_coordinates(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedCoordinates, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Engine Result type
pub type EngineResult<T> = Result<T, EngineError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::ProviderTimeout, "Request timeout")
        } else if err.status().map(|s| s.as_u16()) == Some(429) {
            Self::rate_limited()
        } else if err.is_decode() {
            Self::with_source(ErrorCode::InvalidResponse, "Response decode error", err)
        } else {
            Self::new(ErrorCode::Unknown, err.to_string())
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::InvalidResponse, "JSON parse error", err)
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<eyre::Report> for EngineError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}
