//! Core Module - Risk Fusion Engine
//!
//! The deterministic pipeline: feature building, heuristic evaluation,
//! model scoring and fusion into one auditable verdict.

pub mod analyzer;
pub mod features;
pub mod fusion;
pub mod heuristics;
pub mod scoring;

pub use analyzer::*;
pub use features::*;
pub use fusion::*;
pub use heuristics::*;
pub use scoring::*;
