//! Risk Fusion
//!
//! Combines the independent heuristic and model judgments into the one
//! auditable verdict the engine hands to callers.

use crate::core::heuristics::HeuristicVerdict;
use crate::core::scoring::ModelVerdict;
use crate::models::{RiskAssessment, RiskLevel};

/// Fixed no-risk sentinel phrases, per hazard domain
pub const NO_CYCLONE_RISK: &str = "No immediate cyclone risk";
pub const NO_EARTHQUAKE_RISK: &str = "No immediate earthquake risk detected";

/// Maximum-severity fusion.
///
/// `risk_level` is the max of both judgments; the engine never reports a
/// level below any signal it considered. Details concatenate
/// heuristic-then-model, each clause only when its level is elevated;
/// when neither contributed, the fixed sentinel phrase. `raw_score`
/// passes the model probability through unchanged even when the
/// heuristic alone drove the level: it is diagnostic, not authoritative.
pub fn fuse(
    heuristic: HeuristicVerdict,
    model: ModelVerdict,
    no_risk_sentinel: &str,
) -> RiskAssessment {
    let risk_level = heuristic.level.max(model.level);

    let mut clauses: Vec<String> = Vec::new();
    if heuristic.level > RiskLevel::None {
        if let Some(detail) = heuristic.detail {
            clauses.push(detail);
        }
    }
    if model.level > RiskLevel::None {
        clauses.push(model.detail);
    }

    let details = if clauses.is_empty() {
        no_risk_sentinel.to_string()
    } else {
        clauses.join("\n")
    };

    RiskAssessment {
        risk_level,
        details,
        raw_score: model.probability,
    }
}
