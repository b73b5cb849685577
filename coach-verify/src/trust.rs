//! Trust-score aggregation over heterogeneous verification signals.
//!
//! The scoring constants here are tuning heuristics; they are exposed as
//! [`TrustWeights`] so deployments can recalibrate without code changes.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use coach_core::{TrustBreakdown, TrustScore};

use crate::types::VerifierResponse;

static FUNCTION_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]\w*\([^()]*\)").unwrap());
static OPERATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[+\-*/^=]").unwrap());
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());

/// Blend weights for the overall trust score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustWeights {
    pub mathematical: f64,
    pub units: f64,
    pub notation: f64,
    pub consistency: f64,
}

impl Default for TrustWeights {
    fn default() -> Self {
        Self { mathematical: 0.4, units: 0.2, notation: 0.2, consistency: 0.2 }
    }
}

/// Pass-rate × mean-confidence over a subset of checks; `default` when the
/// subset is empty.
fn subset_score(
    response: &VerifierResponse,
    include: impl Fn(&crate::types::VerifierCheck) -> bool,
    default: f64,
) -> f64 {
    let subset: Vec<_> = response.checks.iter().filter(|c| include(c)).collect();
    if subset.is_empty() {
        return default;
    }
    let pass_rate = subset.iter().filter(|c| c.passed).count() as f64 / subset.len() as f64;
    let mean_confidence =
        subset.iter().map(|c| c.confidence).sum::<f64>() / subset.len() as f64;
    pass_rate * mean_confidence
}

/// Heuristic notation score over the solution text: 0.5 base, with bonuses
/// for function-call syntax, operators, and digits, capped at 1.0.
fn notation_score(solution_text: &str) -> f64 {
    let mut score: f64 = 0.5;
    if FUNCTION_CALL_RE.is_match(solution_text) {
        score += 0.15;
    }
    if OPERATOR_RE.is_match(solution_text) {
        score += 0.15;
    }
    if DIGIT_RE.is_match(solution_text) {
        score += 0.2;
    }
    score.min(1.0)
}

/// 1 − population standard deviation of all check confidences; 0.5 with no
/// checks.
fn consistency_score(response: &VerifierResponse) -> f64 {
    if response.checks.is_empty() {
        return 0.5;
    }
    let n = response.checks.len() as f64;
    let mean = response.checks.iter().map(|c| c.confidence).sum::<f64>() / n;
    let variance =
        response.checks.iter().map(|c| (c.confidence - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance.sqrt()).clamp(0.0, 1.0)
}

/// Aggregate a verifier response into a [`TrustScore`] with default weights.
pub fn calculate_trust_score(response: &VerifierResponse, solution_text: &str) -> TrustScore {
    calculate_trust_score_with(&TrustWeights::default(), response, solution_text)
}

/// Aggregate a verifier response into a [`TrustScore`] with explicit weights.
pub fn calculate_trust_score_with(
    weights: &TrustWeights,
    response: &VerifierResponse,
    solution_text: &str,
) -> TrustScore {
    let mathematical = subset_score(response, |c| c.check_type.is_mathematical(), 0.5);
    let units = subset_score(response, |c| c.check_type.is_units(), 0.5);
    let notation = notation_score(solution_text);
    let consistency = consistency_score(response);

    let score = (weights.mathematical * mathematical
        + weights.units * units
        + weights.notation * notation
        + weights.consistency * consistency)
        .clamp(0.0, 1.0);

    let check_count = response.checks.len();
    let mean_confidence = if check_count == 0 {
        0.0
    } else {
        response.checks.iter().map(|c| c.confidence).sum::<f64>() / check_count as f64
    };
    let volume_factor = (check_count as f64 / 5.0).min(1.0);
    let confidence = ((0.7 * mean_confidence + 0.3 * response.overall_confidence)
        * volume_factor)
        .clamp(0.0, 1.0);

    TrustScore {
        score,
        breakdown: TrustBreakdown { mathematical, units, notation, consistency },
        confidence,
    }
}

/// Whether a verifier response is reliable enough to gate on: the call
/// succeeded, overall confidence is at least 0.7, at least one check ran,
/// and at least 80% of checks passed.
pub fn is_reliable(response: &VerifierResponse) -> bool {
    response.ok
        && response.overall_confidence >= 0.7
        && !response.checks.is_empty()
        && response.pass_rate() >= 0.8
}
