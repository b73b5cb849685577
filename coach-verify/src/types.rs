//! Wire types for the verifier service.

use serde::{Deserialize, Serialize};

/// The kinds of checks the symbolic verifier can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    Derivative,
    Integral,
    Limit,
    Algebra,
    Units,
    DimensionalAnalysis,
}

impl CheckType {
    /// True for the symbolic-math family of checks.
    pub fn is_mathematical(&self) -> bool {
        matches!(
            self,
            CheckType::Derivative | CheckType::Integral | CheckType::Limit | CheckType::Algebra
        )
    }

    /// True for the units family of checks.
    pub fn is_units(&self) -> bool {
        matches!(self, CheckType::Units | CheckType::DimensionalAnalysis)
    }
}

/// One per-check judgment from the verifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifierCheck {
    /// Which check ran.
    #[serde(rename = "type")]
    pub check_type: CheckType,
    /// Whether the check passed.
    pub passed: bool,
    /// The verifier's confidence in this judgment, in [0, 1].
    pub confidence: f64,
    /// A human-readable explanation.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

/// The verifier's aggregate response for one solution.
///
/// `ok == false` only when the external call itself failed or returned no
/// checks; individual failed checks still come back with `ok == true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifierResponse {
    pub ok: bool,
    /// Ordered list of per-check judgments.
    pub checks: Vec<VerifierCheck>,
    /// The verifier's canonical rendering of the answer.
    pub normalized_answer: String,
    /// The verifier's own aggregate confidence, in [0, 1].
    pub overall_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifierResponse {
    /// The failure response substituted when the verifier is unreachable.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            checks: Vec::new(),
            normalized_answer: String::new(),
            overall_confidence: 0.0,
            error: Some(message.into()),
        }
    }

    /// Fraction of checks that passed; 0.0 with no checks.
    pub fn pass_rate(&self) -> f64 {
        if self.checks.is_empty() {
            return 0.0;
        }
        self.checks.iter().filter(|c| c.passed).count() as f64 / self.checks.len() as f64
    }
}

/// Options for one verification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyOptions {
    /// Which checks to request.
    pub check_types: Vec<CheckType>,
    /// Numerical tolerance for equivalence comparisons.
    pub tolerance: f64,
    /// Treat constants of integration as equivalent.
    pub constant_free: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            check_types: vec![CheckType::Derivative, CheckType::Integral, CheckType::Algebra],
            tolerance: 1e-10,
            constant_free: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_type_families() {
        assert!(CheckType::Derivative.is_mathematical());
        assert!(CheckType::Algebra.is_mathematical());
        assert!(!CheckType::Units.is_mathematical());
        assert!(CheckType::DimensionalAnalysis.is_units());
        assert!(!CheckType::Limit.is_units());
    }

    #[test]
    fn check_type_serializes_snake_case() {
        let json = serde_json::to_string(&CheckType::DimensionalAnalysis).unwrap();
        assert_eq!(json, "\"dimensional_analysis\"");
    }

    #[test]
    fn failed_response_shape() {
        let response = VerifierResponse::failed("connection refused");
        assert!(!response.ok);
        assert!(response.checks.is_empty());
        assert_eq!(response.overall_confidence, 0.0);
        assert_eq!(response.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn pass_rate_counts_passed_checks() {
        let check = |passed| VerifierCheck {
            check_type: CheckType::Derivative,
            passed,
            confidence: 0.9,
            message: String::new(),
            expected: None,
            actual: None,
        };
        let response = VerifierResponse {
            ok: true,
            checks: vec![check(true), check(true), check(false), check(false)],
            normalized_answer: String::new(),
            overall_confidence: 0.9,
            error: None,
        };
        assert_eq!(response.pass_rate(), 0.5);
    }
}
