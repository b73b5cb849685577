//! Exam variant classification.
//!
//! The coach serves two exam flavors: AB (limits, derivatives, integrals and
//! their applications) and BC (everything in AB plus series, parametric,
//! polar, and vector calculus). [`detect_variant`] classifies free-form text
//! by keyword evidence; BC-only vocabulary dominates when present.

use serde::{Deserialize, Serialize};

/// The exam flavor a question or document targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamVariant {
    /// Calculus AB.
    CalcAb,
    /// Calculus BC (superset of AB).
    CalcBc,
}

impl ExamVariant {
    /// A stable string form matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamVariant::CalcAb => "calc_ab",
            ExamVariant::CalcBc => "calc_bc",
        }
    }
}

impl std::fmt::Display for ExamVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vocabulary only covered by the BC exam, grouped by topic family.
pub const BC_KEYWORDS: &[&str] = &[
    // series
    "series",
    "convergence",
    "divergence",
    "geometric series",
    "p-series",
    "ratio test",
    "root test",
    "comparison test",
    "integral test",
    "alternating series",
    "radius of convergence",
    "interval of convergence",
    "power series",
    "taylor series",
    "maclaurin series",
    "taylor polynomial",
    "lagrange error bound",
    // parametric
    "parametric",
    "parameter",
    "parametric equations",
    "parametric curve",
    "x(t)",
    "y(t)",
    // polar
    "polar",
    "polar coordinates",
    "polar curve",
    "theta",
    "θ",
    // vector
    "vector",
    "vector-valued function",
    "position vector",
    "velocity vector",
    "acceleration vector",
    "curvature",
];

/// Vocabulary common to both exams (the AB core).
pub const AB_KEYWORDS: &[&str] = &[
    // limits
    "limit",
    "lim",
    "approaches",
    "continuity",
    "continuous",
    "discontinuous",
    "squeeze theorem",
    "intermediate value theorem",
    "one-sided limit",
    // derivatives
    "derivative",
    "differentiation",
    "differentiable",
    "chain rule",
    "product rule",
    "quotient rule",
    "implicit differentiation",
    "related rates",
    "optimization",
    "critical point",
    "inflection point",
    "concavity",
    "mean value theorem",
    "rolle's theorem",
    "l'hopital's rule",
    // integrals
    "integral",
    "integration",
    "antiderivative",
    "definite integral",
    "indefinite integral",
    "fundamental theorem of calculus",
    "riemann sum",
    "u-substitution",
    "integration by parts",
    "average value",
    // applications
    "area under curve",
    "volume",
    "disk method",
    "washer method",
    "shell method",
    "arc length",
];

/// Classify text as AB or BC based on keyword evidence.
///
/// Returns the detected variant, a confidence in [0, 1], and the keywords
/// that drove the decision. Any BC-only keyword makes the text BC; AB
/// keywords alone yield AB; no evidence defaults to AB at low confidence.
pub fn detect_variant(text: &str) -> (ExamVariant, f64, Vec<String>) {
    let lower = text.to_lowercase();

    let bc_hits: Vec<String> = BC_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(**kw))
        .map(|kw| kw.to_string())
        .collect();
    if !bc_hits.is_empty() {
        let confidence = (0.5 + bc_hits.len() as f64 * 0.1).min(0.9);
        return (ExamVariant::CalcBc, confidence, bc_hits);
    }

    let ab_hits: Vec<String> = AB_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(**kw))
        .map(|kw| kw.to_string())
        .collect();
    if !ab_hits.is_empty() {
        let confidence = (0.4 + ab_hits.len() as f64 * 0.05).min(0.8);
        return (ExamVariant::CalcAb, confidence, ab_hits);
    }

    (ExamVariant::CalcAb, 0.3, Vec::new())
}
