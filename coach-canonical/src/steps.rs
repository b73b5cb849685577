//! Uniform step rendering for canonical solutions.
//!
//! [`format_steps`] turns a solution's authored steps into the uniform step
//! structure the rubric and response builders consume, extracting
//! justification clauses and named-theorem references on the way. A solution
//! with no structured steps yields one synthetic step containing the final
//! answer.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::solution::CanonicalSolution;

/// The fixed vocabulary of named theorems and rules recognized in step text.
pub const THEOREM_VOCABULARY: &[&str] = &[
    "mean value theorem",
    "intermediate value theorem",
    "extreme value theorem",
    "fundamental theorem of calculus",
    "squeeze theorem",
    "rolle's theorem",
    "l'hopital's rule",
    "l'hôpital's rule",
    "chain rule",
    "product rule",
    "quotient rule",
    "power rule",
    "ratio test",
    "root test",
    "comparison test",
    "limit comparison test",
    "integral test",
    "alternating series test",
];

static JUSTIFICATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:because|since)\b\s+(.+)$").unwrap());

/// A uniformly rendered solution step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormattedStep {
    /// 1-based step index.
    pub index: usize,
    /// What the step does.
    pub description: String,
    /// The worked mathematics for the step.
    pub work: String,
    /// Extracted or authored justification clause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    /// A named theorem referenced by the step, if recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theorem: Option<String>,
}

/// Find the first recognized theorem name in a piece of text.
pub fn find_theorem(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    THEOREM_VOCABULARY.iter().find(|name| lower.contains(**name)).map(|name| name.to_string())
}

/// Extract a trailing "because ..."/"since ..." clause from text.
pub fn extract_justification(text: &str) -> Option<String> {
    JUSTIFICATION_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(['.', ',']).to_string())
}

/// Render a solution's steps into the uniform step structure.
///
/// Authored justifications win over extracted ones. A solution with no
/// structured steps yields one synthetic step containing the final answer.
pub fn format_steps(solution: &CanonicalSolution) -> Vec<FormattedStep> {
    if solution.steps.is_empty() {
        return vec![FormattedStep {
            index: 1,
            description: "State the final answer".to_string(),
            work: solution.final_answer.clone(),
            justification: None,
            theorem: None,
        }];
    }

    solution
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let combined = format!("{} {}", step.description, step.work);
            let justification = step
                .justification
                .clone()
                .or_else(|| extract_justification(&step.description))
                .or_else(|| extract_justification(&step.work));
            FormattedStep {
                index: i + 1,
                description: step.description.clone(),
                work: step.work.clone(),
                justification,
                theorem: find_theorem(&combined),
            }
        })
        .collect()
}
