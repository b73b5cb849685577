//! Postprocessing pipeline: formatting passes, violation collection, scoring.

use serde::{Deserialize, Serialize};
use tracing::debug;

use coach_core::ExamVariant;

use crate::config::RubricConfig;
use crate::justify::{check_justifications, cites_rule, cites_theorem};
use crate::notation::canonicalize_notation;
use crate::numeric::{format_numbers, has_units};
use crate::steps::{parse_steps, RubricStep};

/// Severity of a rubric violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single rubric violation found during postprocessing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Category of the violation (e.g. `justification`, `structure`).
    #[serde(rename = "type")]
    pub violation_type: String,
    /// The specific rule that fired.
    pub rule: String,
    /// Human-readable explanation.
    pub message: String,
    pub severity: Severity,
}

/// Facts about the content that feed the quality score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RubricMetadata {
    pub has_units: bool,
    pub has_justification: bool,
    pub has_theorems: bool,
    pub has_rules: bool,
    pub step_count: usize,
    pub word_count: usize,
}

/// Output of the rubric postprocessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostprocessResult {
    /// Content after the numeric and notation passes.
    pub content: String,
    /// Steps parsed from the formatted content.
    pub formatted_steps: Vec<RubricStep>,
    pub violations: Vec<Violation>,
    /// Rubric score in `[0.0, 1.0]`.
    pub score: f64,
    pub metadata: RubricMetadata,
}

/// Compute the rubric score from violations and quality signals.
///
/// Starts at 1.0, deducts per violation by severity, adds per quality
/// signal, and clamps to `[0.0, 1.0]`.
pub fn score(violations: &[Violation], metadata: &RubricMetadata, config: &RubricConfig) -> f64 {
    let weights = &config.weights;
    let mut score = 1.0;
    for violation in violations {
        score -= match violation.severity {
            Severity::Error => weights.error,
            Severity::Warning => weights.warning,
            Severity::Info => weights.info,
        };
    }
    let quality_signals = [
        metadata.has_units,
        metadata.has_justification,
        metadata.has_theorems,
        metadata.has_rules,
        metadata.step_count >= 3,
    ];
    for signal in quality_signals {
        if signal {
            score += weights.quality;
        }
    }
    score.clamp(0.0, 1.0)
}

/// Run the full postprocessing pipeline over a candidate answer.
///
/// Applies the numeric formatting pass, then notation canonicalization,
/// parses the result into steps, collects justification violations, and
/// scores the answer.
pub fn postprocess(content: &str, variant: ExamVariant, config: &RubricConfig) -> PostprocessResult {
    let formatted = format_numbers(content, config);
    let formatted = canonicalize_notation(&formatted);
    let formatted_steps = parse_steps(&formatted);

    let violations = check_justifications(&formatted, &formatted_steps, variant, config);

    let metadata = RubricMetadata {
        has_units: has_units(&formatted),
        has_justification: formatted_steps.iter().any(|s| s.justification.is_some()),
        has_theorems: cites_theorem(&formatted),
        has_rules: cites_rule(&formatted),
        step_count: formatted_steps.len(),
        word_count: formatted.split_whitespace().count(),
    };

    let score = score(&violations, &metadata, config);
    debug!(
        score,
        violations = violations.len(),
        steps = metadata.step_count,
        "rubric postprocessing complete"
    );

    PostprocessResult { content: formatted, formatted_steps, violations, score, metadata }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RubricConfig {
        RubricConfig::default()
    }

    #[test]
    fn well_structured_answer_scores_high() {
        let content = "Step 1: Differentiate using the power rule\n\
                       d/dx x^2 = 2x because the power rule applies\n\
                       Step 2: Evaluate at x = 3\n\
                       2(3) = 6\n\
                       Step 3: State the final answer\n\
                       The slope is 6.";
        let result = postprocess(content, ExamVariant::CalcAb, &config());
        assert!(result.score >= 0.9, "score was {}", result.score);
        assert_eq!(result.metadata.step_count, 3);
        assert!(result.metadata.has_rules);
        assert!(result.metadata.has_justification);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn unstructured_answer_collects_violations() {
        let result = postprocess("it is 2x", ExamVariant::CalcAb, &config());
        assert!(result.violations.iter().any(|v| v.rule == "min_steps"));
        assert!(result.violations.iter().any(|v| v.rule == "named_theorem_or_rule"));
        assert!(result.score < 0.8);
    }

    #[test]
    fn passes_are_applied_to_content() {
        let content = "Step 1: Compute d / dx x**2 by the power rule\n2x\nStep 2: Done\n2x";
        let result = postprocess(content, ExamVariant::CalcAb, &config());
        assert!(result.content.contains("d/dx x^2"));
        assert!(!result.content.contains("**"));
    }

    #[test]
    fn score_is_clamped() {
        let violations: Vec<Violation> = (0..10)
            .map(|i| Violation {
                violation_type: "test".into(),
                rule: format!("rule_{i}"),
                message: String::new(),
                severity: Severity::Error,
            })
            .collect();
        let value = score(&violations, &RubricMetadata::default(), &config());
        assert_eq!(value, 0.0);
    }

    #[test]
    fn adding_a_violation_never_raises_the_score() {
        let metadata = RubricMetadata { has_units: true, step_count: 3, ..Default::default() };
        let mut violations = Vec::new();
        let mut previous = score(&violations, &metadata, &config());
        for severity in [Severity::Info, Severity::Warning, Severity::Error] {
            violations.push(Violation {
                violation_type: "test".into(),
                rule: "any".into(),
                message: String::new(),
                severity,
            });
            let current = score(&violations, &metadata, &config());
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn quality_signals_raise_the_score() {
        let base = score(&[], &RubricMetadata::default(), &config());
        let rich = RubricMetadata {
            has_units: true,
            has_justification: true,
            has_theorems: true,
            has_rules: true,
            step_count: 3,
            word_count: 50,
        };
        // base is already at the 1.0 clamp, so compare under a violation
        let violation = Violation {
            violation_type: "test".into(),
            rule: "any".into(),
            message: String::new(),
            severity: Severity::Error,
        };
        let poor = score(std::slice::from_ref(&violation), &RubricMetadata::default(), &config());
        let better = score(std::slice::from_ref(&violation), &rich, &config());
        assert!(better > poor);
        assert_eq!(base, 1.0);
    }
}
