//! Justification checks: theorem citation, step count, series convergence.

use coach_core::ExamVariant;

use coach_canonical::steps::THEOREM_VOCABULARY;

use crate::config::RubricConfig;
use crate::postprocess::{Severity, Violation};
use crate::steps::RubricStep;

/// Phrases accepted as a convergence justification for series content.
const CONVERGENCE_PHRASES: &[&str] = &[
    "converges because",
    "converges since",
    "diverges because",
    "diverges since",
    "by the ratio test",
    "by the root test",
    "by the comparison test",
    "by the limit comparison test",
    "by the integral test",
    "by the alternating series test",
];

/// Whether the content names any theorem from the fixed vocabulary.
pub fn cites_theorem(content: &str) -> bool {
    let lower = content.to_lowercase();
    THEOREM_VOCABULARY
        .iter()
        .filter(|name| name.contains("theorem"))
        .any(|name| lower.contains(*name))
}

/// Whether the content names any rule or test from the fixed vocabulary.
pub fn cites_rule(content: &str) -> bool {
    let lower = content.to_lowercase();
    THEOREM_VOCABULARY
        .iter()
        .filter(|name| name.contains("rule") || name.contains("test"))
        .any(|name| lower.contains(*name))
}

/// Run the justification checks over parsed content.
///
/// Produces a warning when no named theorem or rule is cited and an error
/// when the step count is below the configured minimum. For the configured
/// series variant, series content without a convergence justification phrase
/// is also an error.
pub fn check_justifications(
    content: &str,
    steps: &[RubricStep],
    variant: ExamVariant,
    config: &RubricConfig,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let lower = content.to_lowercase();

    if !cites_theorem(content) && !cites_rule(content) {
        violations.push(Violation {
            violation_type: "justification".into(),
            rule: "named_theorem_or_rule".into(),
            message: "no named theorem or rule is cited".into(),
            severity: Severity::Warning,
        });
    }

    if steps.len() < config.min_steps {
        violations.push(Violation {
            violation_type: "structure".into(),
            rule: "min_steps".into(),
            message: format!(
                "solution has {} step(s), fewer than the required {}",
                steps.len(),
                config.min_steps
            ),
            severity: Severity::Error,
        });
    }

    let mentions_series = lower.contains("series")
        || lower.contains("converge")
        || lower.contains("diverge");
    if variant == config.series_variant && mentions_series {
        let justified = CONVERGENCE_PHRASES.iter().any(|phrase| lower.contains(phrase));
        if !justified {
            violations.push(Violation {
                violation_type: "justification".into(),
                rule: "series_convergence".into(),
                message: "series content lacks a convergence justification".into(),
                severity: Severity::Error,
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::parse_steps;

    fn config() -> RubricConfig {
        RubricConfig::default()
    }

    #[test]
    fn warns_when_no_theorem_or_rule_cited() {
        let content = "Step 1: Compute\n2x\nStep 2: Done\n2x";
        let steps = parse_steps(content);
        let violations = check_justifications(content, &steps, ExamVariant::CalcAb, &config());
        assert!(violations
            .iter()
            .any(|v| v.rule == "named_theorem_or_rule" && v.severity == Severity::Warning));
    }

    #[test]
    fn errors_when_too_few_steps() {
        let content = "The answer is 2x by the power rule.";
        let steps = parse_steps(content);
        let violations = check_justifications(content, &steps, ExamVariant::CalcAb, &config());
        assert!(violations.iter().any(|v| v.rule == "min_steps" && v.severity == Severity::Error));
    }

    #[test]
    fn series_without_justification_is_an_error_for_bc_only() {
        let content = "Step 1: The series converges\nStep 2: State the sum";
        let steps = parse_steps(content);

        let bc = check_justifications(content, &steps, ExamVariant::CalcBc, &config());
        assert!(bc.iter().any(|v| v.rule == "series_convergence"));

        let ab = check_justifications(content, &steps, ExamVariant::CalcAb, &config());
        assert!(!ab.iter().any(|v| v.rule == "series_convergence"));
    }

    #[test]
    fn convergence_phrase_satisfies_the_series_rule() {
        let content =
            "Step 1: The series converges because the ratio is less than one, by the ratio test\nStep 2: Sum it";
        let steps = parse_steps(content);
        let violations = check_justifications(content, &steps, ExamVariant::CalcBc, &config());
        assert!(!violations.iter().any(|v| v.rule == "series_convergence"));
    }
}
