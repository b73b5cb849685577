//! Property tests for rubric scoring and the formatting passes.

use proptest::prelude::*;

use coach_core::ExamVariant;
use coach_rubric::notation::canonicalize_notation;
use coach_rubric::numeric::round_significant;
use coach_rubric::postprocess::{postprocess, score, RubricMetadata, Severity, Violation};
use coach_rubric::RubricConfig;

fn violation(severity: Severity) -> Violation {
    Violation {
        violation_type: "prop".into(),
        rule: "prop".into(),
        message: String::new(),
        severity,
    }
}

mod prop_scoring {
    use super::*;

    proptest! {
        #[test]
        fn score_is_always_in_unit_interval(
            errors in 0usize..8,
            warnings in 0usize..8,
            infos in 0usize..8,
            step_count in 0usize..10,
            has_units in any::<bool>(),
            has_justification in any::<bool>(),
        ) {
            let mut violations = Vec::new();
            violations.extend((0..errors).map(|_| violation(Severity::Error)));
            violations.extend((0..warnings).map(|_| violation(Severity::Warning)));
            violations.extend((0..infos).map(|_| violation(Severity::Info)));
            let metadata = RubricMetadata {
                has_units,
                has_justification,
                step_count,
                ..Default::default()
            };
            let value = score(&violations, &metadata, &RubricConfig::default());
            prop_assert!((0.0..=1.0).contains(&value));
        }

        #[test]
        fn extra_error_never_raises_score(
            errors in 0usize..6,
            warnings in 0usize..6,
        ) {
            let mut violations = Vec::new();
            violations.extend((0..errors).map(|_| violation(Severity::Error)));
            violations.extend((0..warnings).map(|_| violation(Severity::Warning)));
            let metadata = RubricMetadata { step_count: 3, ..Default::default() };
            let config = RubricConfig::default();
            let before = score(&violations, &metadata, &config);
            violations.push(violation(Severity::Error));
            let after = score(&violations, &metadata, &config);
            prop_assert!(after <= before);
        }
    }
}

mod prop_passes {
    use super::*;

    proptest! {
        #[test]
        fn canonicalize_is_idempotent(content in "[a-z0-9 ()*^/.{}_+=-]{0,80}") {
            let once = canonicalize_notation(&content);
            let twice = canonicalize_notation(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn rounding_preserves_sign(millis in -999_999_999i64..1_000_000_000, figures in 1u32..6) {
            let value = millis as f64 / 1000.0;
            let rounded = round_significant(value, figures);
            prop_assert!(rounded.signum() == value.signum() || rounded == 0.0);
        }

        #[test]
        fn postprocess_never_panics(content in "\\PC{0,200}") {
            let result = postprocess(&content, ExamVariant::CalcAb, &RubricConfig::default());
            prop_assert!((0.0..=1.0).contains(&result.score));
        }
    }
}
