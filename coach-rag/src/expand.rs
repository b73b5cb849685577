//! Pure, stateless query expansion and math-notation normalization.
//!
//! Everything in this module is deterministic and has no failure modes: the
//! functions always return (possibly empty) results. The synonym lexicon is
//! bidirectional: any member of a group occurring in the query pulls in the
//! whole group.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use coach_core::variant::{AB_KEYWORDS, BC_KEYWORDS};
use coach_core::ExamVariant;

/// Bidirectional synonym groups over the calculus tutoring domain.
const SYNONYM_GROUPS: &[&[&str]] = &[
    &["derivative", "differentiate", "differentiation", "rate of change", "slope"],
    &["integral", "integrate", "integration", "antiderivative"],
    &["limit", "approaches", "tends to"],
    &["maximum", "max", "local maximum", "absolute maximum"],
    &["minimum", "min", "local minimum", "absolute minimum"],
    &["continuous", "continuity"],
    &["concave", "concavity", "inflection"],
    &["series", "summation", "infinite sum"],
    &["converge", "convergence", "convergent"],
    &["diverge", "divergence", "divergent"],
    &["velocity", "speed", "rate"],
    &["tangent", "tangent line", "slope of tangent"],
    &["area", "area under curve", "region"],
    &["volume", "solid of revolution"],
];

/// Core calculus vocabulary that earns a ranking boost regardless of variant.
const CORE_VOCABULARY: &[&str] = &[
    "derivative",
    "integral",
    "limit",
    "function",
    "continuity",
    "antiderivative",
    "tangent",
    "slope",
    "area",
    "volume",
];

/// Problem-type indicator words recognized by [`create_search_terms`].
const PROBLEM_INDICATORS: &[&str] = &[
    "find",
    "evaluate",
    "calculate",
    "determine",
    "solve",
    "compute",
    "differentiate",
    "integrate",
    "verify",
    "prove",
];

/// Literal mathematical symbols carried through expansion verbatim.
const MATH_SYMBOLS: &[&str] =
    &["∫", "∂", "Σ", "π", "∞", "′", "θ", "√", "+", "-", "*", "/", "^", "="];

static FUNCTION_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]\w*\([^()]*\)").unwrap());
static DERIVATIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"d\^?\d*[a-zA-Z]?/d[a-zA-Z]\^?\d*|[a-zA-Z]'+\([a-zA-Z]\)|[a-zA-Z]'+").unwrap());
static INTEGRAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"∫[^∫]*?d[a-zA-Z]").unwrap());
static OPERATOR_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.]+\s*[\^+\-*/=]\s*[\w.()]+").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Expand a query into its related domain terms.
///
/// Adds, for every lexicon term occurring in the lowercased query, all of
/// its synonyms; adds exam-variant vocabulary terms that occur in the query;
/// adds literal math symbols present in the query.
pub fn expand_query(query: &str, variant: ExamVariant) -> BTreeSet<String> {
    let lower = query.to_lowercase();
    let mut terms = BTreeSet::new();

    for group in SYNONYM_GROUPS {
        if group.iter().any(|term| lower.contains(term)) {
            for term in *group {
                terms.insert(term.to_string());
            }
        }
    }

    let variant_vocab: &[&str] = match variant {
        ExamVariant::CalcAb => AB_KEYWORDS,
        ExamVariant::CalcBc => BC_KEYWORDS,
    };
    for term in variant_vocab {
        if lower.contains(term) {
            terms.insert(term.to_string());
        }
    }

    for symbol in MATH_SYMBOLS {
        if query.contains(symbol) {
            terms.insert(symbol.to_string());
        }
    }

    terms
}

/// Expansion terms plus recognized problem-type indicator words.
pub fn create_search_terms(query: &str, variant: ExamVariant) -> BTreeSet<String> {
    let lower = query.to_lowercase();
    let mut terms = expand_query(query, variant);
    for indicator in PROBLEM_INDICATORS {
        if lower.contains(indicator) {
            terms.insert(indicator.to_string());
        }
    }
    terms
}

/// Assign a ranking multiplier to each term.
///
/// 1.0 default, 1.3 for core calculus vocabulary, and 1.4 (AB) or 1.5 (BC)
/// for vocabulary specific to the requested exam variant.
pub fn boost_terms_by_variant(
    terms: &BTreeSet<String>,
    variant: ExamVariant,
) -> Vec<(String, f64)> {
    let (variant_vocab, variant_boost): (&[&str], f64) = match variant {
        ExamVariant::CalcAb => (AB_KEYWORDS, 1.4),
        ExamVariant::CalcBc => (BC_KEYWORDS, 1.5),
    };

    terms
        .iter()
        .map(|term| {
            let boost = if variant_vocab.contains(&term.as_str()) {
                variant_boost
            } else if CORE_VOCABULARY.contains(&term.as_str()) {
                1.3
            } else {
                1.0
            };
            (term.clone(), boost)
        })
        .collect()
}

/// Pull function-call, derivative, integral, and operator fragments out of
/// free-form text.
pub fn extract_math_expressions(text: &str) -> Vec<String> {
    let mut expressions = Vec::new();
    let mut seen = BTreeSet::new();

    for re in [&*INTEGRAL_RE, &*DERIVATIVE_RE, &*FUNCTION_CALL_RE, &*OPERATOR_FRAGMENT_RE] {
        for m in re.find_iter(text) {
            let fragment = normalize_math_notation(m.as_str());
            if seen.insert(fragment.clone()) {
                expressions.push(fragment);
            }
        }
    }

    expressions
}

/// Canonicalize math notation: collapse whitespace and convert `**` power
/// notation to `^`.
///
/// Idempotent: applying it twice yields the same result as applying it once.
pub fn normalize_math_notation(text: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(text.trim(), " ");
    collapsed.replace("**", "^")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_synonym_group_bidirectionally() {
        let terms = expand_query("what is the slope here", ExamVariant::CalcAb);
        // "slope" pulls in the whole derivative group
        assert!(terms.contains("derivative"));
        assert!(terms.contains("differentiate"));
        assert!(terms.contains("rate of change"));
    }

    #[test]
    fn adds_variant_vocabulary_present_in_query() {
        let terms = expand_query("radius of convergence of the power series", ExamVariant::CalcBc);
        assert!(terms.contains("radius of convergence"));
        assert!(terms.contains("power series"));
    }

    #[test]
    fn adds_literal_math_symbols() {
        let terms = expand_query("evaluate ∫ x^2 dx", ExamVariant::CalcAb);
        assert!(terms.contains("∫"));
        assert!(terms.contains("^"));
    }

    #[test]
    fn empty_query_expands_to_nothing() {
        assert!(expand_query("", ExamVariant::CalcAb).is_empty());
    }

    #[test]
    fn search_terms_include_problem_indicators() {
        let terms = create_search_terms("find the derivative of x^2", ExamVariant::CalcAb);
        assert!(terms.contains("find"));
        assert!(terms.contains("derivative"));
    }

    #[test]
    fn boost_levels() {
        let mut terms = BTreeSet::new();
        terms.insert("derivative".to_string()); // core AND in AB vocab
        terms.insert("taylor series".to_string()); // BC-specific
        terms.insert("homework".to_string()); // neither

        let boosted = boost_terms_by_variant(&terms, ExamVariant::CalcBc);
        let lookup = |t: &str| boosted.iter().find(|(term, _)| term == t).unwrap().1;

        assert_eq!(lookup("taylor series"), 1.5);
        assert_eq!(lookup("derivative"), 1.3);
        assert_eq!(lookup("homework"), 1.0);
    }

    #[test]
    fn ab_variant_boost_is_1_4() {
        let mut terms = BTreeSet::new();
        terms.insert("washer method".to_string());
        let boosted = boost_terms_by_variant(&terms, ExamVariant::CalcAb);
        assert_eq!(boosted[0].1, 1.4);
    }

    #[test]
    fn extracts_function_calls_and_derivatives() {
        let exprs = extract_math_expressions("Given f(x) = x^2, compute d/dx and f'(x)");
        assert!(exprs.iter().any(|e| e == "f(x)"));
        assert!(exprs.iter().any(|e| e == "d/dx"));
        assert!(exprs.iter().any(|e| e.contains("f'")));
    }

    #[test]
    fn extracts_integral_fragments() {
        let exprs = extract_math_expressions("evaluate ∫ x^2 dx today");
        assert!(exprs.iter().any(|e| e.starts_with('∫') && e.ends_with("dx")));
    }

    #[test]
    fn normalize_converts_power_notation() {
        assert_eq!(normalize_math_notation("x**2  +  y"), "x^2 + y");
    }

    #[test]
    fn normalize_is_idempotent() {
        let cases =
            ["x**2 +   3", "  d/dx   f(x) ", "∫ x dx", "already clean", "a ** b ** c"];
        for case in cases {
            let once = normalize_math_notation(case);
            let twice = normalize_math_notation(&once);
            assert_eq!(once, twice, "not idempotent for {case:?}");
        }
    }
}
