//! Notation canonicalization pass.

use std::sync::LazyLock;

use regex::Regex;

static DERIVATIVE_SPACING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"d\s*/\s*d([a-zA-Z])").unwrap());
static HIGHER_DERIVATIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"d\^(\d)\s*/\s*d([a-zA-Z])\^(\d)").unwrap());
static LIMIT_SPACING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"lim\s*_\s*\{").unwrap());
static FUNCTION_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(sin|cos|tan|sec|csc|cot|ln|log|exp|sqrt|f|g|h)\s+\(").unwrap()
});
static INTEGRAL_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"∫\s*").unwrap());

/// Canonicalize derivative, integral, limit, and function-call notation.
///
/// Also converts `**` power notation to `^`. Idempotent.
pub fn canonicalize_notation(content: &str) -> String {
    let content = content.replace("**", "^");
    let content = HIGHER_DERIVATIVE_RE.replace_all(&content, "d^$1/d$2^$3");
    let content = DERIVATIVE_SPACING_RE.replace_all(&content, "d/d$1");
    let content = LIMIT_SPACING_RE.replace_all(&content, "lim_{");
    let content = FUNCTION_SPACING_RE.replace_all(&content, "$1(");
    INTEGRAL_SPACING_RE.replace_all(&content, "∫ ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_derivative_spacing() {
        assert_eq!(canonicalize_notation("d / dx x^2"), "d/dx x^2");
        assert_eq!(canonicalize_notation("d^2 / dx^2 f"), "d^2/dx^2 f");
    }

    #[test]
    fn normalizes_power_notation() {
        assert_eq!(canonicalize_notation("x**2 + y**3"), "x^2 + y^3");
    }

    #[test]
    fn tightens_function_calls() {
        assert_eq!(canonicalize_notation("sin (x) + f (x)"), "sin(x) + f(x)");
    }

    #[test]
    fn standardizes_integral_spacing() {
        assert_eq!(canonicalize_notation("∫x dx"), "∫ x dx");
    }

    #[test]
    fn is_idempotent() {
        let cases = ["d / dx x**2", "∫  f (x) dx", "lim _ {x \\to 0}", "plain text"];
        for case in cases {
            let once = canonicalize_notation(case);
            let twice = canonicalize_notation(&once);
            assert_eq!(once, twice, "not idempotent for {case:?}");
        }
    }
}
