//! Numeric formatting pass: rounding, unit bracketing, scientific notation.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::RubricConfig;

static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\d+").unwrap());
// Captures a one-character prefix because look-behind is unavailable: the
// digits must not continue a decimal literal's fraction part.
static LARGE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^.\d])(\d{5,}(?:\.\d+)?)\b").unwrap());
static UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d.]*)\s+(m/s\^2|m/s²|m/s|ft/s|km/h|kg|km|cm|mm|ft|in|rad|m|s)\b").unwrap()
});

/// Round to `figures` significant figures, half away from zero.
pub fn round_significant(value: f64, figures: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(figures as i32 - 1 - magnitude);
    // f64::round rounds half away from zero
    (value * factor).round() / factor
}

/// Round to `places` decimal places, half away from zero.
pub fn round_decimal_places(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

fn format_trimmed(value: f64) -> String {
    let text = format!("{value:.10}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Render a magnitude in `m.mm...eN` scientific notation at the configured
/// significant figures.
fn format_scientific(value: f64, figures: u32) -> String {
    let exponent = value.abs().log10().floor() as i32;
    let mantissa = round_significant(value / 10f64.powi(exponent), figures);
    format!("{}e{exponent}", format_trimmed(mantissa))
}

/// Apply the numeric formatting pass to content.
///
/// Decimal literals are rounded to the configured significant figures (or
/// fixed decimal places when configured), magnitudes at or above the
/// scientific threshold are rewritten in scientific notation, and trailing
/// unit tokens are parenthesized.
pub fn format_numbers(content: &str, config: &RubricConfig) -> String {
    // 1. Large magnitudes first so rounding does not disturb them.
    let content = LARGE_NUMBER_RE.replace_all(content, |caps: &Captures<'_>| {
        let prefix = &caps[1];
        let raw = &caps[2];
        match raw.parse::<f64>() {
            Ok(value) if value >= config.scientific_threshold => {
                format!("{prefix}{}", format_scientific(value, config.significant_figures))
            }
            _ => caps[0].to_string(),
        }
    });

    // 2. Round decimal literals.
    let content = DECIMAL_RE.replace_all(&content, |caps: &Captures<'_>| {
        let raw = &caps[0];
        match raw.parse::<f64>() {
            Ok(value) => {
                let rounded = match config.decimal_places {
                    Some(places) => round_decimal_places(value, places),
                    None => round_significant(value, config.significant_figures),
                };
                format_trimmed(rounded)
            }
            Err(_) => raw.to_string(),
        }
    });

    // 3. Parenthesize trailing unit tokens.
    UNIT_RE.replace_all(&content, "$1 ($2)").into_owned()
}

static PAREN_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((?:m/s\^2|m/s²|m/s|ft/s|km/h|kg|km|cm|mm|ft|in|rad|m|s)\)").unwrap()
});

/// Whether the content carries any recognized unit token, bare or already
/// parenthesized.
pub fn has_units(content: &str) -> bool {
    UNIT_RE.is_match(content) || PAREN_UNIT_RE.is_match(content)
}
