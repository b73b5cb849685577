//! Heading-pattern step parsing over free-form answer text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use coach_canonical::steps::{extract_justification, find_theorem};

// The bare `N.` form requires horizontal whitespace after the dot so a line
// opening with a decimal literal (e.g. `2.5 m/s`) is not taken for a heading.
static STEP_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:step\s+(\d+)\s*[:.]?|(\d+)\.[ \t])\s*(.*)$").unwrap()
});

/// One parsed step of a candidate answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RubricStep {
    /// 1-based step index in document order.
    pub index: usize,
    /// The heading text (or a synthetic label).
    pub description: String,
    /// The body lines following the heading.
    pub work: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theorem: Option<String>,
}

/// Parse content into steps by matching `Step N` / `N.` headings.
///
/// Best-effort: content with no recognizable heading becomes a single
/// synthetic step holding the full text.
pub fn parse_steps(content: &str) -> Vec<RubricStep> {
    let mut headings: Vec<(usize, usize, String)> = Vec::new();
    for caps in STEP_HEADING_RE.captures_iter(content) {
        let whole = caps.get(0).unwrap();
        let description = caps.get(3).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
        headings.push((whole.start(), whole.end(), description));
    }

    if headings.is_empty() {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        let step = RubricStep {
            index: 1,
            description: "Solution".to_string(),
            work: trimmed.to_string(),
            justification: extract_justification(trimmed),
            theorem: find_theorem(trimmed),
        };
        return vec![step];
    }

    let mut steps = Vec::with_capacity(headings.len());
    for (i, (_, end, description)) in headings.iter().enumerate() {
        let body_end = headings.get(i + 1).map(|(start, _, _)| *start).unwrap_or(content.len());
        let work = content[*end..body_end].trim().to_string();
        let combined = format!("{description} {work}");
        steps.push(RubricStep {
            index: i + 1,
            description: description.clone(),
            work,
            justification: extract_justification(&combined),
            theorem: find_theorem(&combined),
        });
    }
    steps
}
