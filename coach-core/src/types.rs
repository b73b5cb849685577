//! Core value objects: sources, trust scores, and the terminal coach response.

use serde::{Deserialize, Serialize};

use crate::variant::ExamVariant;

/// Where an answer (or part of one) came from.
///
/// Modeled as a closed, tagged variant so downstream consumers can stay
/// exhaustive over the known set instead of matching on open strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    /// A pre-authored, expert-vetted reference solution.
    Canonical {
        /// Identifier of the canonical solution record.
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        snippet: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
    },
    /// A document surfaced by hybrid retrieval.
    Retrieval {
        /// Identifier of the retrieved document.
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        snippet: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
    },
    /// Text produced by the completion model.
    Generated {
        /// Identifier of the model that produced the text.
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        snippet: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
    },
}

impl Source {
    /// The title of the source, if any.
    pub fn title(&self) -> Option<&str> {
        match self {
            Source::Canonical { title, .. }
            | Source::Retrieval { title, .. }
            | Source::Generated { title, .. } => title.as_deref(),
        }
    }
}

/// Per-dimension components of a trust score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustBreakdown {
    /// Pass-rate-weighted confidence over symbolic math checks.
    pub mathematical: f64,
    /// Pass-rate-weighted confidence over units / dimensional checks.
    pub units: f64,
    /// Heuristic notation-quality score over the solution text.
    pub notation: f64,
    /// Agreement between individual check confidences.
    pub consistency: f64,
}

/// A normalized [0, 1] confidence blending mathematical correctness, units,
/// notation, and consistency sub-scores.
///
/// Derived per response; never stored independently of the response it was
/// computed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustScore {
    /// The blended overall score in [0, 1].
    pub score: f64,
    /// The per-dimension components.
    pub breakdown: TrustBreakdown,
    /// How much the score itself can be trusted, in [0, 1].
    pub confidence: f64,
}

impl TrustScore {
    /// The zero score attached to abstentions and failure-path responses.
    pub fn zero() -> Self {
        Self {
            score: 0.0,
            breakdown: TrustBreakdown {
                mathematical: 0.0,
                units: 0.0,
                notation: 0.0,
                consistency: 0.0,
            },
            confidence: 0.0,
        }
    }
}

/// Request-scoped metadata carried on every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// The exam variant the question was answered under.
    pub exam_variant: ExamVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Number of corrective-decode passes taken before settling.
    pub retry_count: u32,
}

/// The terminal output of `process_question`.
///
/// `verified` is true only when the trust score met the configured
/// threshold; abstentions and failure paths return `verified = false` with
/// non-empty suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachResponse {
    /// The answer text (or abstention guidance).
    pub answer: String,
    /// Whether the answer met the trust threshold.
    pub verified: bool,
    /// The trust score computed for this answer.
    pub trust_score: TrustScore,
    /// Confidence in the trust score itself.
    pub confidence: f64,
    /// Where the answer came from, in priority order.
    pub sources: Vec<Source>,
    /// Study guidance; always non-empty on unverified responses.
    pub suggestions: Vec<String>,
    /// Request-scoped metadata.
    pub metadata: ResponseMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_serializes_with_kind_tag() {
        let source = Source::Canonical {
            id: "sol_1".into(),
            title: Some("Power rule".into()),
            snippet: None,
            score: Some(0.95),
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["kind"], "canonical");
        assert_eq!(json["id"], "sol_1");
        // None fields are omitted entirely
        assert!(json.get("snippet").is_none());
    }

    #[test]
    fn source_kind_round_trips() {
        for source in [
            Source::Canonical { id: "a".into(), title: None, snippet: None, score: None },
            Source::Retrieval { id: "b".into(), title: None, snippet: None, score: None },
            Source::Generated { id: "c".into(), title: None, snippet: None, score: None },
        ] {
            let json = serde_json::to_string(&source).unwrap();
            let back: Source = serde_json::from_str(&json).unwrap();
            assert_eq!(back, source);
        }
    }

    #[test]
    fn zero_trust_score_is_all_zero() {
        let score = TrustScore::zero();
        assert_eq!(score.score, 0.0);
        assert_eq!(score.confidence, 0.0);
        assert_eq!(score.breakdown.mathematical, 0.0);
    }
}
