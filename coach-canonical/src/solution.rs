//! Data types for canonical solutions and match results.

use serde::{Deserialize, Serialize};

use coach_core::ExamVariant;

/// One authored step of a canonical solution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolutionStep {
    /// What the step does.
    pub description: String,
    /// The worked mathematics for the step.
    pub work: String,
    /// An optional authored justification clause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

/// A pre-authored, expert-vetted reference solution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalSolution {
    /// Unique identifier of the record.
    pub id: String,
    /// The problem statement this solution answers.
    pub question_template: String,
    /// The final answer text.
    pub final_answer: String,
    /// Structured worked steps; may be empty for answer-only records.
    pub steps: Vec<SolutionStep>,
    /// The exam variant the solution targets; `None` means variant-agnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_variant: Option<ExamVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// Per-query metadata attached to a match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_variant: Option<ExamVariant>,
}

/// The best canonical candidate for a query.
///
/// `relevance` and `score` are recomputed for every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalResult {
    /// The matched solution record.
    pub solution: CanonicalSolution,
    /// Relevance × quality, used for the trust gate.
    pub score: f64,
    /// Query relevance in [0, 1].
    pub relevance: f64,
    /// Topic/difficulty metadata copied from the record.
    pub metadata: CanonicalMetadata,
}

/// Store-side filter applied before scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalFilter {
    /// Keep records matching this variant exactly or variant-agnostic ones.
    pub exam_variant: Option<ExamVariant>,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub difficulty: Option<String>,
}

impl CanonicalFilter {
    /// Whether a record passes the filter.
    pub fn matches(&self, solution: &CanonicalSolution) -> bool {
        if let Some(variant) = self.exam_variant {
            match solution.exam_variant {
                Some(v) if v != variant => return false,
                _ => {}
            }
        }
        if let Some(topic) = &self.topic {
            if solution.topic.as_deref() != Some(topic.as_str()) {
                return false;
            }
        }
        if let Some(subtopic) = &self.subtopic {
            if solution.subtopic.as_deref() != Some(subtopic.as_str()) {
                return false;
            }
        }
        if let Some(difficulty) = &self.difficulty {
            if solution.difficulty.as_deref() != Some(difficulty.as_str()) {
                return false;
            }
        }
        true
    }
}
