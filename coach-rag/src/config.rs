//! Retrieval options for hybrid search.

use serde::{Deserialize, Serialize};

use coach_core::ExamVariant;

use crate::error::{Result, RetrievalError};

/// Per-query options for [`HybridRetriever::search`](crate::HybridRetriever::search).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalOptions {
    /// Maximum number of results to return.
    pub limit: usize,
    /// Results scoring below this are dropped.
    pub min_score: f64,
    /// The exam variant driving expansion and boosting.
    pub variant: ExamVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
}

impl RetrievalOptions {
    /// Create a new builder with defaults for the given variant.
    pub fn builder(variant: ExamVariant) -> RetrievalOptionsBuilder {
        RetrievalOptionsBuilder {
            options: RetrievalOptions {
                limit: 5,
                min_score: 0.0,
                variant,
                topic: None,
                subtopic: None,
            },
        }
    }
}

/// Builder for constructing validated [`RetrievalOptions`].
#[derive(Debug, Clone)]
pub struct RetrievalOptionsBuilder {
    options: RetrievalOptions,
}

impl RetrievalOptionsBuilder {
    /// Set the maximum number of results to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.options.limit = limit;
        self
    }

    /// Set the minimum combined score for returned results.
    pub fn min_score(mut self, min_score: f64) -> Self {
        self.options.min_score = min_score;
        self
    }

    /// Restrict candidates to a topic.
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.options.topic = Some(topic.into());
        self
    }

    /// Restrict candidates to a subtopic.
    pub fn subtopic(mut self, subtopic: impl Into<String>) -> Self {
        self.options.subtopic = Some(subtopic.into());
        self
    }

    /// Build the options, validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::ConfigError`] if `limit == 0` or
    /// `min_score` is outside [0, 1].
    pub fn build(self) -> Result<RetrievalOptions> {
        if self.options.limit == 0 {
            return Err(RetrievalError::ConfigError("limit must be greater than zero".into()));
        }
        if !(0.0..=1.0).contains(&self.options.min_score) {
            return Err(RetrievalError::ConfigError(format!(
                "min_score ({}) must be within [0, 1]",
                self.options.min_score
            )));
        }
        Ok(self.options)
    }
}
