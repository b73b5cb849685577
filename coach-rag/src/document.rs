//! Data types for stored documents and search results.

use serde::{Deserialize, Serialize};

use coach_core::ExamVariant;

/// A document held by the external document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredDocument {
    /// Unique identifier for the document.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// The text content of the document.
    pub content: String,
    /// The exam variant this document targets, if any. `None` means the
    /// document is variant-agnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_variant: Option<ExamVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
    /// Which corpus the document came from.
    pub source: String,
    /// The store partition the document lives in.
    pub partition: String,
}

/// Where a search result came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provenance {
    /// The corpus the document came from.
    pub source: String,
    /// The store partition the document lives in.
    pub partition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
}

/// A retrieved document with its combined relevance score and snippet.
///
/// Immutable once returned; ephemeral (never persisted by the core).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved document.
    pub document: StoredDocument,
    /// Combined keyword+vector score in [0, 1].
    pub score: f64,
    /// An extract of the document relevant to the query.
    pub snippet: String,
    /// Where the document came from.
    pub provenance: Provenance,
}

/// Metadata filter applied by the document store before scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    /// Match documents for this variant or variant-agnostic ones.
    pub exam_variant: Option<ExamVariant>,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
}

impl DocumentFilter {
    /// Whether a document passes the topic/subtopic constraints.
    ///
    /// Variant is deliberately not filtered here: mismatched-variant
    /// documents stay in the candidate set and are down-weighted during
    /// merging instead.
    pub fn matches(&self, document: &StoredDocument) -> bool {
        if let Some(topic) = &self.topic {
            if document.topic.as_deref() != Some(topic.as_str()) {
                return false;
            }
        }
        if let Some(subtopic) = &self.subtopic {
            if document.subtopic.as_deref() != Some(subtopic.as_str()) {
                return false;
            }
        }
        true
    }
}
