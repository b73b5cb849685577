//! Hybrid keyword + vector retrieval with exam-variant boosting.
//!
//! [`HybridRetriever`] runs a keyword lookup and a vector-similarity lookup
//! against the document store (each capped at twice the requested limit to
//! leave headroom for reranking), merges the contributions by document
//! identity, applies an exam-variant boost, and extracts a query-aware
//! snippet per result.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use coach_core::ExamVariant;

use crate::config::RetrievalOptions;
use crate::document::{DocumentFilter, Provenance, SearchResult, StoredDocument};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::expand::create_search_terms;
use crate::store::DocumentStore;

/// Weight of the keyword contribution in the merged score.
const KEYWORD_WEIGHT: f64 = 0.4;
/// Weight of the vector contribution in the merged score.
const VECTOR_WEIGHT: f64 = 0.6;
/// Boost for documents matching the requested exam variant exactly.
const EXACT_VARIANT_BOOST: f64 = 1.5;
/// Boost for variant-agnostic documents.
const AGNOSTIC_VARIANT_BOOST: f64 = 1.2;
/// Penalty multiplier for documents tagged with the other variant.
const MISMATCH_VARIANT_BOOST: f64 = 0.8;
/// Maximum snippet length in characters.
const SNIPPET_MAX_CHARS: usize = 300;

/// Merges keyword and vector-similarity lookups into one ranked list.
///
/// # Example
///
/// ```rust,ignore
/// let retriever = HybridRetriever::new(Arc::new(store), Arc::new(embedder));
/// let options = RetrievalOptions::builder(ExamVariant::CalcAb).limit(5).build()?;
/// let results = retriever.search("derivative of x^2", &options).await?;
/// ```
pub struct HybridRetriever {
    store: Arc<dyn DocumentStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl HybridRetriever {
    /// Create a retriever over the given store and embedding provider.
    pub fn new(store: Arc<dyn DocumentStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Run hybrid search for a query.
    ///
    /// Returns results sorted descending by combined score, with nothing
    /// below `options.min_score`, truncated to `options.limit`.
    ///
    /// # Errors
    ///
    /// Any store or embedding failure propagates as a retrieval failure;
    /// the orchestrator is responsible for degrading gracefully.
    pub async fn search(&self, query: &str, options: &RetrievalOptions) -> Result<Vec<SearchResult>> {
        let terms: Vec<String> =
            create_search_terms(query, options.variant).into_iter().collect();
        let filter = DocumentFilter {
            exam_variant: Some(options.variant),
            topic: options.topic.clone(),
            subtopic: options.subtopic.clone(),
        };
        // 2x headroom so reranking has candidates to drop.
        let fetch_limit = options.limit * 2;

        let keyword_hits = self.store.keyword_search(&terms, &filter, fetch_limit).await?;
        let query_embedding = self.embedder.embed(query).await?;
        let vector_hits =
            self.store.vector_search(&query_embedding, &filter, fetch_limit).await?;

        debug!(
            keyword_hits = keyword_hits.len(),
            vector_hits = vector_hits.len(),
            term_count = terms.len(),
            "hybrid lookups completed"
        );

        // Merge by document identity, summing weighted contributions.
        let mut merged: HashMap<String, (StoredDocument, f64)> = HashMap::new();
        for (document, score) in keyword_hits {
            merged.insert(document.id.clone(), (document, score * KEYWORD_WEIGHT));
        }
        for (document, score) in vector_hits {
            merged
                .entry(document.id.clone())
                .and_modify(|(_, total)| *total += score * VECTOR_WEIGHT)
                .or_insert((document, score * VECTOR_WEIGHT));
        }

        let mut results: Vec<SearchResult> = merged
            .into_values()
            .map(|(document, score)| {
                let boosted =
                    (score * variant_boost(options.variant, document.exam_variant)).clamp(0.0, 1.0);
                let snippet = extract_snippet(&document.content, &terms);
                let provenance = Provenance {
                    source: document.source.clone(),
                    partition: document.partition.clone(),
                    topic: document.topic.clone(),
                    subtopic: document.subtopic.clone(),
                };
                SearchResult { document, score: boosted, snippet, provenance }
            })
            .filter(|result| result.score >= options.min_score)
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(options.limit);

        info!(result_count = results.len(), variant = %options.variant, "hybrid search completed");
        Ok(results)
    }
}

/// The exam-variant multiplier: exact match 1.5, variant-agnostic 1.2,
/// mismatch 0.8.
pub fn variant_boost(requested: ExamVariant, document: Option<ExamVariant>) -> f64 {
    match document {
        Some(variant) if variant == requested => EXACT_VARIANT_BOOST,
        None => AGNOSTIC_VARIANT_BOOST,
        Some(_) => MISMATCH_VARIANT_BOOST,
    }
}

/// Pick the first sentence containing a query term, falling back to the
/// first two sentences, truncated to 300 characters with an ellipsis.
fn extract_snippet(content: &str, terms: &[String]) -> String {
    let sentences: Vec<&str> =
        content.split_terminator(['.', '!', '?']).map(str::trim).filter(|s| !s.is_empty()).collect();

    let picked = sentences
        .iter()
        .find(|sentence| {
            let lower = sentence.to_lowercase();
            terms.iter().any(|term| lower.contains(term.to_lowercase().as_str()))
        })
        .map(|s| s.to_string())
        .unwrap_or_else(|| sentences.iter().take(2).copied().collect::<Vec<_>>().join(". "));

    truncate_chars(&picked, SNIPPET_MAX_CHARS)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}…")
}
