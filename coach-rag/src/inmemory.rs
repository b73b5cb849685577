//! In-memory document store using term-frequency keyword scoring and cosine
//! vector similarity.
//!
//! Suitable for development and tests; production deployments substitute a
//! real store behind the same [`DocumentStore`] trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{DocumentFilter, StoredDocument};
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::store::DocumentStore;

/// An in-memory [`DocumentStore`] backed by a `HashMap` under a
/// `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, (StoredDocument, Vec<f32>)>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document together with its embedding.
    pub async fn upsert(&self, document: StoredDocument, embedding: Vec<f32>) {
        let mut documents = self.documents.write().await;
        documents.insert(document.id.clone(), (document, embedding));
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude or the lengths differ.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Fraction of query terms occurring in the document's title or content.
fn keyword_score(terms: &[String], document: &StoredDocument) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }
    let haystack = format!("{} {}", document.title, document.content).to_lowercase();
    let hits = terms.iter().filter(|term| haystack.contains(term.to_lowercase().as_str())).count();
    hits as f64 / terms.len() as f64
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn keyword_search(
        &self,
        terms: &[String],
        filter: &DocumentFilter,
        limit: usize,
    ) -> Result<Vec<(StoredDocument, f64)>> {
        let documents = self.documents.read().await;
        let mut scored: Vec<(StoredDocument, f64)> = documents
            .values()
            .filter(|(doc, _)| filter.matches(doc))
            .map(|(doc, _)| (doc.clone(), keyword_score(terms, doc)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn vector_search(
        &self,
        embedding: &[f32],
        filter: &DocumentFilter,
        limit: usize,
    ) -> Result<Vec<(StoredDocument, f64)>> {
        let documents = self.documents.read().await;
        let mut scored: Vec<(StoredDocument, f64)> = documents
            .values()
            .filter(|(doc, _)| filter.matches(doc))
            .map(|(doc, doc_embedding)| {
                let score = f64::from(cosine_similarity(doc_embedding, embedding)).max(0.0);
                (doc.clone(), score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }
}

/// A deterministic embedding provider for tests: hashes character n-grams
/// into a fixed-length vector.
#[derive(Debug, Clone, Copy)]
pub struct StubEmbedder {
    dimensions: usize,
}

impl StubEmbedder {
    /// Create a stub embedder producing vectors of the given length.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimensions];
        for window in text.to_lowercase().as_bytes().windows(3) {
            let mut hash: usize = 5381;
            for byte in window {
                hash = hash.wrapping_mul(33).wrapping_add(*byte as usize);
            }
            vector[hash % self.dimensions] += 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_core::ExamVariant;

    fn doc(id: &str, content: &str, variant: Option<ExamVariant>) -> StoredDocument {
        StoredDocument {
            id: id.to_string(),
            title: format!("doc {id}"),
            content: content.to_string(),
            exam_variant: variant,
            topic: None,
            subtopic: None,
            source: "unit-notes".to_string(),
            partition: "default".to_string(),
        }
    }

    #[tokio::test]
    async fn keyword_search_scores_by_term_coverage() {
        let store = InMemoryDocumentStore::new();
        store.upsert(doc("a", "the derivative of a polynomial", None), vec![1.0]).await;
        store.upsert(doc("b", "polar area", None), vec![1.0]).await;

        let terms = vec!["derivative".to_string(), "polynomial".to_string()];
        let results = store.keyword_search(&terms, &DocumentFilter::default(), 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.id, "a");
        assert_eq!(results[0].1, 1.0);
    }

    #[tokio::test]
    async fn vector_search_orders_by_similarity() {
        let store = InMemoryDocumentStore::new();
        store.upsert(doc("near", "x", None), vec![1.0, 0.0]).await;
        store.upsert(doc("far", "y", None), vec![0.0, 1.0]).await;

        let results =
            store.vector_search(&[1.0, 0.0], &DocumentFilter::default(), 10).await.unwrap();
        assert_eq!(results[0].0.id, "near");
        assert!(results[0].1 > results[1].1);
    }

    #[tokio::test]
    async fn topic_filter_excludes_mismatches() {
        let store = InMemoryDocumentStore::new();
        let mut tagged = doc("t", "limit laws", None);
        tagged.topic = Some("limits".to_string());
        store.upsert(tagged, vec![1.0]).await;
        store.upsert(doc("untagged", "limit laws", None), vec![1.0]).await;

        let filter = DocumentFilter { topic: Some("limits".to_string()), ..Default::default() };
        let results =
            store.keyword_search(&["limit".to_string()], &filter, 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.id, "t");
    }

    #[tokio::test]
    async fn stub_embedder_is_deterministic_and_sized() {
        let embedder = StubEmbedder::new(32);
        let a = embedder.embed("derivative of x^2").await.unwrap();
        let b = embedder.embed("derivative of x^2").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn cosine_handles_zero_and_mismatched_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
