//! Document store trait for keyword and vector lookups.

use async_trait::async_trait;

use crate::document::{DocumentFilter, StoredDocument};
use crate::error::Result;

/// The external document store consumed by hybrid retrieval.
///
/// Implementations expose two independent lookups over the same corpus: a
/// keyword/full-text query and a vector K-nearest-neighbor query. Failures
/// are hard errors; the orchestrator is responsible for degrading
/// gracefully.
///
/// # Example
///
/// ```rust,ignore
/// use coach_rag::{DocumentStore, InMemoryDocumentStore};
///
/// let store = InMemoryDocumentStore::new();
/// let docs = store.keyword_search(&terms, &filter, 10).await?;
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Full-text lookup: documents matching any of the given terms,
    /// best-first, at most `limit`.
    async fn keyword_search(
        &self,
        terms: &[String],
        filter: &DocumentFilter,
        limit: usize,
    ) -> Result<Vec<(StoredDocument, f64)>>;

    /// K-nearest-neighbor lookup by embedding cosine similarity,
    /// best-first, at most `limit`.
    async fn vector_search(
        &self,
        embedding: &[f32],
        filter: &DocumentFilter,
        limit: usize,
    ) -> Result<Vec<(StoredDocument, f64)>>;
}
