//! Hybrid retrieval for the calculus coach.
//!
//! The [`HybridRetriever`] merges keyword and vector-similarity lookups
//! against an external [`DocumentStore`] into a single ranked list, applying
//! exam-variant boosts and snippet extraction. [`expand`] provides the pure
//! query-expansion layer it builds its keyword terms from.
//!
//! # Example
//!
//! ```rust,ignore
//! use coach_rag::{HybridRetriever, RetrievalOptions, InMemoryDocumentStore};
//!
//! let retriever = HybridRetriever::new(Arc::new(store), Arc::new(embedder));
//! let options = RetrievalOptions::builder(variant).limit(5).build()?;
//! let results = retriever.search("derivative of x^2", &options).await?;
//! ```

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod expand;
pub mod hybrid;
pub mod inmemory;
pub mod store;

pub use config::RetrievalOptions;
pub use document::{DocumentFilter, Provenance, SearchResult, StoredDocument};
pub use embedding::EmbeddingProvider;
pub use error::{RetrievalError, Result};
pub use expand::{
    boost_terms_by_variant, create_search_terms, expand_query, extract_math_expressions,
    normalize_math_notation,
};
pub use hybrid::{variant_boost, HybridRetriever};
pub use inmemory::{InMemoryDocumentStore, StubEmbedder};
pub use store::DocumentStore;
