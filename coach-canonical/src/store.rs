//! Canonical-solution store trait and in-memory implementation.

use async_trait::async_trait;
use tokio::sync::RwLock;

use coach_core::Result;

use crate::solution::{CanonicalFilter, CanonicalSolution};

/// The external canonical-solution store.
///
/// A filtered select returning full records; all scoring happens in the
/// matcher, per query.
#[async_trait]
pub trait CanonicalStore: Send + Sync {
    /// Fetch candidate solutions passing the filter.
    async fn select(&self, filter: &CanonicalFilter) -> Result<Vec<CanonicalSolution>>;
}

/// An in-memory [`CanonicalStore`] for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryCanonicalStore {
    solutions: RwLock<Vec<CanonicalSolution>>,
}

impl InMemoryCanonicalStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a solution record.
    pub async fn insert(&self, solution: CanonicalSolution) {
        self.solutions.write().await.push(solution);
    }
}

#[async_trait]
impl CanonicalStore for InMemoryCanonicalStore {
    async fn select(&self, filter: &CanonicalFilter) -> Result<Vec<CanonicalSolution>> {
        let solutions = self.solutions.read().await;
        Ok(solutions.iter().filter(|s| filter.matches(s)).cloned().collect())
    }
}
