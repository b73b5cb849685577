//! Canonical solution matching for the calculus coach.
//!
//! A canonical solution is a pre-authored, expert-vetted reference answer
//! keyed by problem identity. [`CanonicalMatcher`] scores candidates from a
//! [`CanonicalStore`] against the incoming query; relevance and score are
//! recomputed per query and never cached on the solution record itself.

pub mod matcher;
pub mod solution;
pub mod steps;
pub mod store;

pub use matcher::{CanonicalMatcher, MatchOptions};
pub use solution::{
    CanonicalFilter, CanonicalMetadata, CanonicalResult, CanonicalSolution, SolutionStep,
};
pub use steps::{format_steps, FormattedStep};
pub use store::{CanonicalStore, InMemoryCanonicalStore};
