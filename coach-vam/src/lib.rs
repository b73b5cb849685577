//! # coach-vam
//!
//! Verified Answer Mode orchestration for the calculus coach.
//!
//! ## Overview
//!
//! A question moves through a small finite-state machine
//! ([`VamState`]): canonical-first matching, retrieval-grounded generation,
//! a bounded corrective-decode pass, and finally abstention. Every candidate
//! answer is symbolically verified and rubric-postprocessed before it can
//! settle, and a response is marked verified only when its trust score
//! clears the configured threshold.
//!
//! [`VamOrchestrator::process_question`] is the single entry point; it
//! never returns an error. Settled verified answers are kept in a bounded
//! FIFO cache keyed by question identity.

pub mod cache;
pub mod config;
pub mod orchestrator;
pub mod state;

pub use cache::{cache_key, BoundedCache, FifoCache};
pub use config::{CacheConfig, VamConfig};
pub use orchestrator::{QuestionContext, VamOrchestrator};
pub use state::{next_state, StageOutcome, VamState};
