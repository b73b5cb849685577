//! # coach-model
//!
//! Completion model integration for the calculus coach.
//!
//! ## Overview
//!
//! [`CompletionModel`] is the transport trait an actual provider implements;
//! [`CompletionAdapter`] layers the coach's policies on top of it:
//!
//! - an ordered model fallback chain, stopping at the first success
//! - bounded, exponentially backed-off retries for transient failures only
//! - strict-JSON completion with a distinguished parse-failure error
//!
//! [`MockModel`] scripts responses and failures for tests.

pub mod adapter;
pub mod mock;
pub mod types;

pub use adapter::{CompletionAdapter, RetryPolicy};
pub use mock::MockModel;
pub use types::{
    CompletionModel, CompletionOptions, CompletionRequest, CompletionResult, Message, Role,
    TokenUsage,
};
