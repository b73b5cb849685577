//! # coach-core
//!
//! Shared domain types for the Verified Answer Mode (VAM) calculus coach.
//!
//! ## Overview
//!
//! This crate defines the value objects that flow between the coach's
//! pipeline stages:
//!
//! - [`ExamVariant`] - the exam flavor a question targets (AB or BC)
//! - [`Source`] - a closed, tagged description of where an answer came from
//! - [`TrustScore`] - the blended [0, 1] confidence attached to every answer
//! - [`CoachResponse`] - the terminal output of `process_question`
//! - [`CoachError`] - the error taxonomy shared by all pipeline crates
//!
//! Everything here is a plain value object: cheap to clone, serializable,
//! and owned by the call that produced it.

pub mod error;
pub mod types;
pub mod variant;

pub use error::{CoachError, Result};
pub use types::{
    CoachResponse, ResponseMetadata, Source, TrustBreakdown, TrustScore,
};
pub use variant::{detect_variant, ExamVariant};
