//! Rubric postprocessing for the calculus coach.
//!
//! The rubric is the set of formatting, justification, and notation rules a
//! candidate answer must satisfy. [`postprocess`] applies the numeric
//! formatting and notation canonicalization passes in sequence, parses the
//! content into uniform steps, collects justification violations, and
//! scores conformance in [0, 1].
//!
//! Heading-pattern-based step parsing over free-form generated text is
//! inherently best-effort; content with no recognizable heading becomes a
//! single synthetic step rather than an error.

pub mod config;
pub mod justify;
pub mod notation;
pub mod numeric;
pub mod postprocess;
pub mod steps;

pub use config::{RubricConfig, ScoreWeights};
pub use postprocess::{
    postprocess, PostprocessResult, RubricMetadata, Severity, Violation,
};
pub use steps::{parse_steps, RubricStep};
