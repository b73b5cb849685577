//! Verification client and trust scoring for the calculus coach.
//!
//! [`VerificationClient`] delegates mathematical and unit checks to an
//! external symbolic verifier behind the [`Verifier`] trait, and converts
//! any service failure into an explicit `ok = false` response instead of an
//! error. [`trust`] aggregates the per-check judgments into the blended
//! [`TrustScore`](coach_core::TrustScore) the orchestrator gates on.

pub mod client;
pub mod mock;
pub mod trust;
pub mod types;

pub use client::{HttpVerifier, VerificationClient, Verifier};
pub use mock::MockVerifier;
pub use trust::{calculate_trust_score, is_reliable, TrustWeights};
pub use types::{CheckType, VerifierCheck, VerifierResponse, VerifyOptions};
