//! Verifier trait, HTTP implementation, and the never-failing client wrapper.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, info};

use coach_core::{CoachError, Result};

use crate::types::{VerifierResponse, VerifyOptions};

/// Default timeout for verifier calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The external symbolic verifier.
///
/// Implementations must be idempotent: verifying the same (problem,
/// solution, options) triple twice yields the same judgments.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Run the requested checks against a candidate solution.
    async fn verify(
        &self,
        problem: &str,
        solution: &str,
        options: &VerifyOptions,
    ) -> Result<VerifierResponse>;
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    problem: &'a str,
    solution: &'a str,
    #[serde(flatten)]
    options: &'a VerifyOptions,
}

/// A [`Verifier`] backed by the symbolic verifier HTTP service.
///
/// Posts a single JSON request carrying the problem, solution, requested
/// check types, tolerance, and flags; the service responds with per-check
/// judgments.
pub struct HttpVerifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVerifier {
    /// Create a verifier against the given service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| CoachError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl Verifier for HttpVerifier {
    async fn verify(
        &self,
        problem: &str,
        solution: &str,
        options: &VerifyOptions,
    ) -> Result<VerifierResponse> {
        let url = format!("{}/verify", self.base_url);
        debug!(%url, check_count = options.check_types.len(), "calling verifier service");

        let response = self
            .client
            .post(&url)
            .json(&VerifyRequest { problem, solution, options })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "verifier request failed");
                CoachError::ExternalService {
                    service: "verifier".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "verifier service error");
            return Err(CoachError::ExternalService {
                service: "verifier".into(),
                message: format!("service returned {status}: {body}"),
            });
        }

        response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse verifier response");
            CoachError::ExternalService {
                service: "verifier".into(),
                message: format!("failed to parse response: {e}"),
            }
        })
    }
}

/// Wraps a [`Verifier`] so that service failure never throws to the caller.
///
/// A collaborator failure is converted into
/// `{ ok: false, checks: [], overall_confidence: 0, error: message }`.
pub struct VerificationClient {
    verifier: Arc<dyn Verifier>,
}

impl VerificationClient {
    /// Create a client over the given verifier.
    pub fn new(verifier: Arc<dyn Verifier>) -> Self {
        Self { verifier }
    }

    /// Verify a candidate solution; never errors.
    pub async fn verify(
        &self,
        problem: &str,
        solution: &str,
        options: &VerifyOptions,
    ) -> VerifierResponse {
        match self.verifier.verify(problem, solution, options).await {
            Ok(mut response) => {
                // A response with no checks cannot support a verdict.
                if response.checks.is_empty() {
                    response.ok = false;
                }
                info!(
                    ok = response.ok,
                    check_count = response.checks.len(),
                    overall_confidence = response.overall_confidence,
                    "verification completed"
                );
                response
            }
            Err(err) => {
                error!(error = %err, "verifier unavailable, degrading");
                VerifierResponse::failed(err.to_string())
            }
        }
    }
}
