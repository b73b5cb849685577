//! Scripted verifier for tests.

use async_trait::async_trait;

use coach_core::{CoachError, Result};

use crate::client::Verifier;
use crate::types::{VerifierResponse, VerifyOptions};

enum Script {
    Respond(VerifierResponse),
    Fail(String),
}

/// A scripted [`Verifier`] for tests.
pub struct MockVerifier {
    script: Script,
}

impl MockVerifier {
    /// Always return the given response.
    pub fn with_response(response: VerifierResponse) -> Self {
        Self { script: Script::Respond(response) }
    }

    /// Always fail with an external-service error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { script: Script::Fail(message.into()) }
    }
}

#[async_trait]
impl Verifier for MockVerifier {
    async fn verify(
        &self,
        _problem: &str,
        _solution: &str,
        _options: &VerifyOptions,
    ) -> Result<VerifierResponse> {
        match &self.script {
            Script::Respond(response) => Ok(response.clone()),
            Script::Fail(message) => Err(CoachError::ExternalService {
                service: "verifier".into(),
                message: message.clone(),
            }),
        }
    }
}
