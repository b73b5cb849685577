//! The completion adapter: fallback chain, bounded retry, strict JSON.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use coach_core::{CoachError, Result};

use crate::types::{CompletionModel, CompletionOptions, CompletionResult};

/// Instruction appended to prompts by [`CompletionAdapter::complete_json`].
const STRICT_JSON_INSTRUCTION: &str =
    "Respond with a single valid JSON object only. No prose, no markdown fences.";

/// Bounded exponential backoff applied to transient failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// The backoff delay before retry number `attempt` (0-based), doubling
    /// each time and capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(2u32.saturating_pow(attempt));
        exp.min(self.max_delay)
    }
}

/// Wraps a completion transport with model fallback and bounded retry.
///
/// # Example
///
/// ```rust,ignore
/// let adapter = CompletionAdapter::new(Arc::new(transport))
///     .with_fallback_models(vec!["small-model".into()]);
/// let result = adapter.complete_with_retry(&options).await?;
/// ```
pub struct CompletionAdapter {
    transport: Arc<dyn CompletionModel>,
    fallback_models: Vec<String>,
    retry_policy: RetryPolicy,
}

impl CompletionAdapter {
    /// Create an adapter over the given transport with no fallbacks and the
    /// default retry policy.
    pub fn new(transport: Arc<dyn CompletionModel>) -> Self {
        Self { transport, fallback_models: Vec::new(), retry_policy: RetryPolicy::default() }
    }

    /// Set the ordered list of fallback model identifiers.
    pub fn with_fallback_models(mut self, models: Vec<String>) -> Self {
        self.fallback_models = models;
        self
    }

    /// Set the retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Attempt the requested model, then each fallback in order, stopping at
    /// the first success.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error when every model in the chain fails.
    pub async fn complete(&self, options: &CompletionOptions) -> Result<CompletionResult> {
        let mut last_error: Option<CoachError> = None;

        let chain = std::iter::once(options.model.as_str())
            .chain(self.fallback_models.iter().map(String::as_str));
        for model in chain {
            debug!(model, transport = self.transport.name(), "completion attempt");
            match self.transport.complete(options.to_request(model)).await {
                Ok(result) => {
                    info!(model, finish_reason = %result.finish_reason, "completion succeeded");
                    return Ok(result);
                }
                Err(err) => {
                    warn!(model, error = %err, "completion attempt failed");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            CoachError::completion_terminal("no_models", "no completion models configured")
        }))
    }

    /// [`complete`](Self::complete) wrapped in bounded, exponentially
    /// backed-off retries.
    ///
    /// Only errors flagged retryable (timeouts, rate limits, server-class
    /// failures) are retried; everything else is re-raised immediately.
    pub async fn complete_with_retry(
        &self,
        options: &CompletionOptions,
    ) -> Result<CompletionResult> {
        let mut attempt = 0;
        loop {
            match self.complete(options).await {
                Ok(result) => return Ok(result),
                Err(err) if err.is_retryable() && attempt < self.retry_policy.max_retries => {
                    let delay = self.retry_policy.delay_for(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient completion failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Complete with a strict-JSON instruction appended and parse the result.
    ///
    /// # Errors
    ///
    /// A parse failure raises a distinguished terminal
    /// `Completion { code: "invalid_json" }` error rather than silently
    /// returning malformed data.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        options: &CompletionOptions,
    ) -> Result<T> {
        let mut strict = options.clone();
        if let Some(last) = strict.messages.last_mut() {
            last.content = format!("{}\n\n{STRICT_JSON_INSTRUCTION}", last.content);
        }

        let result = self.complete_with_retry(&strict).await?;
        let cleaned = strip_code_fences(&result.text);
        serde_json::from_str(cleaned).map_err(|e| {
            CoachError::completion_terminal(
                "invalid_json",
                format!("model returned unparseable JSON: {e}"),
            )
        })
    }
}

/// Drop a surrounding markdown code fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
