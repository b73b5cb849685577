//! Scripted completion model for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use coach_core::{CoachError, Result};

use crate::types::{CompletionModel, CompletionRequest, CompletionResult, TokenUsage};

enum Script {
    /// Always answer with this text.
    Respond(String),
    /// Always fail with this error.
    Fail(CoachError),
    /// Fail `remaining` more times, then answer with the text.
    FailThenRespond { error: CoachError, remaining: u32, text: String },
}

/// A scripted [`CompletionModel`] for tests.
///
/// Behavior is configured per model identifier; unknown models fail with a
/// terminal `unknown_model` error. Call counts are recorded per model.
#[derive(Default)]
pub struct MockModel {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<HashMap<String, u32>>,
}

impl MockModel {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a fixed successful response for a model.
    pub fn respond_model(&self, model: &str, text: &str) {
        self.scripts.lock().unwrap().insert(model.to_string(), Script::Respond(text.to_string()));
    }

    /// Script a persistent failure for a model.
    pub fn fail_model(&self, model: &str, error: CoachError) {
        self.scripts.lock().unwrap().insert(model.to_string(), Script::Fail(error));
    }

    /// Script one failure followed by a successful response.
    pub fn fail_then_respond(&self, model: &str, error: CoachError, text: &str) {
        self.scripts.lock().unwrap().insert(
            model.to_string(),
            Script::FailThenRespond { error, remaining: 1, text: text.to_string() },
        );
    }

    /// Number of completion calls made against a model.
    pub fn calls_for(&self, model: &str) -> u32 {
        self.calls.lock().unwrap().get(model).copied().unwrap_or(0)
    }
}

#[async_trait]
impl CompletionModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult> {
        *self.calls.lock().unwrap().entry(request.model.clone()).or_insert(0) += 1;

        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(&request.model) {
            Some(Script::Respond(text)) => Ok(CompletionResult {
                text: text.clone(),
                model: request.model,
                usage: TokenUsage { prompt_tokens: 10, completion_tokens: 20 },
                finish_reason: "stop".to_string(),
            }),
            Some(Script::Fail(error)) => Err(error.clone()),
            Some(Script::FailThenRespond { error, remaining, text }) => {
                if *remaining > 0 {
                    *remaining -= 1;
                    Err(error.clone())
                } else {
                    Ok(CompletionResult {
                        text: text.clone(),
                        model: request.model,
                        usage: TokenUsage { prompt_tokens: 10, completion_tokens: 20 },
                        finish_reason: "stop".to_string(),
                    })
                }
            }
            None => Err(CoachError::completion_terminal(
                "unknown_model",
                format!("no script for model '{}'", request.model),
            )),
        }
    }
}
