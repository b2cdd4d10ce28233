//! In-process backend with a scripted outcome.
//!
//! Useful offline and in tests: every call returns the same reply (or the
//! same error) and the requests are kept for inspection.

use crate::backend::{LlmBackend, LlmRequest, LlmResponse, TokenUsage};
use crate::error::LlmError;
use async_trait::async_trait;
use rootcause::Report;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
enum Outcome {
    Reply(String),
    Fail(LlmError),
}

/// A backend that answers every request the same way.
#[derive(Debug)]
pub struct StaticBackend {
    outcome: Outcome,
    requests: Mutex<Vec<LlmRequest>>,
}

impl StaticBackend {
    /// Creates a backend that always replies with `content`.
    #[must_use]
    pub fn replying(content: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Reply(content.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a backend that always fails with `error`.
    #[must_use]
    pub fn failing(error: LlmError) -> Self {
        Self {
            outcome: Outcome::Fail(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LlmBackend for StaticBackend {
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, Report<LlmError>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match &self.outcome {
            Outcome::Reply(content) => Ok(LlmResponse {
                content: content.clone(),
                usage: TokenUsage::default(),
                model: self.model().to_string(),
            }),
            Outcome::Fail(error) => Err(error.clone().into()),
        }
    }

    fn model(&self) -> &str {
        "static"
    }
}
