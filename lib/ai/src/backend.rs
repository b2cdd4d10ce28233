//! LLM backend abstraction.
//!
//! Provides a unified interface over generative model providers so the
//! assistant can be tested against in-process doubles.

use crate::error::LlmError;
use crate::image::ImagePayload;
use async_trait::async_trait;
use rootcause::Report;
use serde::{Deserialize, Serialize};

/// One generation request: a prompt plus optional inline images.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The prompt to send.
    pub prompt: String,
    /// Inline images sent alongside the prompt.
    pub images: Vec<ImagePayload>,
    /// Ask the provider to answer with a JSON document.
    pub json_output: bool,
}

impl LlmRequest {
    /// Starts a text-only request.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
            json_output: false,
        }
    }

    /// Attaches an image.
    #[must_use]
    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.images.push(image);
        self
    }

    /// Requests JSON output.
    #[must_use]
    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Text produced by a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated text, all candidate parts concatenated.
    pub content: String,
    /// Tokens billed for the call.
    pub usage: TokenUsage,
    /// Model version reported by the provider.
    pub model: String,
}

/// Prompt and completion token counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt, images included.
    pub input_tokens: u32,
    /// Tokens in the generated text.
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Prompt plus completion tokens.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// A text generation service.
///
/// Implementations make exactly one upstream call per `generate` and never
/// retry; callers decide what to do on failure.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Sends `request` and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] describing transport, status, or parse
    /// failures.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, Report<LlmError>>;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;
}
