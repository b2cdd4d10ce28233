//! Generative model access for cloudbuddy.
//!
//! This crate provides the seam between the assistant and an external
//! text/image-understanding model:
//!
//! - **LlmBackend**: the trait every provider implements
//! - **GeminiClient**: Google Gemini over its REST API
//! - **ImagePayload**: validated inline images decoded from data URIs
//! - **StaticBackend**: an in-process backend with a scripted reply
//!
//! Calls are one-shot. Callers are expected to fall back to deterministic
//! output when a call fails.

pub mod backend;
pub mod error;
pub mod fixed;
pub mod gemini;
pub mod image;

pub use backend::{LlmBackend, LlmRequest, LlmResponse, TokenUsage};
pub use error::LlmError;
pub use fixed::StaticBackend;
pub use gemini::{GeminiClient, GeminiConfig};
pub use image::ImagePayload;
