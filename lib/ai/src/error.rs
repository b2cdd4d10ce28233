//! Error types for the AI crate.
//!
//! Backends return `Report<LlmError>`; callers log the report and
//! substitute a fallback.

use std::fmt;

/// Why a generation call produced no usable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Transport failure or a non-success HTTP status.
    RequestFailed { reason: String },
    /// The body arrived but held no candidate text.
    ResponseParseFailed { reason: String },
    /// The per-request timeout elapsed.
    Timeout,
    /// HTTP 429, with the `Retry-After` hint when sent.
    RateLimited { retry_after_secs: Option<u64> },
    /// The client could not be built from its settings.
    InvalidConfig { reason: String },
    /// An inline image was not a decodable base64 image.
    InvalidImage { reason: String },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { reason } => write!(f, "generation request failed: {reason}"),
            Self::ResponseParseFailed { reason } => {
                write!(f, "unusable generation response: {reason}")
            }
            Self::Timeout => write!(f, "generation request timed out"),
            Self::RateLimited {
                retry_after_secs: Some(secs),
            } => write!(f, "rate limited by provider, retry after {secs}s"),
            Self::RateLimited {
                retry_after_secs: None,
            } => write!(f, "rate limited by provider"),
            Self::InvalidConfig { reason } => write!(f, "invalid model client settings: {reason}"),
            Self::InvalidImage { reason } => write!(f, "invalid image payload: {reason}"),
        }
    }
}

impl std::error::Error for LlmError {}
