//! HTTP error responses.
//!
//! Every error renders as `{"error": "<message>"}`. Messages are safe to
//! show users; internal detail is only logged.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Errors returned by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Chat request had neither text nor an image.
    EmptyMessage,
    /// Request body could not be parsed.
    MalformedBody { details: String },
    /// Practice difficulty outside the supported levels.
    InvalidDifficulty { value: String },
    /// Practice service not in the knowledge base.
    UnsupportedService { service: String },
    /// Anything else.
    Internal { details: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "message and image are both empty"),
            Self::MalformedBody { details } => write!(f, "malformed request body: {details}"),
            Self::InvalidDifficulty { value } => write!(f, "invalid difficulty '{value}'"),
            Self::UnsupportedService { service } => {
                write!(f, "unsupported service '{service}'")
            }
            Self::Internal { details } => write!(f, "internal error: {details}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::EmptyMessage => (
                StatusCode::BAD_REQUEST,
                "Message ya image toh bhejo yaar!".to_string(),
            ),
            Self::MalformedBody { details } => {
                tracing::debug!(details = %details, "Rejected malformed request body");
                (
                    StatusCode::BAD_REQUEST,
                    "Request body samajh nahi aaya yaar!".to_string(),
                )
            }
            Self::InvalidDifficulty { .. } => (
                StatusCode::BAD_REQUEST,
                "Invalid difficulty level yaar!".to_string(),
            ),
            Self::UnsupportedService { service } => (
                StatusCode::BAD_REQUEST,
                format!("{service} supported nahi hai yaar!"),
            ),
            Self::Internal { details } => {
                tracing::error!(details = %details, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server mein problem hai yaar! Phir se try karo.".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
