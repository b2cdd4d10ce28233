//! Error types for the knowledge crate.

use std::fmt;

/// Errors from knowledge base lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeError {
    /// The service identifier is not in the table.
    UnknownService { id: String },
}

impl fmt::Display for KnowledgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownService { id } => write!(f, "unknown service: {id}"),
        }
    }
}

impl std::error::Error for KnowledgeError {}
