//! Error types for practice questions.

use std::fmt;

/// Errors from parsing or validating practice questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionError {
    /// Difficulty level is not one of the supported levels.
    UnknownDifficulty { value: String },
    /// Model output was not valid JSON.
    MalformedJson { reason: String },
    /// Model output was JSON but did not describe a usable question.
    InvalidQuestion { reason: String },
}

impl fmt::Display for QuestionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDifficulty { value } => {
                write!(f, "unknown difficulty level: {value}")
            }
            Self::MalformedJson { reason } => {
                write!(f, "question is not valid JSON: {reason}")
            }
            Self::InvalidQuestion { reason } => {
                write!(f, "invalid question: {reason}")
            }
        }
    }
}

impl std::error::Error for QuestionError {}
