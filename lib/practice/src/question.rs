//! Practice questions and validation of model output.

use crate::difficulty::Difficulty;
use crate::error::QuestionError;
use cloudbuddy_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

/// Topic recorded when the caller did not ask for one.
pub const GENERAL_TOPIC: &str = "general";

/// A multiple choice practice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    /// Question text.
    pub question: String,
    /// Exactly four answer options.
    pub options: Vec<String>,
    /// Index of the correct option.
    pub correct: usize,
    /// Why the correct option is correct.
    pub explanation: String,
    /// Service identifier the question is about.
    pub service: String,
    /// Difficulty level.
    pub difficulty: Difficulty,
    /// Topic within the service.
    pub topic: String,
}

impl PracticeQuestion {
    /// Parses a question from raw model output.
    ///
    /// Markdown code fences around the JSON are tolerated. The `service`,
    /// `difficulty` and `topic` fields come from the caller; whatever the
    /// model put there is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionError::MalformedJson`] if the text is not a JSON
    /// object, or [`QuestionError::InvalidQuestion`] if a required field is
    /// missing or out of range.
    pub fn from_model_output(
        text: &str,
        service: &str,
        difficulty: Difficulty,
        topic: Option<&str>,
    ) -> Result<Self, QuestionError> {
        let value: JsonValue = serde_json::from_str(strip_code_fence(text)).map_err(|e| {
            QuestionError::MalformedJson {
                reason: e.to_string(),
            }
        })?;

        let question = value
            .get("question")
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| invalid("missing question text"))?;

        let options = value
            .get("options")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| invalid("missing options"))?
            .iter()
            .map(|option| option.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| invalid("options must be strings"))?;
        if options.len() != OPTION_COUNT {
            return Err(invalid(&format!(
                "expected {OPTION_COUNT} options, got {}",
                options.len()
            ))
            .into());
        }

        let correct = value
            .get("correct")
            .and_then(JsonValue::as_u64)
            .and_then(|index| usize::try_from(index).ok())
            .filter(|index| *index < OPTION_COUNT)
            .ok_or_else(|| invalid("correct must be an index between 0 and 3"))?;

        let explanation = value
            .get("explanation")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| invalid("missing explanation"))?;

        Ok(Self {
            question: question.to_string(),
            options,
            correct,
            explanation: explanation.to_string(),
            service: service.to_string(),
            difficulty,
            topic: topic.unwrap_or(GENERAL_TOPIC).to_string(),
        })
    }
}

fn invalid(reason: &str) -> QuestionError {
    QuestionError::InvalidQuestion {
        reason: reason.to_string(),
    }
}

/// Removes a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
