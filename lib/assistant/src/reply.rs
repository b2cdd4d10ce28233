//! Chat reply payload.

use cloudbuddy_core::SessionKey;
use cloudbuddy_knowledge::ServiceEntry;
use cloudbuddy_practice::PracticeQuestion;
use serde::Serialize;

/// The result of processing one chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    /// Markdown reply text.
    pub message: String,
    /// Knowledge base entry for the detected service.
    pub service_info: Option<&'static ServiceEntry>,
    /// Always `null`; kept for clients that expect the field.
    pub code_examples: Option<String>,
    /// Always `null`; kept for clients that expect the field.
    pub troubleshooting: Option<String>,
    /// Generated practice question, for practice requests.
    pub practice_question: Option<PracticeQuestion>,
    /// Session the turn was recorded under.
    pub session_id: SessionKey,
    /// Up to three suggested next questions.
    pub follow_up_suggestions: Vec<String>,
}

impl ChatReply {
    /// Creates an empty reply for a session.
    #[must_use]
    pub fn new(session_id: SessionKey) -> Self {
        Self {
            message: String::new(),
            service_info: None,
            code_examples: None,
            troubleshooting: None,
            practice_question: None,
            session_id,
            follow_up_suggestions: Vec::new(),
        }
    }
}
