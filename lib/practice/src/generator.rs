//! Model-backed question generation with a deterministic fallback.

use crate::cache::{QuestionCache, QuestionCacheConfig};
use crate::difficulty::Difficulty;
use crate::fallback::fallback_question;
use crate::question::{GENERAL_TOPIC, PracticeQuestion};
use cloudbuddy_ai::{LlmBackend, LlmRequest};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Builds the generation prompt for one question.
#[must_use]
pub fn question_prompt(service: &str, difficulty: Difficulty, topic: Option<&str>) -> String {
    let topic_context = topic
        .map(|t| format!(" specifically about {t}"))
        .unwrap_or_default();
    let topic_name = topic.unwrap_or(GENERAL_TOPIC);

    format!(
        r#"Generate a practical AWS {service_upper} practice question{topic_context} for {difficulty} level.

Requirements:
1. Question should be in Hinglish (mix of Hindi and English)
2. Provide 4 multiple choice options
3. Mark the correct answer (0-3 index)
4. Give explanation in Hinglish
5. Make it practical, not theoretical

Difficulty guidelines:
- beginner: Basic concepts, simple commands
- intermediate: Configuration, best practices
- advanced: Complex scenarios, troubleshooting

Return ONLY a JSON object with this structure:
{{
    "question": "Question text in Hinglish",
    "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
    "correct": 0,
    "explanation": "Explanation in Hinglish",
    "service": "{service}",
    "difficulty": "{difficulty}",
    "topic": "{topic_name}"
}}"#,
        service_upper = service.to_uppercase(),
    )
}

/// Produces practice questions.
///
/// With a backend, each call makes one model request and validates the
/// result. Without one, or on any failure, the fixed fallback table is
/// used. [`QuestionGenerator::generate`] therefore always returns a
/// question.
pub struct QuestionGenerator {
    backend: Option<Arc<dyn LlmBackend>>,
    cache: QuestionCache,
}

impl QuestionGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(backend: Option<Arc<dyn LlmBackend>>, cache: QuestionCacheConfig) -> Self {
        Self {
            backend,
            cache: QuestionCache::new(cache),
        }
    }

    /// Creates a generator that only serves fallback questions.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(None, QuestionCacheConfig::default())
    }

    /// Returns true if a model backend is configured.
    #[must_use]
    pub fn is_model_backed(&self) -> bool {
        self.backend.is_some()
    }

    /// Returns the cache of generated questions.
    #[must_use]
    pub fn cache(&self) -> &QuestionCache {
        &self.cache
    }

    /// Generates a question for `service` at `difficulty`.
    #[instrument(skip(self))]
    pub async fn generate(
        &self,
        service: &str,
        difficulty: Difficulty,
        topic: Option<&str>,
    ) -> PracticeQuestion {
        let Some(backend) = &self.backend else {
            debug!("No model configured, serving fallback question");
            return fallback_question(service, difficulty);
        };

        let request =
            LlmRequest::new(question_prompt(service, difficulty, topic)).with_json_output();

        let response = match backend.generate(&request).await {
            Ok(response) => response,
            Err(report) => {
                error!(error = %report, "Question generation call failed");
                return fallback_question(service, difficulty);
            }
        };

        match PracticeQuestion::from_model_output(&response.content, service, difficulty, topic) {
            Ok(question) => {
                self.cache.insert(question.clone());
                question
            }
            Err(report) => {
                error!(error = %report, "Model returned an unusable question");
                fallback_question(service, difficulty)
            }
        }
    }
}

impl std::fmt::Debug for QuestionGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionGenerator")
            .field("model", &self.backend.as_ref().map(|b| b.model().to_string()))
            .field("cache", &self.cache)
            .finish()
    }
}
