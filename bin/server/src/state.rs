//! Shared application state.

use crate::config::ServerConfig;
use cloudbuddy_ai::{GeminiClient, LlmBackend, LlmError};
use cloudbuddy_assistant::ResponseComposer;
use cloudbuddy_conversation::SessionStore;
use cloudbuddy_knowledge::KnowledgeBase;
use cloudbuddy_practice::QuestionGenerator;
use rootcause::Report;
use std::sync::Arc;

/// State shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Routes chat messages and owns the session store and generator.
    pub composer: Arc<ResponseComposer>,
}

impl AppState {
    /// Wraps an already-built composer.
    #[must_use]
    pub fn new(composer: ResponseComposer) -> Self {
        Self {
            composer: Arc::new(composer),
        }
    }

    /// Builds the state described by `config`.
    ///
    /// Without an API key the assistant runs from the knowledge base only.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is configured but the Gemini client cannot
    /// be built from it.
    pub fn from_config(config: &ServerConfig) -> Result<Self, Report<LlmError>> {
        let backend = config
            .gemini_client_config()
            .map(GeminiClient::new)
            .transpose()?
            .map(|client| Arc::new(client) as Arc<dyn LlmBackend>);

        Ok(Self::with_backend(config, backend))
    }

    /// Builds the state with an explicit backend.
    #[must_use]
    pub fn with_backend(config: &ServerConfig, backend: Option<Arc<dyn LlmBackend>>) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session.store_config()));
        let questions = Arc::new(QuestionGenerator::new(
            backend.clone(),
            config.practice.cache_config(),
        ));
        let composer = ResponseComposer::new(KnowledgeBase::aws(), sessions, questions);
        let composer = match backend {
            Some(backend) => composer.with_backend(backend),
            None => composer,
        };
        Self::new(composer)
    }

    /// Returns the session store.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        self.composer.sessions()
    }

    /// Returns the practice question generator.
    #[must_use]
    pub fn questions(&self) -> &QuestionGenerator {
        self.composer.questions()
    }

    /// Returns the knowledge base.
    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        self.composer.knowledge()
    }

    /// Returns true if a model backend is configured.
    #[must_use]
    pub fn gemini_available(&self) -> bool {
        self.composer.is_model_backed()
    }
}
