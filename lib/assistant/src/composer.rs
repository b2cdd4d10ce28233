//! Per-message routing and reply composition.

use crate::reply::ChatReply;
use crate::templates::{
    APOLOGY, GREETING, SCREENSHOT_FAILED, SCREENSHOT_UNAVAILABLE, SERVICES_MENU, enhanced_prompt,
    follow_up_suggestions, format_service_info, practice_header, screenshot_prompt,
};
use cloudbuddy_ai::{ImagePayload, LlmBackend, LlmError, LlmRequest};
use cloudbuddy_conversation::{ConversationContext, Detector, SessionStore};
use cloudbuddy_core::SessionKey;
use cloudbuddy_knowledge::{AccessMethod, KnowledgeBase};
use cloudbuddy_practice::{Difficulty, QuestionGenerator};
use rootcause::Report;
use std::sync::Arc;
use tracing::{Span, debug, error, instrument};

/// Routes chat messages to the right reply source and records each turn.
pub struct ResponseComposer {
    detector: Detector,
    sessions: Arc<SessionStore>,
    questions: Arc<QuestionGenerator>,
    backend: Option<Arc<dyn LlmBackend>>,
}

impl ResponseComposer {
    /// Creates a composer that answers from the knowledge base only.
    #[must_use]
    pub fn new(
        knowledge: KnowledgeBase,
        sessions: Arc<SessionStore>,
        questions: Arc<QuestionGenerator>,
    ) -> Self {
        Self {
            detector: Detector::new(knowledge),
            sessions,
            questions,
            backend: None,
        }
    }

    /// Answers text and screenshot questions with `backend`.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Returns true if a model backend is configured.
    #[must_use]
    pub fn is_model_backed(&self) -> bool {
        self.backend.is_some()
    }

    /// Returns the session store turns are recorded in.
    #[must_use]
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Returns the practice question generator.
    #[must_use]
    pub fn questions(&self) -> &Arc<QuestionGenerator> {
        &self.questions
    }

    /// Returns the knowledge base services are resolved against.
    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        self.detector.knowledge()
    }

    /// Processes one chat message and records the turn.
    ///
    /// Never fails: a failed model call is logged and answered with a fixed
    /// apology. Without `session_id` the caller's daily session is used.
    #[instrument(skip_all, fields(session_id = tracing::field::Empty))]
    pub async fn process_message(
        &self,
        message: &str,
        image: Option<&str>,
        session_id: Option<&str>,
    ) -> ChatReply {
        let session_id = match session_id.filter(|id| !id.is_empty()) {
            Some(id) => SessionKey::new(id),
            None => self.sessions.get_or_create_session_id(None),
        };
        Span::current().record("session_id", session_id.as_str());

        let context = self.sessions.get_context(&session_id);
        let mut reply = ChatReply::new(session_id.clone());

        if self.detector.is_greeting(message) {
            debug!("Answering greeting");
            reply.message = GREETING.to_string();
            self.sessions
                .store_context(&session_id, message, &reply.message, None, None);
            return reply;
        }

        if self.detector.is_practice_request(message) {
            self.answer_practice(message, &context, &mut reply).await;
            self.sessions
                .store_context(&session_id, message, &reply.message, None, None);
            return reply;
        }

        let mut service = self.detector.detect_service(message);
        let topic = self.detector.detect_topic(message, service);
        let access = self.detector.detect_access_method(message);

        let mut user_text = message.to_string();
        if self.detector.is_follow_up(message, &context) {
            if let Some(current) = context.current_service.as_deref() {
                debug!(current_service = current, "Resolving follow-up");
                service = service.or_else(|| self.knowledge().get(current).map(|entry| entry.id));
                user_text = format!("Follow-up about {current}: {message}");
            }
        }

        if let Some(image) = image.filter(|image| !image.is_empty()) {
            reply.message = self.analyze_screenshot(image, &user_text, &context).await;
            self.sessions
                .store_context(&session_id, user_text, &reply.message, None, None);
            return reply;
        }

        match self
            .compose_text(&user_text, &context, service, access, topic.as_deref())
            .await
        {
            Ok(text) => {
                reply.message = text;
                if let Some(entry) = service.and_then(|id| self.knowledge().get(id)) {
                    reply.service_info = Some(entry);
                    reply.follow_up_suggestions = follow_up_suggestions(entry);
                }
            }
            Err(report) => {
                error!(error = %report, "Failed to generate chat reply");
                reply.message = APOLOGY.to_string();
            }
        }

        self.sessions.store_context(
            &session_id,
            user_text,
            &reply.message,
            service.map(str::to_string),
            topic,
        );
        reply
    }

    async fn answer_practice(
        &self,
        message: &str,
        context: &ConversationContext,
        reply: &mut ChatReply,
    ) {
        let difficulty = Difficulty::detect(message);
        let targeted = self.detector.detect_service(message).or_else(|| {
            context
                .current_service
                .as_deref()
                .and_then(|current| self.knowledge().get(current))
                .map(|entry| entry.id)
        });

        let (service, topic) = match targeted {
            Some(service) => (
                service,
                self.detector.detect_topic(message, Some(service)),
            ),
            None => {
                let Some(service) = self.random_service() else {
                    reply.message = APOLOGY.to_string();
                    return;
                };
                (service, None)
            }
        };
        debug!(service, %difficulty, random = targeted.is_none(), "Answering practice request");

        let question = self
            .questions
            .generate(service, difficulty, topic.as_deref())
            .await;
        reply.practice_question = Some(question);
        reply.message = practice_header(targeted, difficulty);
    }

    fn random_service(&self) -> Option<&'static str> {
        self.knowledge().random_id(&mut rand::thread_rng())
    }

    async fn analyze_screenshot(
        &self,
        image: &str,
        message: &str,
        context: &ConversationContext,
    ) -> String {
        let Some(backend) = &self.backend else {
            return SCREENSHOT_UNAVAILABLE.to_string();
        };

        let result = async {
            let payload = ImagePayload::from_data_uri(image)?;
            debug!(mime_type = %payload.mime_type, bytes = payload.byte_len, "Analyzing screenshot");
            let request =
                LlmRequest::new(screenshot_prompt(message, context)).with_image(payload);
            backend.generate(&request).await
        }
        .await;

        match result {
            Ok(response) => response.content,
            Err(report) => {
                error!(error = %report, "Screenshot analysis failed");
                SCREENSHOT_FAILED.to_string()
            }
        }
    }

    async fn compose_text(
        &self,
        message: &str,
        context: &ConversationContext,
        service: Option<&'static str>,
        access: Option<AccessMethod>,
        topic: Option<&str>,
    ) -> Result<String, Report<LlmError>> {
        if let Some(backend) = &self.backend {
            let request = LlmRequest::new(enhanced_prompt(message, context, service));
            let response = backend.generate(&request).await?;
            return Ok(response.content);
        }

        debug!(
            service,
            access = access.as_ref().map(AccessMethod::as_str),
            "Answering from knowledge base"
        );
        Ok(match service.and_then(|id| self.knowledge().get(id)) {
            Some(entry) => format_service_info(entry, access, topic),
            None => SERVICES_MENU.to_string(),
        })
    }
}

impl std::fmt::Debug for ResponseComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseComposer")
            .field("detector", &self.detector)
            .field("model", &self.backend.as_ref().map(|b| b.model().to_string()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudbuddy_ai::StaticBackend;
    use cloudbuddy_conversation::SessionStoreConfig;
    use cloudbuddy_practice::QuestionCacheConfig;

    const PNG_URI: &str = "data:image/png;base64,aGVsbG8=";

    fn offline() -> ResponseComposer {
        ResponseComposer::new(
            KnowledgeBase::aws(),
            Arc::new(SessionStore::new(SessionStoreConfig::default())),
            Arc::new(QuestionGenerator::offline()),
        )
    }

    fn backed(backend: Arc<StaticBackend>) -> ResponseComposer {
        ResponseComposer::new(
            KnowledgeBase::aws(),
            Arc::new(SessionStore::default()),
            Arc::new(QuestionGenerator::new(None, QuestionCacheConfig::default())),
        )
        .with_backend(backend)
    }

    #[tokio::test]
    async fn greeting_gets_introduction() {
        let composer = offline();
        let reply = composer.process_message("Namaste!", None, Some("s1")).await;

        assert_eq!(reply.message, GREETING);
        assert!(reply.service_info.is_none());

        let context = composer.sessions().get_context(&SessionKey::new("s1"));
        assert_eq!(context.history.len(), 1);
        assert_eq!(context.current_service, None);
    }

    #[tokio::test]
    async fn missing_session_uses_daily_default() {
        let composer = offline();
        let expected = composer.sessions().get_or_create_session_id(None);
        let reply = composer.process_message("hello", None, None).await;
        assert_eq!(reply.session_id, expected);
    }

    #[tokio::test]
    async fn session_id_is_returned_as_given() {
        let composer = offline();
        let reply = composer.process_message("hello", None, Some(" s1 ")).await;
        assert_eq!(reply.session_id.as_str(), " s1 ");

        let reply = composer.process_message("hello", None, Some("")).await;
        assert_eq!(reply.session_id, composer.sessions().get_or_create_session_id(None));
    }

    #[tokio::test]
    async fn ec2_console_question_answers_from_knowledge_base() {
        let composer = offline();
        let reply = composer
            .process_message("EC2 console mein instance kaise launch kare?", None, Some("s1"))
            .await;

        assert!(reply.message.contains(
            "EC2 Dashboard → Launch Instance → Select AMI → Choose Instance Type → Configure → Launch"
        ));
        assert!(!reply.message.contains("CLI Command"));
        assert!(!reply.message.contains("SDK Code"));
        assert_eq!(reply.service_info.map(|entry| entry.id), Some("ec2"));
        assert_eq!(reply.follow_up_suggestions.len(), 3);
        assert!(reply.code_examples.is_none());

        let context = composer.sessions().get_context(&SessionKey::new("s1"));
        assert_eq!(context.current_service.as_deref(), Some("ec2"));
        assert_eq!(context.current_topic.as_deref(), Some("launch"));
    }

    #[tokio::test]
    async fn follow_up_stays_on_sticky_service() {
        let composer = offline();
        composer
            .process_message("EC2 instance kya hota hai?", None, Some("s1"))
            .await;
        let reply = composer.process_message("aur kya?", None, Some("s1")).await;

        assert!(reply.message.starts_with("## **Amazon EC2**"));
        assert_eq!(reply.service_info.map(|entry| entry.id), Some("ec2"));

        let context = composer.sessions().get_context(&SessionKey::new("s1"));
        assert_eq!(context.history.len(), 2);
        assert_eq!(context.history[1].user, "Follow-up about ec2: aur kya?");
        assert_eq!(context.current_service.as_deref(), Some("ec2"));
    }

    #[tokio::test]
    async fn unknown_subject_gets_services_menu() {
        let composer = offline();
        let reply = composer
            .process_message("kuch bhi samajh nahi aa raha", None, Some("s1"))
            .await;

        assert_eq!(reply.message, SERVICES_MENU);
        assert!(reply.follow_up_suggestions.is_empty());
        assert!(reply.service_info.is_none());
    }

    #[tokio::test]
    async fn practice_request_for_named_service() {
        let composer = offline();
        let reply = composer
            .process_message("S3 bucket practice question do", None, Some("s1"))
            .await;

        assert_eq!(reply.message, "**S3 Practice Question** (beginner level) 🤔");
        let question = reply.practice_question.expect("question");
        assert_eq!(question.service, "s3");
        assert_eq!(question.correct, 0);

        let context = composer.sessions().get_context(&SessionKey::new("s1"));
        assert_eq!(context.history.len(), 1);
        assert_eq!(context.current_service, None);
    }

    #[tokio::test]
    async fn practice_request_uses_current_service() {
        let composer = offline();
        composer
            .process_message("lambda function kya hai", None, Some("s1"))
            .await;
        let reply = composer.process_message("ek quiz do", None, Some("s1")).await;

        assert_eq!(reply.message, "**LAMBDA Practice Question** (beginner level) 🤔");
        let question = reply.practice_question.expect("question");
        assert_eq!(question.service, "lambda");
        assert_eq!(question.difficulty, Difficulty::Beginner);
    }

    #[tokio::test]
    async fn practice_request_without_service_picks_random() {
        let composer = offline();
        let reply = composer
            .process_message("advanced quiz do yaar", None, Some("s1"))
            .await;

        assert_eq!(
            reply.message,
            "**Random AWS Practice Question** (advanced level) 🤔"
        );
        let question = reply.practice_question.expect("question");
        assert!(composer.knowledge().contains(&question.service));
        assert_eq!(question.difficulty, Difficulty::Advanced);
    }

    #[tokio::test]
    async fn model_answers_text_questions() {
        let backend = Arc::new(StaticBackend::replying("EC2 ek virtual server hai yaar"));
        let composer = backed(backend.clone());

        let reply = composer.process_message("ec2 kya hai", None, Some("s1")).await;

        assert_eq!(reply.message, "EC2 ek virtual server hai yaar");
        assert_eq!(reply.service_info.map(|entry| entry.id), Some("ec2"));
        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.contains("Detected service: ec2"));
    }

    #[tokio::test]
    async fn model_failure_becomes_apology_and_turn_is_kept() {
        let backend = Arc::new(StaticBackend::failing(LlmError::Timeout));
        let composer = backed(backend);

        let reply = composer
            .process_message("ec2 instance start nahi ho raha", None, Some("s1"))
            .await;

        assert_eq!(reply.message, APOLOGY);
        assert!(reply.follow_up_suggestions.is_empty());

        let context = composer.sessions().get_context(&SessionKey::new("s1"));
        assert_eq!(context.history.len(), 1);
        assert_eq!(context.current_service.as_deref(), Some("ec2"));
    }

    #[tokio::test]
    async fn screenshot_without_model_is_unavailable() {
        let composer = offline();
        let reply = composer
            .process_message("ye kya error hai", Some(PNG_URI), Some("s1"))
            .await;

        assert_eq!(reply.message, SCREENSHOT_UNAVAILABLE);
        assert_eq!(
            composer.sessions().get_context(&SessionKey::new("s1")).history.len(),
            1
        );
    }

    #[tokio::test]
    async fn screenshot_is_sent_to_model() {
        let backend = Arc::new(StaticBackend::replying("**Service Detected:** EC2"));
        let composer = backed(backend.clone());

        let reply = composer
            .process_message("ye kya error hai", Some(PNG_URI), Some("s1"))
            .await;

        assert_eq!(reply.message, "**Service Detected:** EC2");
        let requests = backend.requests();
        assert_eq!(requests[0].images.len(), 1);
        assert_eq!(requests[0].images[0].mime_type, "image/png");
        assert!(requests[0].prompt.contains("User question: ye kya error hai"));
    }

    #[tokio::test]
    async fn undecodable_screenshot_fails_gracefully() {
        let backend = Arc::new(StaticBackend::replying("unused"));
        let composer = backed(backend.clone());

        let reply = composer
            .process_message("", Some("data:image/png;base64,@@@"), Some("s1"))
            .await;

        assert_eq!(reply.message, SCREENSHOT_FAILED);
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn blank_screenshot_still_takes_screenshot_path() {
        let composer = offline();
        let reply = composer.process_message("", Some("   "), Some("s1")).await;
        assert_eq!(reply.message, SCREENSHOT_UNAVAILABLE);

        let backend = Arc::new(StaticBackend::replying("unused"));
        let composer = backed(backend.clone());
        let reply = composer.process_message("", Some("   "), Some("s1")).await;
        assert_eq!(reply.message, SCREENSHOT_FAILED);
        assert!(backend.requests().is_empty());
    }
}
