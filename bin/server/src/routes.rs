//! HTTP routes.
//!
//! - `POST /api/chat`
//! - `GET /api/services`
//! - `POST /api/practice`
//! - `GET /api/conversation/{session_id}`
//! - `DELETE /api/conversation/{session_id}`
//! - `GET /api/health`
//! - `GET /api/config`

use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use cloudbuddy_assistant::ChatReply;
use cloudbuddy_conversation::Exchange;
use cloudbuddy_core::{RequestId, SessionKey};
use cloudbuddy_knowledge::{KnowledgeBase, ServiceSummary};
use cloudbuddy_practice::{Difficulty, PracticeQuestion};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::instrument;

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/services", get(services))
        .route("/api/practice", post(practice))
        .route(
            "/api/conversation/{session_id}",
            get(conversation).delete(clear_conversation),
        )
        .route("/api/health", get(health))
        .route("/api/config", get(config))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Message text.
    #[serde(default)]
    pub message: Option<String>,
    /// Screenshot as a base64 data URI.
    #[serde(default)]
    pub image: Option<String>,
    /// Session to continue.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[instrument(skip_all, fields(request_id = %RequestId::new()))]
async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::MalformedBody {
        details: e.body_text(),
    })?;

    let message = request.message.unwrap_or_default();
    let image = request.image.filter(|image| !image.is_empty());
    if message.is_empty() && image.is_none() {
        return Err(ApiError::EmptyMessage);
    }

    let reply = state
        .composer
        .process_message(&message, image.as_deref(), request.session_id.as_deref())
        .await;
    Ok(Json(reply))
}

async fn services(State(state): State<AppState>) -> Json<Vec<ServiceSummary>> {
    Json(state.knowledge().summaries())
}

/// Request body for `POST /api/practice`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct PracticeRequest {
    /// Difficulty level; beginner when absent.
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Service identifier; random when absent.
    #[serde(default)]
    pub service: Option<String>,
    /// Topic within the service.
    #[serde(default)]
    pub topic: Option<String>,
}

#[instrument(skip_all, fields(request_id = %RequestId::new()))]
async fn practice(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PracticeQuestion>, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        PracticeRequest::default()
    } else {
        serde_json::from_slice::<Option<PracticeRequest>>(&body)
            .map_err(|e| ApiError::MalformedBody {
                details: e.to_string(),
            })?
            .unwrap_or_default()
    };

    let difficulty = match request.difficulty.as_deref() {
        Some(value) => value
            .parse::<Difficulty>()
            .map_err(|_| ApiError::InvalidDifficulty {
                value: value.to_string(),
            })?,
        None => Difficulty::default(),
    };

    let service = match request.service {
        Some(service) => {
            state
                .knowledge()
                .require(&service)
                .map_err(|_| ApiError::UnsupportedService {
                    service: service.clone(),
                })?
                .id
        }
        None => random_service(state.knowledge()).ok_or_else(|| ApiError::Internal {
            details: "knowledge base is empty".to_string(),
        })?,
    };

    let question = state
        .questions()
        .generate(service, difficulty, request.topic.as_deref())
        .await;
    Ok(Json(question))
}

fn random_service(knowledge: &KnowledgeBase) -> Option<&'static str> {
    knowledge.random_id(&mut rand::thread_rng())
}

/// Response body for `GET /api/conversation/{session_id}`.
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    /// Session the history belongs to.
    pub session_id: SessionKey,
    /// Exchanges, oldest first.
    pub history: Vec<Exchange>,
    /// Sticky service.
    pub current_service: Option<String>,
    /// Sticky topic.
    pub current_topic: Option<String>,
}

async fn conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<ConversationResponse> {
    let session_id = SessionKey::new(session_id);
    let context = state.sessions().get_context(&session_id);
    Json(ConversationResponse {
        session_id,
        history: context.history,
        current_service: context.current_service,
        current_topic: context.current_topic,
    })
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn clear_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<MessageResponse> {
    let removed = state.sessions().clear(&SessionKey::new(session_id.as_str()));
    tracing::debug!(session_id = %session_id, removed, "Cleared conversation");
    Json(MessageResponse {
        message: "Conversation cleared successfully!",
    })
}

/// Response body for `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Human-readable status.
    pub status: &'static str,
    /// Server time, RFC 3339.
    pub timestamp: String,
    /// Whether a model backend is configured.
    pub gemini_available: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "All good yaar! 👍",
        timestamp: chrono::Local::now().to_rfc3339(),
        gemini_available: state.gemini_available(),
    })
}

/// Response body for `GET /api/config`.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    /// Whether a Gemini API key is configured.
    pub gemini_configured: bool,
    /// Number of services in the knowledge base.
    pub services_count: usize,
    /// Supported difficulty levels.
    pub question_categories: Vec<&'static str>,
    /// Sessions currently held in memory.
    pub active_sessions: usize,
    /// Generated questions currently cached.
    pub cached_questions: usize,
}

async fn config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        gemini_configured: state.gemini_available(),
        services_count: state.knowledge().len(),
        question_categories: Difficulty::ALL.iter().map(Difficulty::as_str).collect(),
        active_sessions: state.sessions().len(),
        cached_questions: state.questions().cache().total(),
    })
}
