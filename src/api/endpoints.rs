//! API endpoint handlers
//!
//! This module implements the HTTP endpoints of the relay: the question
//! handler, plus service info and health checks.

use crate::core::config::Config;
use crate::core::constants::{message, route};
use crate::core::provider::{Provider, ProviderError};
use crate::models::gemini::GenerateContentRequest;
use crate::models::relay::{AskRequest, AskResponse, ErrorResponse};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn Provider>,
}

/// Every way a relay invocation can end other than with an answer
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("method {0} is not allowed")]
    MethodNotAllowed(Method),

    #[error("no question provided")]
    BadRequest,

    #[error("GEMINI_API_KEY is not configured")]
    ServerMisconfigured,

    #[error("The AI service returned an error: {0}")]
    Upstream(String),

    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::BadRequest => StatusCode::BAD_REQUEST,
            RelayError::ServerMisconfigured
            | RelayError::Upstream(_)
            | RelayError::InvalidBody(_)
            | RelayError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller; internal detail stays in the logs
    fn public_message(&self) -> String {
        match self {
            RelayError::MethodNotAllowed(_) => message::METHOD_NOT_ALLOWED.to_string(),
            RelayError::BadRequest => message::NO_QUESTION.to_string(),
            RelayError::ServerMisconfigured => message::MISSING_API_KEY.to_string(),
            RelayError::Upstream(_) => self.to_string(),
            RelayError::InvalidBody(_) | RelayError::Provider(_) => message::UNEXPECTED.to_string(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::MethodNotAllowed(_) | RelayError::BadRequest => {
                warn!("Rejected request: {}", self)
            }
            RelayError::ServerMisconfigured => {
                error!("CRITICAL: {}; every question will fail until it is set", self)
            }
            RelayError::Upstream(_) => error!("Gemini API returned an error: {}", self),
            RelayError::InvalidBody(_) | RelayError::Provider(_) => {
                error!("A critical error occurred while relaying: {}", self)
            }
        }

        let status = self.status_code();
        if let RelayError::MethodNotAllowed(_) = self {
            return (status, self.public_message()).into_response();
        }
        (status, Json(ErrorResponse::new(self.public_message()))).into_response()
    }
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(route::ROOT, get(root))
        .route(route::ASK, post(ask).fallback(method_not_allowed))
        .route(route::HEALTH, get(health_check))
        .fallback(not_found)
        .with_state(state)
}

/// POST /ask - Relay a question to Gemini
async fn ask(State(state): State<AppState>, body: Bytes) -> Result<Json<AskResponse>, RelayError> {
    let request_id = uuid::Uuid::new_v4();
    relay_question(&state, &body)
        .instrument(info_span!("ask", %request_id))
        .await
        .map(Json)
}

/// Validate the inbound body, make the single upstream call and shape the answer
async fn relay_question(state: &AppState, body: &[u8]) -> Result<AskResponse, RelayError> {
    let request: AskRequest = serde_json::from_slice(body)?;

    // Credential is checked before the question
    let api_key = state.config.api_key().ok_or(RelayError::ServerMisconfigured)?;
    let question = request.question().ok_or(RelayError::BadRequest)?;

    info!(
        "📥 Relaying question to {} ({} chars)",
        state.provider.provider_name(),
        question.len()
    );

    let gemini_request = GenerateContentRequest::from_question(question);
    let response = state
        .provider
        .generate_content(api_key, &gemini_request)
        .await?;

    if let Some(usage) = response.usage_metadata.as_ref() {
        debug!(
            "Token usage: prompt={}, candidates={}, total={}",
            usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
        );
    }

    if let Some(api_error) = response.reported_error() {
        debug!(code = ?api_error.code(), status = ?api_error.status(), "Upstream error payload");
        return Err(RelayError::Upstream(
            api_error
                .message_or(message::UNKNOWN_UPSTREAM_ERROR)
                .to_string(),
        ));
    }

    let answer = match response.answer_text() {
        Some(text) => text.to_string(),
        None => {
            warn!(
                finish_reason = ?response.finish_reason(),
                "Gemini response had no answer text; using fallback"
            );
            message::FALLBACK_ANSWER.to_string()
        }
    };

    info!("📤 Answer relayed ({} chars)", answer.len());
    Ok(AskResponse { answer })
}

/// Any non-POST method on /ask
async fn method_not_allowed(method: Method) -> RelayError {
    RelayError::MethodNotAllowed(method)
}

/// GET / - Root endpoint
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": "Gemini Question Relay v0.1.0",
        "status": "running",
        "config": {
            "provider": state.provider.provider_name(),
            "model": state.config.gemini_model,
            "base_url": state.config.gemini_base_url,
            "api_key_configured": state.config.has_api_key(),
        },
        "endpoints": {
            "ask": route::ASK,
            "health": route::HEALTH,
        },
    }))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "api_key_configured": state.config.has_api_key(),
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(message::NOT_FOUND)),
    )
}
