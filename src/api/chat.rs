//! Chat endpoints for typed and recorded input

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::conversation::{Event, Outcome, SkipReason};
use crate::render::{DisplayUnit, render};

/// Largest recording accepted, matching the transcription API upload cap
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Build chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/messages", get(messages))
        .route("/text", post(submit_text))
        .route(
            "/audio",
            post(submit_audio).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        )
        .with_state(state)
}

/// Transcript response
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<DisplayUnit>,
}

/// Render the current transcript
async fn messages(State(state): State<Arc<ApiState>>) -> Json<MessagesResponse> {
    let session = state.session.lock().await;
    Json(MessagesResponse {
        messages: render(session.conversation()),
    })
}

/// Text submission request
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Submission status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStatus {
    Appended,
    Skipped,
}

/// Submission response
///
/// `messages` is absent when the transcript could not be read because
/// another interaction holds the session.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: SubmitStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<DisplayUnit>>,
}

async fn submit_text(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<TextRequest>,
) -> Result<Json<SubmitResponse>, ChatError> {
    submit(&state, Event::Text(request.text)).await
}

/// Accepts the raw recorder output (WAV, `WebM`, Ogg, MP3, ...)
async fn submit_audio(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ChatError> {
    submit(&state, Event::Audio(body.to_vec())).await
}

/// Run one interaction against the shared session
///
/// A submission arriving while another interaction holds the session is
/// skipped as busy. The interaction itself runs in its own task so a client
/// disconnect can't abandon the session mid-update.
async fn submit(state: &ApiState, event: Event) -> Result<Json<SubmitResponse>, ChatError> {
    let Ok(mut guard) = state.session.clone().try_lock_owned() else {
        tracing::debug!("interaction in flight, skipping submission");
        return Ok(Json(SubmitResponse {
            status: SubmitStatus::Skipped,
            reason: Some(SkipReason::Busy),
            messages: None,
        }));
    };

    let orchestrator = state.orchestrator.clone();
    let task = tokio::spawn(async move {
        let session = std::mem::take(&mut *guard);
        let handled = orchestrator.dispatch(session, event).await;
        *guard = handled.session;
        handled
            .outcome
            .map(|outcome| (outcome, render(guard.conversation())))
    });

    let (outcome, messages) = task
        .await
        .map_err(|e| ChatError::Internal(e.to_string()))?
        .map_err(ChatError::Interaction)?;

    let (status, reason) = match outcome {
        Outcome::Appended { .. } => (SubmitStatus::Appended, None),
        Outcome::Skipped(reason) => (SubmitStatus::Skipped, Some(reason)),
    };

    Ok(Json(SubmitResponse {
        status,
        reason,
        messages: Some(messages),
    }))
}

/// Chat API errors
#[derive(Debug)]
pub enum ChatError {
    Interaction(crate::Error),
    Internal(String),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: ErrorBody,
        }

        #[derive(Serialize)]
        struct ErrorBody {
            code: &'static str,
            message: String,
        }

        let (status, code, message) = match self {
            Self::Interaction(e @ crate::Error::Io(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.code(), e.to_string())
            }
            Self::Interaction(e) => (StatusCode::BAD_GATEWAY, e.code(), e.to_string()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };

        (status, Json(ErrorResponse { error: ErrorBody { code, message } })).into_response()
    }
}
