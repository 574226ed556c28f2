//! HTTP endpoint handlers. These are thin wrappers that look up the session and
//! forward to the quiz transitions. Each handler is instrumented.

use std::sync::Arc;
use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::errors::QuizError;
use crate::protocol::*;
use crate::state::{AppState, SessionHandle};

/// Handler failure: either a quiz error or an unknown session id.
#[derive(Debug)]
pub enum ApiError {
  Quiz(QuizError),
  UnknownSession(String),
}

impl From<QuizError> for ApiError {
  fn from(e: QuizError) -> Self { ApiError::Quiz(e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Quiz(e) => {
        let status = match &e {
          QuizError::InvalidInput(_) => StatusCode::BAD_REQUEST,
          QuizError::Gateway(_) | QuizError::Parse(_) => StatusCode::BAD_GATEWAY,
          QuizError::PreconditionViolation(_) => StatusCode::CONFLICT,
        };
        (status, Json(ErrorOut::from(&e))).into_response()
      }
      ApiError::UnknownSession(id) => {
        let body = ErrorOut { kind: "unknown_session", message: format!("Unknown sessionId: {id}"), raw: None };
        (StatusCode::NOT_FOUND, Json(body)).into_response()
      }
    }
  }
}

async fn lookup(state: &AppState, id: &str) -> Result<SessionHandle, ApiError> {
  state.session(id).await.ok_or_else(|| ApiError::UnknownSession(id.to_string()))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let (session_id, handle) = state.create_session().await;
  let session = to_out(&*handle.lock().await);
  (StatusCode::CREATED, Json(CreateSessionOut { session_id, session }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionOut>, ApiError> {
  let handle = lookup(&state, &id).await?;
  let session = handle.lock().await;
  Ok(Json(to_out(&session)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  if state.remove_session(&id).await {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::UnknownSession(id))
  }
}

#[instrument(level = "info", skip(state, body), fields(topic_len = body.topic.len()))]
pub async fn http_generate(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<GenerateIn>,
) -> Result<Json<SessionOut>, ApiError> {
  let handle = lookup(&state, &id).await?;
  let mut session = handle.lock().await;
  session.start_generation(&body.topic, state.gateway.as_ref(), &state.prompts).await?;
  info!(target: "quiz", session_id = %id, "HTTP quiz generated");
  Ok(Json(to_out(&session)))
}

#[instrument(level = "info", skip(state, body), fields(index = body.index))]
pub async fn http_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<SessionOut>, ApiError> {
  let handle = lookup(&state, &id).await?;
  let mut session = handle.lock().await;
  session.record_answer(body.index, &body.choice)?;
  Ok(Json(to_out(&session)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_submit(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionOut>, ApiError> {
  let handle = lookup(&state, &id).await?;
  let mut session = handle.lock().await;
  session.submit()?;
  info!(target: "quiz", session_id = %id, "HTTP quiz graded");
  Ok(Json(to_out(&session)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_reset(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionOut>, ApiError> {
  let handle = lookup(&state, &id).await?;
  let mut session = handle.lock().await;
  session.reset();
  Ok(Json(to_out(&session)))
}
