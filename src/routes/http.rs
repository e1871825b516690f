//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs the session id and basic result info.

use std::sync::Arc;
use axum::{
  extract::{Path, Request, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, info, instrument, warn};

use crate::assets::is_image_file;
use crate::error::{TransitionError, ValidationWarning};
use crate::logic::{outcome, render, transition, Action, Outcome};
use crate::protocol::*;
use crate::state::AppState;

/// Errors surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
  UnknownSession(String),
  Transition(TransitionError),
  Rejected { warning: ValidationWarning, view: ViewOut },
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match self {
      ApiError::UnknownSession(id) => (
        StatusCode::NOT_FOUND,
        ErrorOut { error: "unknown_session", message: format!("Unknown session: {}", id), view: None },
      ),
      ApiError::Transition(e) => (
        StatusCode::CONFLICT,
        ErrorOut { error: "invalid_transition", message: e.to_string(), view: None },
      ),
      ApiError::Rejected { warning, view } => (
        StatusCode::UNPROCESSABLE_ENTITY,
        ErrorOut { error: "validation", message: warning.to_string(), view: Some(view) },
      ),
    };
    (status, Json(body)).into_response()
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, questions: state.total() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_create_session(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
  let session_id = state.create_session().await;
  let session = state
    .snapshot(&session_id)
    .await
    .ok_or_else(|| ApiError::UnknownSession(session_id.clone()))?;
  let view = render(&state, &session);
  info!(target: "quiz", session = %session_id, "HTTP session created");
  Ok((StatusCode::CREATED, Json(SessionOut { session_id, view })))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionOut>, ApiError> {
  let session = state
    .snapshot(&id)
    .await
    .ok_or_else(|| ApiError::UnknownSession(id.clone()))?;
  Ok(Json(SessionOut { session_id: id, view: render(&state, &session) }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  if state.end_session(&id).await {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::UnknownSession(id))
  }
}

#[instrument(level = "info", skip(state, body), fields(username_len = body.username.len()))]
pub async fn http_post_start(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<StartIn>,
) -> Result<Json<SessionOut>, ApiError> {
  run_action(&state, id, Action::Start { username: body.username }).await
}

#[instrument(level = "info", skip(state, body), fields(has_answer = body.answer.is_some()))]
pub async fn http_post_submit(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<SubmitIn>,
) -> Result<Json<SessionOut>, ApiError> {
  run_action(&state, id, Action::Submit { answer: body.answer }).await
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_restart(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionOut>, ApiError> {
  run_action(&state, id, Action::Restart).await
}

/// The transition runs under the store lock; the view (which checks image files)
/// is rendered from a copy after the lock is released.
async fn run_action(state: &AppState, id: String, action: Action) -> Result<Json<SessionOut>, ApiError> {
  let (warning, session) = state
    .with_session(&id, |s| transition(state, s, action).map(|w| (w, s.clone())))
    .await
    .ok_or_else(|| ApiError::UnknownSession(id.clone()))?
    .map_err(|e| {
      warn!(target: "quiz", session = %id, error = %e, "HTTP action refused");
      ApiError::Transition(e)
    })?;

  match outcome(state, &session, warning) {
    Outcome::Moved(view) => Ok(Json(SessionOut { session_id: id, view })),
    Outcome::Rejected { warning, view } => {
      debug!(target: "quiz", session = %id, %warning, "HTTP submission rejected");
      Err(ApiError::Rejected { warning, view })
    }
  }
}

/// Serve an image from the asset directory. Anything else is a 404.
#[instrument(level = "debug", skip(state, req))]
pub async fn http_get_asset(
  State(state): State<Arc<AppState>>,
  Path(name): Path<String>,
  req: Request,
) -> Response {
  if !is_image_file(&name) || !state.assets.exists(&name) {
    return StatusCode::NOT_FOUND.into_response();
  }
  let path = state.assets.base_dir().join(&name);
  match ServeFile::new(path).oneshot(req).await {
    Ok(res) => res.into_response(),
    Err(never) => match never {},
  }
}
