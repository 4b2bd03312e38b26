//! HTTP handlers for the session registry API.
//!
//! Handlers are thin: decode, call the store, encode. All error
//! classification lives in [`StoreError`] and its `IntoResponse` impl.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::errors::StoreError;
use crate::session::{NewSession, SessionId, SessionPatch, SessionRecord};
use crate::AppState;

/// `POST /sessions` — register a new session.
///
/// Expects a JSON body with `host`, `port`, and `options` (a supplied `id`
/// is discarded). Responds 201 with the stored record, including the
/// assigned id.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(candidate): Json<NewSession>,
) -> Result<Response, StoreError> {
    let record = state.store.create(candidate)?;
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

/// `GET /sessions/{id}` — fetch a single session record.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<SessionRecord>, StoreError> {
    let id: SessionId = raw_id.parse()?;
    Ok(Json(state.store.find(&id)?))
}

/// `GET /sessions` — fetch every decodable session record as a JSON array.
///
/// Undecodable records are skipped by the store, so this endpoint stays
/// available even with corrupt files in the store directory.
pub async fn get_all_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SessionRecord>>, StoreError> {
    Ok(Json(state.store.find_all()?))
}

/// `GET /sessions/all` — fetch the ids of every ongoing session.
///
/// Example response: `{"sessions":["ABC123","ABC124"]}`.
pub async fn list_session_ids(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, StoreError> {
    let ids = state.store.list()?;
    Ok(Json(json!({ "sessions": ids })))
}

/// `PATCH /sessions/{id}` — merge-update a session's leader address.
///
/// A present `host` and a non-zero `port` in the body overwrite the stored
/// values; absent/zero fields are left unchanged. Responds 204 on success.
pub async fn update_session(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    Json(patch): Json<SessionPatch>,
) -> Result<StatusCode, StoreError> {
    let id: SessionId = raw_id.parse()?;
    state.store.update(&id, patch)?;
    Ok(StatusCode::NO_CONTENT)
}
