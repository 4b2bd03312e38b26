//! Error classification for the session store.
//!
//! Every store operation surfaces one of these variants; the enum implements
//! [`axum::response::IntoResponse`] so handlers can simply return
//! `Err(StoreError::NotFound { .. })` and get a JSON error body with the
//! right status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::session::{InvalidSessionId, SessionId};

/// Errors raised by the session store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was missing, empty, or zero on create.
    #[error("invalid session metadata: {0}")]
    InvalidInput(String),

    /// A requested identifier is not a well-formed session id.
    #[error(transparent)]
    InvalidId(#[from] InvalidSessionId),

    /// No session file exists for the requested id.
    #[error("session {id} not found")]
    NotFound { id: SessionId },

    /// The store directory or a session file could not be opened, read,
    /// or written.
    #[error("session storage i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// A session file is not a well-formed, fully-specified record.
    #[error("session record could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// Short machine-readable error code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidInput(_) => "InvalidInput",
            StoreError::InvalidId(_) => "NotFound",
            StoreError::NotFound { .. } => "NotFound",
            StoreError::Io(_) => "IOFailure",
            StoreError::Decode(_) => "DecodeFailure",
        }
    }

    /// HTTP status code this error maps to.
    ///
    /// A malformed id maps to 404 rather than 400: the router in the
    /// original service matched ids by regex in the path, so a bad id never
    /// reached a handler at all.
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            StoreError::InvalidId(_) => StatusCode::NOT_FOUND,
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal detail (paths, serde messages) stays in the logs; the
        // body carries only the classification and a short description.
        let message = match &self {
            StoreError::Io(_) => "session storage i/o failure".to_string(),
            StoreError::Decode(_) => "session record could not be decoded".to_string(),
            other => other.to_string(),
        };
        let body = Json(json!({
            "code": self.code(),
            "error": message,
        }));
        (status, body).into_response()
    }
}
