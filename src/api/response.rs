//! Error-to-HTTP mapping.
//!
//! | Error                          | Status |
//! |--------------------------------|--------|
//! | `Validation`, `Conflict`       | 400    |
//! | `NotFound`, `UnknownEndpoint`  | 404    |
//! | `MethodNotAllowed`             | 405    |
//! | everything else                | 500    |
//!
//! Every error body is a JSON object with an `error` field. Conflicts also carry
//! the number of rows that blocked the delete in `references`.

use crate::errors::Error;
use crate::models::ApiMessage;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, error};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    references: Option<u64>,
}

impl Error {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Conflict { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::UnknownEndpoint => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            debug!(%status, "Request rejected: {self}");
        }

        let references = match &self {
            Self::Conflict { references, .. } => Some(*references),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            references,
        };
        (status, Json(body)).into_response()
    }
}

/// `200 OK` with a JSON body.
pub fn ok<T: Serialize>(value: T) -> Response {
    (StatusCode::OK, Json(value)).into_response()
}

/// `201 Created` with `{message, id}`.
pub fn created(message: &str, id: i64) -> Response {
    (StatusCode::CREATED, Json(ApiMessage::created(message, id))).into_response()
}

/// `200 OK` with `{message}`.
pub fn message(message: &str) -> Response {
    ok(ApiMessage::new(message))
}
