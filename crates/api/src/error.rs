//! Mapping of engine errors onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use engine::EngineError;
use serde_json::json;
use thiserror::Error;

/// An error response: status code plus a JSON body with the message and,
/// for blocked advances, the validation failures.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub failures: Vec<String>,
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let status = match &err {
            EngineError::AdvanceBlocked { .. }
            | EngineError::NoNextStep { .. }
            | EngineError::CommandUnavailable { .. } => StatusCode::CONFLICT,
            EngineError::RankedNodeNotFound { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::Dispatch(_) => StatusCode::BAD_GATEWAY,
            EngineError::EmptyTutorial
            | EngineError::UnsatisfiableValidator { .. }
            | EngineError::Script(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let failures = match &err {
            EngineError::AdvanceBlocked { failures, .. } => failures.clone(),
            _ => Vec::new(),
        };
        Self { status, message: err.to_string(), failures }
    }
}

/// A request body that is not a valid command keeps axum's status code
/// (400, 415 or 422) but uses the same JSON body as every other error.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
            failures: Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.message, "failures": self.failures });
        (self.status, Json(body)).into_response()
    }
}
