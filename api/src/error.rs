use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use aegis_core::error::codes;

/// Structured error response, mirroring the shape the HTTP surface commits
/// to in the crate's design notes: machine-readable `error` code, a
/// human-readable `message`, and a `request_id` an operator can correlate
/// against logs.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub request_id: String,
}

/// Boundary errors only. `aegis-core` never fails on well-formed input, so
/// everything here is either malformed-request rejection or a collaborator
/// (job queue / task store / webhook) failure.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::new_v4().to_string();

        let (status, code, message) = match self {
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, codes::VALIDATION_FAILED, message)
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, codes::NOT_FOUND, message),
            AppError::Internal(message) => {
                tracing::error!(%message, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    codes::INTERNAL_ERROR,
                    "an internal error occurred".to_string(),
                )
            }
        };

        (
            status,
            Json(ApiError {
                error: code.to_string(),
                message,
                request_id,
            }),
        )
            .into_response()
    }
}
