use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by the lesson API, mapped onto the HTTP taxonomy:
/// validation → 400, absent quiz sidecar → 404, storage failures → 500.
/// 405 is produced by the router's method fallback, not by handlers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("no quiz for this lesson")]
    QuizNotFound,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": message })),
            )
                .into_response(),
            // Absence of a quiz is a normal outcome for the caller: the
            // 404 carries an empty question list, not an error message.
            ApiError::QuizNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "quizQuestions": [] })),
            )
                .into_response(),
            ApiError::Storage(err) => {
                log::error!("storage failure: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "unexpected storage failure" })),
                )
                    .into_response()
            }
        }
    }
}
