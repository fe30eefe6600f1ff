use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use lesson_core::model::{AnnotatedLesson, LessonId};
use lesson_core::validate_questions;
use storage::repository::{Storage, StorageError};

use crate::dto::{CreateLessonRequest, LessonSavedResponse, LessonsResponse, QuizResponse};
use crate::error::ApiError;

/// Shared state for the lesson routes: the storage facade is the only
/// thing handlers touch.
#[derive(Clone)]
pub struct AppState {
    storage: Storage,
}

impl AppState {
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

/// Build the lesson API router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/lessons", get(list_lessons).post(create_lesson))
        .route("/api/lessons/{id}/quiz", get(get_quiz))
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

async fn list_lessons(State(state): State<AppState>) -> Result<Json<LessonsResponse>, ApiError> {
    let lessons = state.storage.list_annotated().await?;
    Ok(Json(LessonsResponse { lessons }))
}

async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuizResponse>, ApiError> {
    let lesson_id = LessonId::new(id);
    match state.storage.quizzes.read_quiz(&lesson_id).await {
        Ok(quiz_questions) => Ok(Json(QuizResponse { quiz_questions })),
        Err(StorageError::NotFound) => Err(ApiError::QuizNotFound),
        Err(err) => Err(ApiError::Storage(err)),
    }
}

async fn create_lesson(
    State(state): State<AppState>,
    Json(request): Json<CreateLessonRequest>,
) -> Result<Json<LessonSavedResponse>, ApiError> {
    if request.lesson.id.is_blank() {
        return Err(ApiError::Validation("lesson id is missing".to_string()));
    }
    // The id doubles as the sidecar filename stem, so a separator would
    // let the sidecar escape the quizzes directory.
    if request.lesson.id.as_str().contains(['/', '\\']) {
        return Err(ApiError::Validation(
            "lesson id must not contain path separators".to_string(),
        ));
    }
    validate_questions(&request.quiz_questions)
        .map_err(|err| ApiError::Validation(err.to_string()))?;

    // Audio blobs are written first and independently: a failed write is
    // logged and the request continues, matching the no-rollback creation
    // ordering. Partial creation is a documented outcome.
    for upload in [&request.reading_audio, &request.review_audio]
        .into_iter()
        .flatten()
    {
        if let Err(err) = state
            .storage
            .audio
            .store_audio(&upload.filename, &upload.data)
            .await
        {
            log::warn!(
                "audio write for {:?} (lesson {}) failed: {err}",
                upload.filename,
                request.lesson.id
            );
        }
    }

    state.storage.lessons.upsert_lesson(&request.lesson).await?;

    let has_quiz = !request.quiz_questions.is_empty();
    if has_quiz {
        state
            .storage
            .quizzes
            .write_quiz(&request.lesson.id, &request.quiz_questions)
            .await?;
    }

    log::info!(
        "saved lesson {} ({} flashcards, quiz: {has_quiz})",
        request.lesson.id,
        request.lesson.flashcards.len()
    );

    Ok(Json(LessonSavedResponse {
        lesson: AnnotatedLesson {
            lesson: request.lesson,
            has_quiz,
        },
    }))
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "message": "Method Not Allowed" })),
    )
}
