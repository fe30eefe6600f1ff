use serde::{Deserialize, Serialize};

use lesson_core::model::{AnnotatedLesson, Lesson, QuizQuestion};

/// One uploaded audio blob: a client-chosen filename plus base64 bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioUpload {
    pub filename: String,
    #[serde(default)]
    pub data: String,
}

/// Body of `POST /api/lessons`.
///
/// `lesson` deserializes into the quiz-free metadata record, so any quiz
/// fields a client leaves inside it are stripped before persistence.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonRequest {
    pub lesson: Lesson,
    pub reading_audio: Option<AudioUpload>,
    pub review_audio: Option<AudioUpload>,
    #[serde(default)]
    pub quiz_questions: Vec<QuizQuestion>,
}

/// Body of `GET /api/lessons`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LessonsResponse {
    pub lessons: Vec<AnnotatedLesson>,
}

/// Body of `GET /api/lessons/{id}/quiz`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub quiz_questions: Vec<QuizQuestion>,
}

/// Body of a successful `POST /api/lessons`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LessonSavedResponse {
    pub lesson: AnnotatedLesson,
}
