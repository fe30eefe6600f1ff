use serde::{Deserialize, Serialize};

use crate::model::ids::LessonId;

/// A single vocabulary item with translation, part of speech, and example
/// usage. Flashcards have no identity of their own; their lifecycle is
/// bound to the owning lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub word: String,
    pub translation: String,
    pub part_of_speech: String,
    pub example_sentence: String,
}

/// Lesson metadata record, one per lesson.
///
/// The struct deliberately has no quiz fields: quiz content lives only in
/// the sidecar store and `hasQuiz` is derived at read time, so the record
/// persisted to disk never grows with quiz size. Unknown fields in an
/// incoming payload (a client echoing `quizQuestions` back, for example)
/// are dropped during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub reading_text: String,
    pub reading_audio: String,
    pub flashcards: Vec<Flashcard>,
    pub review_text: String,
    pub review_audio: String,
}

/// Read-side decoration of a lesson with its derived quiz flag.
///
/// Produced by the storage facade when listing and by the create response;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedLesson {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub has_quiz: bool,
}
