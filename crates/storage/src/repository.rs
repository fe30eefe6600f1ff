use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use lesson_core::model::{AnnotatedLesson, Lesson, LessonId, QuizQuestion};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the ordered lesson metadata collection.
///
/// One record per lesson, quiz content excluded by construction (the
/// `Lesson` type has no quiz fields). Insertion order is creation order;
/// an overwrite keeps the record's original position.
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// List all lessons in file-append order.
    ///
    /// A missing backing store yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` or `StorageError::Serialization` for
    /// other read failures.
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError>;

    /// Append the lesson if its id is unseen, otherwise replace it in
    /// place. The whole collection is rewritten as a unit; there is no
    /// row-level locking, so concurrent upserts race with the later
    /// whole-file write winning.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be written.
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError>;
}

/// Write-only store for narration audio blobs.
///
/// Raw file serving is an external concern; nothing in the core reads
/// audio back.
#[async_trait]
pub trait AudioBlobStore: Send + Sync {
    /// Decode the base64 payload and write it under the sanitized base
    /// name of `filename`, overwriting any existing file. An empty
    /// filename or payload is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for undecodable payloads and
    /// `StorageError::Io` for write failures.
    async fn store_audio(&self, filename: &str, base64_data: &str) -> Result<(), StorageError>;
}

/// Store for per-lesson quiz sidecar files, independent of lesson
/// metadata.
#[async_trait]
pub trait QuizSidecarStore: Send + Sync {
    /// Serialize the ordered question list to the lesson's sidecar.
    /// Callers only invoke this for non-empty lists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the sidecar cannot be written.
    async fn write_quiz(
        &self,
        lesson_id: &LessonId,
        questions: &[QuizQuestion],
    ) -> Result<(), StorageError>;

    /// Read the ordered question list for a lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when no sidecar exists for the
    /// id — distinct from other IO failures.
    async fn read_quiz(&self, lesson_id: &LessonId) -> Result<Vec<QuizQuestion>, StorageError>;

    /// Cheap presence check: existence only, no content read.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if existence cannot be determined.
    async fn exists(&self, lesson_id: &LessonId) -> Result<bool, StorageError>;
}

/// Reduce a client-supplied filename to its final path component.
///
/// Returns `None` for names with no usable base component, so a path like
/// `../../etc/passwd` becomes `passwd` and can never escape the audio
/// directory.
#[must_use]
pub fn sanitized_basename(filename: &str) -> Option<&str> {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
}

pub(crate) fn decode_audio_payload(base64_data: &str) -> Result<Vec<u8>, StorageError> {
    BASE64
        .decode(base64_data.trim())
        .map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Simple in-memory backend for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    lessons: Arc<Mutex<Vec<Lesson>>>,
    audio: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    quizzes: Arc<Mutex<HashMap<LessonId, Vec<QuizQuestion>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err<T>(err: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Io(err.to_string())
}

#[async_trait]
impl LessonRepository for InMemoryRepository {
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        let guard = self.lessons.lock().map_err(lock_err)?;
        Ok(guard.clone())
    }

    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let mut guard = self.lessons.lock().map_err(lock_err)?;
        match guard.iter_mut().find(|existing| existing.id == lesson.id) {
            Some(existing) => *existing = lesson.clone(),
            None => guard.push(lesson.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl AudioBlobStore for InMemoryRepository {
    async fn store_audio(&self, filename: &str, base64_data: &str) -> Result<(), StorageError> {
        if filename.is_empty() || base64_data.is_empty() {
            return Ok(());
        }
        let Some(name) = sanitized_basename(filename) else {
            return Ok(());
        };
        let bytes = decode_audio_payload(base64_data)?;
        let mut guard = self.audio.lock().map_err(lock_err)?;
        guard.insert(name.to_string(), bytes);
        Ok(())
    }
}

#[async_trait]
impl QuizSidecarStore for InMemoryRepository {
    async fn write_quiz(
        &self,
        lesson_id: &LessonId,
        questions: &[QuizQuestion],
    ) -> Result<(), StorageError> {
        let mut guard = self.quizzes.lock().map_err(lock_err)?;
        guard.insert(lesson_id.clone(), questions.to_vec());
        Ok(())
    }

    async fn read_quiz(&self, lesson_id: &LessonId) -> Result<Vec<QuizQuestion>, StorageError> {
        let guard = self.quizzes.lock().map_err(lock_err)?;
        guard.get(lesson_id).cloned().ok_or(StorageError::NotFound)
    }

    async fn exists(&self, lesson_id: &LessonId) -> Result<bool, StorageError> {
        let guard = self.quizzes.lock().map_err(lock_err)?;
        Ok(guard.contains_key(lesson_id))
    }
}

/// Aggregates the three narrow stores behind trait objects so a backend
/// swap touches only this facade's construction.
#[derive(Clone)]
pub struct Storage {
    pub lessons: Arc<dyn LessonRepository>,
    pub audio: Arc<dyn AudioBlobStore>,
    pub quizzes: Arc<dyn QuizSidecarStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let lessons: Arc<dyn LessonRepository> = Arc::new(repo.clone());
        let audio: Arc<dyn AudioBlobStore> = Arc::new(repo.clone());
        let quizzes: Arc<dyn QuizSidecarStore> = Arc::new(repo);
        Self {
            lessons,
            audio,
            quizzes,
        }
    }

    /// List all lessons, each decorated with `has_quiz` from a sidecar
    /// presence check — existence only, so the list read never pays quiz
    /// content cost.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the metadata collection or a presence
    /// check cannot be read.
    pub async fn list_annotated(&self) -> Result<Vec<AnnotatedLesson>, StorageError> {
        let lessons = self.lessons.list_lessons().await?;
        let mut annotated = Vec::with_capacity(lessons.len());
        for lesson in lessons {
            let has_quiz = self.quizzes.exists(&lesson.id).await?;
            annotated.push(AnnotatedLesson { lesson, has_quiz });
        }
        Ok(annotated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::quiz::QuizOption;

    fn build_lesson(id: &str, title: &str) -> Lesson {
        Lesson {
            id: LessonId::new(id),
            title: title.to_string(),
            reading_text: "text".to_string(),
            reading_audio: format!("{id}-reading.mp3"),
            flashcards: vec![],
            review_text: "review".to_string(),
            review_audio: format!("{id}-review.mp3"),
        }
    }

    fn build_question(word: &str) -> QuizQuestion {
        QuizQuestion {
            vocabulary_word: word.to_string(),
            question: format!("What does \"{word}\" mean?"),
            hints: vec![],
            options: vec![QuizOption {
                label: "A".to_string(),
                text: "a fruit".to_string(),
            }],
            correct_option: "A".to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent_and_preserves_position() {
        let repo = InMemoryRepository::new();
        repo.upsert_lesson(&build_lesson("L1", "first")).await.unwrap();
        repo.upsert_lesson(&build_lesson("L2", "second")).await.unwrap();
        repo.upsert_lesson(&build_lesson("L1", "rewritten")).await.unwrap();

        let lessons = repo.list_lessons().await.unwrap();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].id, LessonId::new("L1"));
        assert_eq!(lessons[0].title, "rewritten");
        assert_eq!(lessons[1].id, LessonId::new("L2"));
    }

    #[tokio::test]
    async fn list_annotated_derives_quiz_flags_from_sidecar_presence() {
        let storage = Storage::in_memory();
        storage
            .lessons
            .upsert_lesson(&build_lesson("L1", "with quiz"))
            .await
            .unwrap();
        storage
            .lessons
            .upsert_lesson(&build_lesson("L2", "without quiz"))
            .await
            .unwrap();
        storage
            .quizzes
            .write_quiz(&LessonId::new("L1"), &[build_question("apple")])
            .await
            .unwrap();

        let annotated = storage.list_annotated().await.unwrap();
        assert_eq!(annotated.len(), 2);
        assert!(annotated[0].has_quiz);
        assert!(!annotated[1].has_quiz);
    }

    #[tokio::test]
    async fn missing_sidecar_reads_as_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.read_quiz(&LessonId::new("absent")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[test]
    fn sanitized_basename_strips_directory_components() {
        assert_eq!(sanitized_basename("../../etc/passwd"), Some("passwd"));
        assert_eq!(sanitized_basename("lesson-1-reading.mp3"), Some("lesson-1-reading.mp3"));
        assert_eq!(sanitized_basename("nested/dir/clip.mp3"), Some("clip.mp3"));
        assert_eq!(sanitized_basename(""), None);
        assert_eq!(sanitized_basename("audio/"), Some("audio"));
    }

    #[test]
    fn storage_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Storage>();
        assert_send_sync::<InMemoryRepository>();
    }
}
