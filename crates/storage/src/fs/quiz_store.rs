use async_trait::async_trait;
use lesson_core::model::{LessonId, QuizQuestion};

use crate::fs::{FsRepository, io_err, write_file_atomic};
use crate::repository::{QuizSidecarStore, StorageError};

#[async_trait]
impl QuizSidecarStore for FsRepository {
    async fn write_quiz(
        &self,
        lesson_id: &LessonId,
        questions: &[QuizQuestion],
    ) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(questions)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        write_file_atomic(&self.quiz_file(lesson_id), &json).await
    }

    async fn read_quiz(&self, lesson_id: &LessonId) -> Result<Vec<QuizQuestion>, StorageError> {
        let content = match tokio::fs::read_to_string(self.quiz_file(lesson_id)).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound);
            }
            Err(err) => return Err(io_err(err)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn exists(&self, lesson_id: &LessonId) -> Result<bool, StorageError> {
        tokio::fs::try_exists(self.quiz_file(lesson_id))
            .await
            .map_err(io_err)
    }
}
