use async_trait::async_trait;
use lesson_core::model::Lesson;

use crate::fs::{FsRepository, io_err, write_file_atomic};
use crate::repository::{LessonRepository, StorageError};

impl FsRepository {
    async fn load_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        let content = match tokio::fs::read_to_string(self.lessons_file()).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_err(err)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

#[async_trait]
impl LessonRepository for FsRepository {
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        self.load_lessons().await
    }

    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let mut lessons = self.load_lessons().await?;
        match lessons.iter_mut().find(|existing| existing.id == lesson.id) {
            Some(existing) => *existing = lesson.clone(),
            None => lessons.push(lesson.clone()),
        }
        let json = serde_json::to_vec_pretty(&lessons)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        write_file_atomic(self.lessons_file(), &json).await
    }
}
