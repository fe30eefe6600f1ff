use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::repository::{AudioBlobStore, LessonRepository, QuizSidecarStore, Storage, StorageError};

mod audio_store;
mod lesson_repo;
mod quiz_store;

/// Filesystem backend: one metadata collection file, one audio directory,
/// and one quiz sidecar directory under a data directory.
///
/// Each path is owned exclusively by its store implementation; nothing
/// else in the workspace touches these files directly.
#[derive(Clone)]
pub struct FsRepository {
    lessons_file: PathBuf,
    audio_dir: PathBuf,
    quizzes_dir: PathBuf,
}

impl FsRepository {
    /// Lay out the backend under `data_dir`. Directories are created
    /// lazily on first write, so opening never fails.
    #[must_use]
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            lessons_file: data_dir.join("lessons.json"),
            audio_dir: data_dir.join("audio"),
            quizzes_dir: data_dir.join("quizzes"),
        }
    }

    pub(crate) fn lessons_file(&self) -> &Path {
        &self.lessons_file
    }

    pub(crate) fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }

    pub(crate) fn quiz_file(&self, lesson_id: &lesson_core::LessonId) -> PathBuf {
        self.quizzes_dir.join(format!("{lesson_id}.json"))
    }
}

pub(crate) fn io_err(err: std::io::Error) -> StorageError {
    StorageError::Io(err.to_string())
}

/// Rewrite `path` as a unit: the content lands in a uniquely named temp
/// file in the target's directory and is renamed over the target, so
/// readers never observe a partial write. Each writer gets its own temp
/// file; concurrent writers race only at the rename, with the later
/// rename winning entirely.
pub(crate) async fn write_file_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let parent = match path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        Some(parent) => {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
            parent
        }
        None => Path::new("."),
    };
    let tmp = tempfile::Builder::new()
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(io_err)?;
    tokio::fs::write(tmp.path(), contents).await.map_err(io_err)?;
    tmp.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}

impl Storage {
    /// Build a `Storage` backed by the filesystem layout under `data_dir`.
    #[must_use]
    pub fn fs(data_dir: impl AsRef<Path>) -> Self {
        let repo = FsRepository::open(data_dir);
        let lessons: Arc<dyn LessonRepository> = Arc::new(repo.clone());
        let audio: Arc<dyn AudioBlobStore> = Arc::new(repo.clone());
        let quizzes: Arc<dyn QuizSidecarStore> = Arc::new(repo);
        Self {
            lessons,
            audio,
            quizzes,
        }
    }
}
