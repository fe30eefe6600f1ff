use async_trait::async_trait;

use crate::fs::{FsRepository, io_err};
use crate::repository::{AudioBlobStore, StorageError, decode_audio_payload, sanitized_basename};

#[async_trait]
impl AudioBlobStore for FsRepository {
    async fn store_audio(&self, filename: &str, base64_data: &str) -> Result<(), StorageError> {
        if filename.is_empty() || base64_data.is_empty() {
            return Ok(());
        }
        // Directory components are discarded so a hostile filename can
        // never write outside the audio directory.
        let Some(name) = sanitized_basename(filename) else {
            return Ok(());
        };
        let bytes = decode_audio_payload(base64_data)?;
        tokio::fs::create_dir_all(self.audio_dir())
            .await
            .map_err(io_err)?;
        tokio::fs::write(self.audio_dir().join(name), bytes)
            .await
            .map_err(io_err)
    }
}
