use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use lesson_core::model::{Lesson, LessonId, QuizQuestion};

/// Errors surfaced by the lesson API transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    #[error("request failed with status {0}")]
    HttpStatus(u16),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Result of one quiz fetch, with the "no quiz" 404 separated from real
/// failures — absence is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizFetchOutcome {
    Questions(Vec<QuizQuestion>),
    Missing,
    Failed(String),
}

/// One audio blob ready for upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioUpload {
    pub filename: String,
    pub data: String,
}

/// Body of the lesson create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonPayload {
    pub lesson: Lesson,
    pub reading_audio: AudioUpload,
    pub review_audio: AudioUpload,
    pub quiz_questions: Vec<QuizQuestion>,
}

/// Transport seam for the lesson API.
///
/// Raw `Value` payloads cross this boundary so the typed decode step (and
/// its malformation reporting) stays in one place on the caller's side.
#[async_trait]
pub trait LessonTransport: Send + Sync {
    /// Fetch the lesson list payload.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` for non-success statuses or transport
    /// failures.
    async fn fetch_lessons(&self) -> Result<Value, ClientError>;

    /// Fetch a lesson's quiz payload. `Ok(None)` means HTTP 404: the
    /// lesson has no quiz sidecar.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` for other non-success statuses or transport
    /// failures.
    async fn fetch_quiz(&self, lesson_id: &LessonId) -> Result<Option<Value>, ClientError>;

    /// Submit a lesson create request and return the response payload.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` for non-success statuses or transport
    /// failures.
    async fn create_lesson(&self, payload: &CreateLessonPayload) -> Result<Value, ClientError>;
}

fn transport_err(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Transport("request timed out".to_string())
    } else {
        ClientError::Transport(err.to_string())
    }
}

/// reqwest-backed transport with a bounded per-request timeout; expiry
/// surfaces as a transport error and flows into the `Errored` path.
pub struct HttpLessonTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLessonTransport {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Build a transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the underlying client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    /// Build a transport with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the underlying client cannot
    /// be constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport_err)?;
        let mut base_url: String = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    async fn get_json(&self, url: String) -> Result<reqwest::Response, ClientError> {
        self.client.get(url).send().await.map_err(transport_err)
    }
}

#[async_trait]
impl LessonTransport for HttpLessonTransport {
    async fn fetch_lessons(&self) -> Result<Value, ClientError> {
        let response = self.get_json(format!("{}/api/lessons", self.base_url)).await?;
        if !response.status().is_success() {
            return Err(ClientError::HttpStatus(response.status().as_u16()));
        }
        response.json().await.map_err(transport_err)
    }

    async fn fetch_quiz(&self, lesson_id: &LessonId) -> Result<Option<Value>, ClientError> {
        let response = self
            .get_json(format!("{}/api/lessons/{lesson_id}/quiz", self.base_url))
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ClientError::HttpStatus(response.status().as_u16()));
        }
        Ok(Some(response.json().await.map_err(transport_err)?))
    }

    async fn create_lesson(&self, payload: &CreateLessonPayload) -> Result<Value, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/lessons", self.base_url))
            .json(payload)
            .send()
            .await
            .map_err(transport_err)?;
        if !response.status().is_success() {
            return Err(ClientError::HttpStatus(response.status().as_u16()));
        }
        response.json().await.map_err(transport_err)
    }
}
