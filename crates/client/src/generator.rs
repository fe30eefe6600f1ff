use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lesson_core::model::{Flashcard, QuizQuestion};

/// Errors emitted by the generative content service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeneratorError {
    #[error("content generation is not configured")]
    Disabled,

    #[error("content generation returned an empty response")]
    EmptyResponse,

    #[error("content generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("content generation returned malformed JSON: {0}")]
    Malformed(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// External collaborator that turns a vocabulary list into flashcards and
/// quiz questions. Both lists are independent; a remote failure or
/// malformed output fails the whole authoring step — no partial save.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate the ordered flashcard list for a vocabulary string.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError` for remote failures or malformed output.
    async fn generate_flashcards(&self, vocabulary: &str) -> Result<Vec<Flashcard>, GeneratorError>;

    /// Generate the ordered quiz question list for a vocabulary string.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError` for remote failures or malformed output.
    async fn generate_quiz_questions(
        &self,
        vocabulary: &str,
    ) -> Result<Vec<QuizQuestion>, GeneratorError>;
}

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GeneratorConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("LESSON_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("LESSON_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("LESSON_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Chat-completions backed generator, disabled when unconfigured.
#[derive(Clone)]
pub struct ChatContentGenerator {
    client: Client,
    config: Option<GeneratorConfig>,
}

impl ChatContentGenerator {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GeneratorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GeneratorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn complete(&self, prompt: String) -> Result<String, GeneratorError> {
        let config = self.config.as_ref().ok_or(GeneratorError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeneratorError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GeneratorError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

/// Parse a JSON array out of a model reply, tolerating a Markdown code
/// fence around it but nothing else.
fn parse_list<T: DeserializeOwned>(reply: &str) -> Result<Vec<T>, GeneratorError> {
    let trimmed = reply
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    if trimmed.is_empty() {
        return Err(GeneratorError::EmptyResponse);
    }
    serde_json::from_str(trimmed).map_err(|err| GeneratorError::Malformed(err.to_string()))
}

#[async_trait]
impl ContentGenerator for ChatContentGenerator {
    async fn generate_flashcards(
        &self,
        vocabulary: &str,
    ) -> Result<Vec<Flashcard>, GeneratorError> {
        let prompt = format!(
            "For each vocabulary word in the list below, produce one flashcard. \
             Reply with a JSON array only, no prose. Each element must have the keys \
             \"word\", \"translation\", \"partOfSpeech\", and \"exampleSentence\".\n\n\
             Vocabulary: {vocabulary}"
        );
        let reply = self.complete(prompt).await?;
        parse_list(&reply)
    }

    async fn generate_quiz_questions(
        &self,
        vocabulary: &str,
    ) -> Result<Vec<QuizQuestion>, GeneratorError> {
        let prompt = format!(
            "For each vocabulary word in the list below, produce one multiple-choice \
             question testing its meaning. Reply with a JSON array only, no prose. Each \
             element must have the keys \"vocabularyWord\", \"question\", \"hints\" \
             (array of strings), \"options\" (array of {{\"label\", \"text\"}} with \
             unique labels), and \"correctOption\" (one of the labels).\n\n\
             Vocabulary: {vocabulary}"
        );
        let reply = self.complete(prompt).await?;
        parse_list(&reply)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
