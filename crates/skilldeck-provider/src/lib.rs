//! `SkillDeck` Provider
//!
//! Talks to an OpenAI-compatible chat completion endpoint and runs the
//! per-skill "test drive" chat sessions on top of it.

pub mod error;
pub mod format;
pub mod prompt;
pub mod session;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skilldeck_types::ChatMessage;
use tracing::{debug, info, warn};

pub use error::{CompletionError, Result};
pub use format::{render, Line, Span};
pub use session::{PendingReply, RequestToken, SessionState, TestDriveSession};

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Anything that can turn a transcript into the next assistant reply
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Completion endpoint settings
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    /// Bearer credential. `None` (or empty) puts sessions in degraded mode.
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CompletionSettings {
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: base_url.into(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Completion client for OpenAI-compatible `/chat/completions` endpoints
pub struct CompletionService {
    client: reqwest::Client,
    settings: CompletionSettings,
}

impl CompletionService {
    /// Create a new completion service
    pub fn new(settings: CompletionSettings) -> Self {
        info!(
            "Completion service initialized with model {} at {} (credential: {})",
            settings.model,
            settings.base_url,
            if settings.credential().is_some() { "set" } else { "missing" }
        );
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.settings.credential().is_some()
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }
}

#[async_trait]
impl CompletionBackend for CompletionService {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let Some(api_key) = self.settings.credential() else {
            warn!("Completion requested without an API key, skipping network call");
            return Err(CompletionError::MissingCredential);
        };

        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        let request = CompletionRequest {
            model: &self.settings.model,
            messages,
        };

        debug!(
            model = %self.settings.model,
            messages = messages.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Completion endpoint returned an error");
            return Err(CompletionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;
        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        match parsed.choices.into_iter().next() {
            Some(choice) => Ok(choice.message.content.unwrap_or_default()),
            None => {
                warn!("Completion endpoint returned no choices");
                Err(CompletionError::EmptyResponse)
            }
        }
    }
}
