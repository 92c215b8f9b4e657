//! Reasoning-service client.
//!
//! The assistant talks to the model through [`ChatModel`]; [`GroqClient`] is
//! the production implementation against Groq's OpenAI-compatible chat
//! completions endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::BotConfig;
use crate::error::{CoreError, Result};

/// A message in the chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: String,
    /// Text content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Something that turns a conversation into a reply text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the text of the model's reply.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;
}

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

/// Chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<Usage>,
}

/// A completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

/// Message of a completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, empty if there is none.
    pub fn text(&self) -> String {
        self.choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default()
    }
}

/// Groq chat completions client.
#[derive(Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

impl GroqClient {
    /// Creates a client from the bot configuration.
    ///
    /// # Errors
    /// Returns an error if no API key is configured.
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let api_key = config.require_groq_api_key()?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            api_url: config.groq_api_url.clone(),
            model: config.groq_model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        })
    }

    /// Model identifier used for requests.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat completion request.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<ChatResponse> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
        };

        trace!("Sending chat request: {:?}", request);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CoreError::ModelRequest(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CoreError::ModelRequest(format!(
                "Groq API error {}: {}",
                status, text
            )));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CoreError::ModelResponse(format!("Failed to parse response: {}", e)))?;

        debug!(
            "Chat response received: {} tokens used",
            response.usage.as_ref().map_or(0, |u| u.total_tokens)
        );

        Ok(response)
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        Ok(self.chat(messages).await?.text())
    }
}
