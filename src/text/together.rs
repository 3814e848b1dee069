//! Together AI chat completion generator.

use crate::client::TogetherClient;
use crate::error::{GenChatError, Result};
use crate::text::generator::TextGenerator;
use crate::text::wrap::{fill, DEFAULT_WRAP_WIDTH};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default chat completion model.
pub const DEFAULT_TEXT_MODEL: &str = "meta-llama/Meta-Llama-3-8B-Instruct-Lite";

/// Chat message sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker role ("user", "assistant" or "system").
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Builder for TogetherTextGenerator.
#[derive(Debug, Clone)]
pub struct TogetherTextGeneratorBuilder {
    client: TogetherClient,
    model: String,
    wrap_width: usize,
}

impl TogetherTextGeneratorBuilder {
    /// Creates a builder around an existing client.
    pub fn new(client: TogetherClient) -> Self {
        Self {
            client,
            model: DEFAULT_TEXT_MODEL.to_string(),
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }

    /// Sets the completion model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the column width used when wrapping is requested.
    pub fn wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width;
        self
    }

    /// Builds the generator.
    pub fn build(self) -> Result<TogetherTextGenerator> {
        if self.wrap_width == 0 {
            return Err(GenChatError::InvalidRequest(
                "wrap width must be at least 1".into(),
            ));
        }
        Ok(TogetherTextGenerator {
            client: self.client,
            model: self.model,
            wrap_width: self.wrap_width,
        })
    }
}

/// Text generator backed by Together AI chat completions.
#[derive(Debug, Clone)]
pub struct TogetherTextGenerator {
    client: TogetherClient,
    model: String,
    wrap_width: usize,
}

impl TogetherTextGenerator {
    /// Creates a new `TogetherTextGeneratorBuilder`.
    pub fn builder(client: TogetherClient) -> TogetherTextGeneratorBuilder {
        TogetherTextGeneratorBuilder::new(client)
    }
}

#[async_trait]
impl TextGenerator for TogetherTextGenerator {
    async fn generate(&self, prompt: &str, wrap: bool) -> Result<String> {
        let start = Instant::now();
        let body = ChatRequest::new(&self.model, prompt);

        let response: ChatResponse = self.client.post_json("chat/completions", &body).await?;
        let output = response.into_first_content()?;

        tracing::debug!(
            model = %self.model,
            chars = output.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "completion received"
        );

        if wrap {
            Ok(fill(&output, self.wrap_width))
        } else {
            Ok(output)
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

impl ChatRequest {
    fn new(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::user(prompt)],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_first_content(self) -> Result<String> {
        let choice = self.choices.into_iter().next().ok_or_else(|| {
            GenChatError::UnexpectedResponse("No choices in completion response".into())
        })?;
        choice.message.content.ok_or_else(|| {
            GenChatError::UnexpectedResponse("First choice has no message content".into())
        })
    }
}
