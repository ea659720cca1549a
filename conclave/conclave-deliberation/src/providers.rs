//! Chat-completion providers used by the deliberation core.

use crate::config::OpenAiConfig;
use crate::error::{DeliberationError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info};

/// One message in a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// User-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A single chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

/// Trait for chat-completion providers.
///
/// Implementations hold no per-call mutable state, so one provider handle
/// is safe to share across concurrent calls.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run one chat completion and return the assistant message text.
    ///
    /// Transport and rate-limit failures surface as errors; callers own
    /// any retry or backoff policy.
    async fn complete(&self, request: ChatRequest) -> Result<String>;

    /// Model identifier requests are routed to.
    fn model(&self) -> &str;
}

/// OpenAI-compatible chat-completion provider.
pub struct OpenAiChatProvider {
    client: Client,
    config: OpenAiConfig,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Deserialize)]
struct ChatCompletionMessage {
    content: String,
}

impl OpenAiChatProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let value = format!("Bearer {}", api_key).parse().map_err(|_| {
                DeliberationError::Config("API key is not a valid header value".to_string())
            })?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        info!("Initialized chat provider for model: {}", config.model);

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        debug!(
            "Sending chat completion to {} ({} messages)",
            self.config.endpoint,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(DeliberationError::Provider(format!(
                "chat endpoint returned {}: {}",
                status, error_text
            )));
        }

        let response: ChatCompletionResponse = response.json().await?;
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            DeliberationError::Provider("chat endpoint returned no choices".to_string())
        })?;

        Ok(choice.message.content)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

type Responder = dyn Fn(&ChatRequest) -> String + Send + Sync;

enum MockFallback {
    Exhausted,
    Repeat(String),
    Respond(Box<Responder>),
}

/// Scripted provider for tests and examples.
///
/// Replies are served from a fixed script, a single repeating reply, or a
/// responder closure. Every received request is recorded for later
/// inspection.
pub struct MockChatProvider {
    script: Mutex<VecDeque<String>>,
    fallback: MockFallback,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatProvider {
    /// Provider replying with each script entry once, in order. Errors
    /// once the script runs out.
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: MockFallback::Exhausted,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Provider replying with the same text forever.
    pub fn always(reply: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: MockFallback::Repeat(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Provider deriving each reply from the received request.
    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&ChatRequest) -> String + Send + Sync + 'static,
    {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: MockFallback::Respond(Box::new(responder)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        if let Some(reply) = self.script.lock().pop_front() {
            self.requests.lock().push(request);
            return Ok(reply);
        }

        let reply = match &self.fallback {
            MockFallback::Repeat(reply) => Ok(reply.clone()),
            MockFallback::Respond(responder) => Ok(responder(&request)),
            MockFallback::Exhausted => Err(DeliberationError::Provider(
                "mock script exhausted".to_string(),
            )),
        };
        self.requests.lock().push(request);
        reply
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
