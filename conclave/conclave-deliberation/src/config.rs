//! Configuration for the deliberation core.

use serde::{Deserialize, Serialize};

/// Main configuration for deliberation sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationConfig {
    /// Candidates judged per context window
    pub window_size: usize,

    /// Maximum window retries before falling back to a decline
    pub max_retries: u32,

    /// Excerpt truncation length (in chars) used in judge prompts
    pub extract_length: usize,

    /// Sampling budget for judge calls
    pub judge: SamplingBudget,

    /// Sampling budget for answer generation calls
    pub answering: SamplingBudget,
}

impl Default for DeliberationConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            max_retries: 5,
            extract_length: 250,
            // Near-deterministic, one digit of output.
            judge: SamplingBudget {
                temperature: 0.1,
                max_tokens: 3,
            },
            answering: SamplingBudget {
                temperature: 0.2,
                max_tokens: 1024,
            },
        }
    }
}

/// Temperature and output budget for one class of provider calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SamplingBudget {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// OpenAI-compatible chat endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key (can be set via OPENAI_API_KEY env var)
    pub api_key: Option<String>,

    /// Chat completions endpoint
    pub endpoint: String,

    /// Model identifier sent with each request
    pub model: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: 30,
        }
    }
}
