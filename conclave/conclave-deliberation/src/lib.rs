//! Multi-agent deliberation core for retrieval-augmented generation.
//!
//! Given an ordered pool of retrieved chunks and a user query, this crate
//! decides whether the retrieved context is sufficient to answer the
//! query, retries the judgement over successive context windows, fans out
//! parallel answer generations, and consolidates the raw answers into a
//! single final-synthesis prompt.
//!
//! # Architecture
//!
//! The deliberation flow consists of several key components:
//!
//! - **Chat Providers**: OpenAI-compatible chat-completion clients
//! - **Judge Classifier**: classifies context sufficiency into a verdict
//! - **Verdict Resolver**: bounded sequential retry over candidate windows
//! - **Answer Synthesizer**: per-chunk parallel answer generation
//! - **Consolidator**: merges raw answers into the final-synthesis prompt
//! - **Orchestrator**: facade wiring the above behind two operations
//!
//! The terminal generation call (sending the consolidated prompt to a
//! model) is deliberately left to the caller, whose deployment owns the
//! final sampling parameters.
//!
//! # Example
//!
//! ```no_run
//! use conclave_deliberation::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = DeliberationConfig::default();
//! let provider = Arc::new(OpenAiChatProvider::new(OpenAiConfig::default())?);
//! let orchestrator =
//!     DeliberationOrchestrator::new(provider.clone(), provider, config);
//!
//! // Candidates come from the retrieval layer, ordered by relevance.
//! let candidates: Vec<SearchResult> = vec![];
//!
//! let annotated = orchestrator
//!     .resolve_and_annotate("How do I renew a passport?", &candidates)
//!     .await?;
//! let final_prompt = orchestrator
//!     .synthesize_answer("How do I renew a passport?", &annotated)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod consolidate;
pub mod error;
pub mod judge;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod resolver;
pub mod stats;
pub mod synthesis;

pub use config::{DeliberationConfig, OpenAiConfig, SamplingBudget};
pub use consolidate::consolidate;
pub use error::{DeliberationError, Result};
pub use judge::{JudgeClassifier, parse_verdict};
pub use orchestrator::{DeliberationOrchestrator, DeliberationOutcome};
pub use providers::{
    ChatMessage, ChatProvider, ChatRequest, MockChatProvider, OpenAiChatProvider,
};
pub use resolver::{Resolution, VerdictResolver};
pub use stats::DeliberationStats;
pub use synthesis::AnswerSynthesizer;

pub use conclave_core::{Chunk, SearchResult, Verdict};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{DeliberationConfig, OpenAiConfig, SamplingBudget};
    pub use crate::error::{DeliberationError, Result};
    pub use crate::orchestrator::{DeliberationOrchestrator, DeliberationOutcome};
    pub use crate::providers::{
        ChatMessage, ChatProvider, ChatRequest, MockChatProvider, OpenAiChatProvider,
    };
    pub use conclave_core::{Chunk, SearchResult, Verdict};
}
