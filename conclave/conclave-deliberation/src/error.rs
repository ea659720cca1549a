//! Error types for the deliberation core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeliberationError>;

#[derive(Debug, Error)]
pub enum DeliberationError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// An out-of-range verdict code reached the typed boundary. This is
    /// an internal invariant violation, distinct from a normal decline.
    #[error(transparent)]
    Verdict(#[from] conclave_core::UnknownVerdict),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
