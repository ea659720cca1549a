//! Retrieved chunks and scored search results.

use crate::verdict::Verdict;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Metadata key carrying the source document name.
pub const METADATA_DOCUMENT_NAME: &str = "document_name";
/// Metadata key carrying the broadcast verdict code.
pub const METADATA_CHOICE: &str = "choice";
/// Metadata key carrying the verdict description.
pub const METADATA_CHOICE_DESC: &str = "choice_desc";
/// Metadata key carrying the number of judge attempts consumed.
pub const METADATA_N_RETRY: &str = "n_retry";

/// A chunk of source material returned by the retrieval layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Chunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Chunk attributed to a named source document.
    pub fn with_document_name(
        content: impl Into<String>,
        document_name: impl Into<String>,
    ) -> Self {
        let mut chunk = Self::new(content);
        chunk.metadata.insert(
            METADATA_DOCUMENT_NAME.to_string(),
            Value::String(document_name.into()),
        );
        chunk
    }

    /// Source document name, when the retrieval layer provided one.
    pub fn document_name(&self) -> Option<&str> {
        self.metadata.get(METADATA_DOCUMENT_NAME).and_then(Value::as_str)
    }
}

/// A scored retrieval hit: one chunk plus its relevance score.
///
/// Ordered sequences of these form the candidate pool handed to the
/// deliberation core. Ranking and filtering are the retrieval layer's
/// responsibility; the core only windows the sequence as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub score: f32,
    pub chunk: Chunk,
}

impl SearchResult {
    pub fn new(score: f32, chunk: Chunk) -> Self {
        Self { score, chunk }
    }

    /// Copy of this result with the session verdict written into the
    /// chunk metadata (`choice`, `choice_desc`, `n_retry`).
    ///
    /// The receiver is left untouched; callers get a new annotated value
    /// instead of a hidden in-place mutation of their own sequence.
    pub fn annotated(&self, verdict: Verdict, attempts: u32) -> SearchResult {
        let mut result = self.clone();
        result
            .chunk
            .metadata
            .insert(METADATA_CHOICE.to_string(), Value::from(verdict.code()));
        result.chunk.metadata.insert(
            METADATA_CHOICE_DESC.to_string(),
            Value::from(verdict.description()),
        );
        result
            .chunk
            .metadata
            .insert(METADATA_N_RETRY.to_string(), Value::from(attempts));
        result
    }

    /// Verdict previously broadcast onto this result, if any.
    pub fn verdict(&self) -> Option<Verdict> {
        self.chunk
            .metadata
            .get(METADATA_CHOICE)
            .and_then(Value::as_u64)
            .and_then(|code| u8::try_from(code).ok())
            .and_then(|code| Verdict::try_from(code).ok())
    }

    /// Judge attempts consumed when this result was annotated, if any.
    pub fn attempts(&self) -> Option<u32> {
        self.chunk
            .metadata
            .get(METADATA_N_RETRY)
            .and_then(Value::as_u64)
            .and_then(|attempts| u32::try_from(attempts).ok())
    }
}
