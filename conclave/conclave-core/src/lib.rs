//! Core types for the Conclave deliberation system.
//!
//! This crate provides the shared data model used across Conclave
//! components: retrieved chunks, scored search results, and the judge
//! verdict taxonomy.

pub mod error;
pub mod types;
pub mod verdict;

pub use error::UnknownVerdict;
pub use types::{Chunk, SearchResult};
pub use verdict::Verdict;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::UnknownVerdict;
    pub use crate::types::{Chunk, SearchResult};
    pub use crate::verdict::Verdict;
}
