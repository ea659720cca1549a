//! Error types for the Conclave data model.

use thiserror::Error;

/// A raw verdict code outside the known taxonomy.
///
/// This is the only place a numeric code enters the verdict domain, so
/// downstream matches on [`crate::Verdict`] stay exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown verdict code: {0}")]
pub struct UnknownVerdict(pub u8);
