//! Judge verdict taxonomy.

use crate::error::UnknownVerdict;
use serde::{Deserialize, Serialize};

/// Categorical decision on whether and how retrieved context should be
/// used to answer a query.
///
/// Exactly one verdict applies per deliberation session; it is computed
/// once and broadcast to every search result in that session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Verdict {
    /// The query is unintelligible and cannot be judged.
    Unintelligible = 0,
    /// The context contains relevant information; ground the answer in it.
    Grounded = 1,
    /// No context needed; answer from general knowledge or the conversation.
    General = 2,
    /// Context is needed but absent or irrelevant; decline instead of fabricating.
    Insufficient = 3,
}

impl Verdict {
    /// Numeric wire code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether this verdict ends a judging session.
    ///
    /// Undecisive verdicts send the judge on to the next context window.
    pub fn is_decisive(self) -> bool {
        matches!(self, Verdict::Grounded | Verdict::General)
    }

    /// Fixed human-readable description, suitable for decline messages.
    pub fn description(self) -> &'static str {
        match self {
            Verdict::Unintelligible => "The request could not be understood.",
            Verdict::Grounded => {
                "Relevant information was found in the searched knowledge base."
            }
            Verdict::General => {
                "No relevant information was found in the knowledge base, but the question can be answered from general knowledge."
            }
            Verdict::Insufficient => {
                "No relevant information was found in the knowledge base, and answering without it would risk stating something false."
            }
        }
    }
}

impl TryFrom<u8> for Verdict {
    type Error = UnknownVerdict;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Verdict::Unintelligible),
            1 => Ok(Verdict::Grounded),
            2 => Ok(Verdict::General),
            3 => Ok(Verdict::Insufficient),
            other => Err(UnknownVerdict(other)),
        }
    }
}

impl From<Verdict> for u8 {
    fn from(verdict: Verdict) -> u8 {
        verdict.code()
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
