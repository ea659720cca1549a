//! Context-sufficiency judgement.

use crate::config::SamplingBudget;
use crate::error::Result;
use crate::prompts;
use crate::providers::{ChatMessage, ChatProvider, ChatRequest};
use crate::stats::DeliberationStats;
use conclave_core::{SearchResult, Verdict};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

static VERDICT_DIGIT: Lazy<Regex> =
    Lazy::new(|| Regex::new("[0-3]").expect("literal digit class"));

/// Classifies whether a window of candidate context is sufficient to
/// answer a query, using a dedicated judge model.
pub struct JudgeClassifier {
    provider: Arc<dyn ChatProvider>,
    budget: SamplingBudget,
    extract_length: usize,
    stats: Arc<DeliberationStats>,
}

impl JudgeClassifier {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        budget: SamplingBudget,
        extract_length: usize,
        stats: Arc<DeliberationStats>,
    ) -> Self {
        Self {
            provider,
            budget,
            extract_length,
            stats,
        }
    }

    /// Judge one window of candidates against the query.
    ///
    /// Sends exactly one request to the judge model, near-deterministic
    /// and with a budget of a single digit. A reply containing no digit
    /// in `0..=3` falls back to [`Verdict::Unintelligible`], which keeps
    /// the retry loop moving; the fallback is logged and counted because
    /// it is indistinguishable from a genuine unintelligible-query
    /// verdict. Provider failures propagate; they are never converted
    /// into a verdict.
    pub async fn classify(&self, query: &str, window: &[SearchResult]) -> Result<Verdict> {
        let excerpts: Vec<String> = window
            .iter()
            .map(|result| prompts::excerpt_label(result, self.extract_length))
            .collect();
        let prompt = prompts::judge_prompt(query, &excerpts);

        self.stats.record_judge_call();
        let reply = self
            .provider
            .complete(ChatRequest {
                model: self.provider.model().to_string(),
                messages: vec![ChatMessage::user(prompt)],
                temperature: self.budget.temperature,
                max_tokens: self.budget.max_tokens,
                stream: false,
            })
            .await?;

        let verdict = match parse_verdict(&reply) {
            Some(verdict) => verdict,
            None => {
                warn!(
                    reply = reply.as_str(),
                    "judge reply contained no verdict digit, defaulting to unintelligible"
                );
                self.stats.record_parse_failure();
                Verdict::Unintelligible
            }
        };

        debug!(?verdict, "window judged");
        Ok(verdict)
    }
}

/// First character in `0..=3` anywhere in the reply, as a verdict.
///
/// Kept as an explicit parse step so a formatting glitch is a visible
/// `None`, never an implicit cast.
pub fn parse_verdict(reply: &str) -> Option<Verdict> {
    VERDICT_DIGIT
        .find(reply)
        .and_then(|digit| digit.as_str().parse::<u8>().ok())
        .and_then(|code| Verdict::try_from(code).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockChatProvider;
    use conclave_core::Chunk;

    fn classifier(provider: Arc<MockChatProvider>) -> JudgeClassifier {
        JudgeClassifier::new(
            provider,
            SamplingBudget {
                temperature: 0.1,
                max_tokens: 3,
            },
            250,
            Arc::new(DeliberationStats::default()),
        )
    }

    #[test]
    fn test_parse_verdict_plain_digit() {
        assert_eq!(parse_verdict("1"), Some(Verdict::Grounded));
        assert_eq!(parse_verdict("0"), Some(Verdict::Unintelligible));
    }

    #[test]
    fn test_parse_verdict_embedded_in_prose() {
        assert_eq!(parse_verdict("The answer is 2."), Some(Verdict::General));
        assert_eq!(parse_verdict("<3>"), Some(Verdict::Insufficient));
    }

    #[test]
    fn test_parse_verdict_first_matching_digit_wins() {
        // 4 is outside the class, so the scan lands on the 2.
        assert_eq!(parse_verdict("42"), Some(Verdict::General));
        assert_eq!(parse_verdict("3 or maybe 1"), Some(Verdict::Insufficient));
    }

    #[test]
    fn test_parse_verdict_no_digit() {
        assert_eq!(parse_verdict(""), None);
        assert_eq!(parse_verdict("I cannot decide."), None);
        assert_eq!(parse_verdict("four"), None);
    }

    #[tokio::test]
    async fn test_classify_sends_judge_budget() {
        let provider = Arc::new(MockChatProvider::scripted(["1"]));
        let judge = classifier(provider.clone());

        let window = vec![SearchResult::new(
            0.9,
            Chunk::with_document_name("pension rules", "guide.pdf"),
        )];
        let verdict = judge.classify("retirement?", &window).await.unwrap();
        assert_eq!(verdict, Verdict::Grounded);

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 3);
        assert!(!requests[0].stream);
        assert!(requests[0].messages[0].content.contains("guide.pdf"));
    }

    #[tokio::test]
    async fn test_classify_defaults_to_unintelligible_on_garbage() {
        let provider = Arc::new(MockChatProvider::always("no digits here"));
        let stats = Arc::new(DeliberationStats::default());
        let judge = JudgeClassifier::new(
            provider,
            SamplingBudget {
                temperature: 0.1,
                max_tokens: 3,
            },
            250,
            stats.clone(),
        );

        let verdict = judge.classify("query", &[]).await.unwrap();
        assert_eq!(verdict, Verdict::Unintelligible);
        assert_eq!(stats.to_map()["parse_failures"], 1);
    }

    #[tokio::test]
    async fn test_classify_propagates_provider_errors() {
        // Empty script: the first call already fails.
        let provider = Arc::new(MockChatProvider::scripted(Vec::<String>::new()));
        let judge = classifier(provider);
        assert!(judge.classify("query", &[]).await.is_err());
    }
}
