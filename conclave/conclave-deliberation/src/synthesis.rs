//! Parallel answer generation over annotated candidates.

use crate::config::SamplingBudget;
use crate::error::Result;
use crate::prompts;
use crate::providers::{ChatMessage, ChatProvider, ChatRequest};
use crate::stats::DeliberationStats;
use conclave_core::{SearchResult, Verdict};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::debug;

/// Fans out answer generation according to the broadcast verdict.
pub struct AnswerSynthesizer {
    provider: Arc<dyn ChatProvider>,
    budget: SamplingBudget,
    stats: Arc<DeliberationStats>,
}

impl AnswerSynthesizer {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        budget: SamplingBudget,
        stats: Arc<DeliberationStats>,
    ) -> Self {
        Self {
            provider,
            budget,
            stats,
        }
    }

    /// Render the prompt batch for the candidates' broadcast verdict.
    ///
    /// `Grounded` yields one prompt per candidate, `General` a single
    /// context-free prompt, and anything else an empty batch: the caller
    /// declines with the verdict description instead of generating. A
    /// missing or malformed annotation also yields an empty batch.
    pub fn build_prompts(&self, query: &str, annotated: &[SearchResult]) -> Vec<String> {
        match annotated.first().and_then(SearchResult::verdict) {
            Some(Verdict::Grounded) => annotated
                .iter()
                .map(|result| prompts::grounded_prompt(query, result))
                .collect(),
            Some(Verdict::General) => vec![prompts::general_prompt(query)],
            _ => Vec::new(),
        }
    }

    /// Generate one raw answer per prompt, all concurrently.
    ///
    /// Tasks are joined in submission order regardless of completion
    /// order; the first failing task aborts the batch and its error
    /// propagates. Latency is bounded by the slowest single task.
    pub async fn synthesize(
        &self,
        query: &str,
        annotated: &[SearchResult],
    ) -> Result<Vec<String>> {
        let prompts = self.build_prompts(query, annotated);
        debug!(tasks = prompts.len(), "fanning out answer generation");
        self.stats.record_answer_tasks(prompts.len());

        let calls = prompts.into_iter().map(|prompt| {
            self.provider.complete(ChatRequest {
                model: self.provider.model().to_string(),
                messages: vec![ChatMessage::user(prompt)],
                temperature: self.budget.temperature,
                max_tokens: self.budget.max_tokens,
                stream: false,
            })
        });

        try_join_all(calls).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockChatProvider;
    use conclave_core::Chunk;

    fn synthesizer(provider: Arc<MockChatProvider>) -> AnswerSynthesizer {
        AnswerSynthesizer::new(
            provider,
            SamplingBudget {
                temperature: 0.2,
                max_tokens: 1024,
            },
            Arc::new(DeliberationStats::default()),
        )
    }

    fn annotated_pool(len: usize, verdict: Verdict) -> Vec<SearchResult> {
        (0..len)
            .map(|i| {
                SearchResult::new(
                    1.0,
                    Chunk::with_document_name(format!("candidate {}", i), format!("doc-{}.pdf", i)),
                )
                .annotated(verdict, 0)
            })
            .collect()
    }

    #[test]
    fn test_grounded_builds_one_prompt_per_candidate() {
        let synthesizer = synthesizer(Arc::new(MockChatProvider::always("ok")));
        let prompts = synthesizer.build_prompts("query", &annotated_pool(4, Verdict::Grounded));
        assert_eq!(prompts.len(), 4);
        for (i, prompt) in prompts.iter().enumerate() {
            assert!(prompt.contains(&format!("candidate {}", i)));
            assert!(prompt.contains(&format!("doc-{}.pdf", i)));
        }
    }

    #[test]
    fn test_general_builds_single_context_free_prompt() {
        let synthesizer = synthesizer(Arc::new(MockChatProvider::always("ok")));
        let prompts = synthesizer.build_prompts("query", &annotated_pool(9, Verdict::General));
        assert_eq!(prompts.len(), 1);
        assert!(!prompts[0].contains("candidate"));
    }

    #[test]
    fn test_insufficient_builds_nothing() {
        let synthesizer = synthesizer(Arc::new(MockChatProvider::always("ok")));
        assert!(
            synthesizer
                .build_prompts("query", &annotated_pool(3, Verdict::Insufficient))
                .is_empty()
        );
        assert!(synthesizer.build_prompts("query", &[]).is_empty());
    }

    #[test]
    fn test_unannotated_candidates_build_nothing() {
        let synthesizer = synthesizer(Arc::new(MockChatProvider::always("ok")));
        let bare = vec![SearchResult::new(1.0, Chunk::new("candidate"))];
        assert!(synthesizer.build_prompts("query", &bare).is_empty());
    }

    #[tokio::test]
    async fn test_synthesize_preserves_submission_order() {
        // Reply derived from the prompt so ordering is attributable.
        let provider = Arc::new(MockChatProvider::responding(|request| {
            let content = &request.messages[0].content;
            match content.find("candidate") {
                Some(at) => content[at..].chars().take(11).collect(),
                None => "no candidate".to_string(),
            }
        }));
        let synthesizer = synthesizer(provider.clone());

        let answers = synthesizer
            .synthesize("query", &annotated_pool(6, Verdict::Grounded))
            .await
            .unwrap();

        assert_eq!(answers.len(), 6);
        for (i, answer) in answers.iter().enumerate() {
            assert_eq!(answer, &format!("candidate {}", i));
        }
        assert_eq!(provider.requests().len(), 6);
    }

    #[tokio::test]
    async fn test_synthesize_uses_answering_budget() {
        let provider = Arc::new(MockChatProvider::always("an answer"));
        let synthesizer = synthesizer(provider.clone());

        synthesizer
            .synthesize("query", &annotated_pool(2, Verdict::Grounded))
            .await
            .unwrap();

        for request in provider.requests() {
            assert_eq!(request.max_tokens, 1024);
            assert!(!request.stream);
        }
    }

    #[tokio::test]
    async fn test_task_failure_propagates() {
        // Script covers two of the three tasks; the third errors.
        let provider = Arc::new(MockChatProvider::scripted(["a", "b"]));
        let synthesizer = synthesizer(provider);

        let result = synthesizer
            .synthesize("query", &annotated_pool(3, Verdict::Grounded))
            .await;
        assert!(result.is_err());
    }
}
