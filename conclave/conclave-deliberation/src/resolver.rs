//! Bounded retry over successive candidate windows.

use crate::error::Result;
use crate::judge::JudgeClassifier;
use crate::stats::DeliberationStats;
use conclave_core::{SearchResult, Verdict};
use std::sync::Arc;
use tracing::{debug, info};

/// Terminal state of one verdict resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Verdict broadcast to the whole candidate pool.
    pub verdict: Verdict,
    /// Window index at which the session terminated.
    pub attempts: u32,
    /// Whether termination came from the fallback path (retry budget or
    /// candidate pool ran out) rather than a decisive verdict.
    pub exhausted: bool,
}

/// Drives the judge across successive windows of the candidate pool.
///
/// The state machine is strictly sequential: each window attempt depends
/// on the previous verdict, so there is never more than one judge call in
/// flight. Windows are non-overlapping `window_size` slices of the pool;
/// a short final window is judged as-is and an empty one means the pool
/// ran out.
pub struct VerdictResolver {
    judge: JudgeClassifier,
    window_size: usize,
    max_retries: u32,
    stats: Arc<DeliberationStats>,
}

impl VerdictResolver {
    pub fn new(
        judge: JudgeClassifier,
        window_size: usize,
        max_retries: u32,
        stats: Arc<DeliberationStats>,
    ) -> Self {
        Self {
            judge,
            window_size,
            max_retries,
            stats,
        }
    }

    /// Resolve a verdict for the query over the candidate pool.
    ///
    /// An explicit loop over the window index rather than recursion: the
    /// retry bound holds independent of stack limits, and the attempt
    /// count is exactly the index of the terminal window.
    pub async fn resolve(&self, query: &str, candidates: &[SearchResult]) -> Result<Resolution> {
        let mut attempt: u32 = 0;
        loop {
            let window = self.window(candidates, attempt);
            if window.is_empty() {
                info!(attempt, "candidate pool exhausted, declining");
                self.stats.record_fallback();
                return Ok(Resolution {
                    verdict: Verdict::Insufficient,
                    attempts: attempt,
                    exhausted: true,
                });
            }

            let verdict = self.judge.classify(query, window).await?;
            debug!(attempt, %verdict, window_len = window.len(), "attempt judged");

            if verdict.is_decisive() {
                return Ok(Resolution {
                    verdict,
                    attempts: attempt,
                    exhausted: false,
                });
            }

            if attempt >= self.max_retries {
                info!(attempt, "retry budget exhausted, declining");
                self.stats.record_fallback();
                return Ok(Resolution {
                    verdict: Verdict::Insufficient,
                    attempts: attempt,
                    exhausted: true,
                });
            }

            attempt += 1;
        }
    }

    /// Broadcast a resolution onto every candidate.
    ///
    /// Returns new annotated values; the caller-owned sequence is left
    /// untouched. Every element carries the same verdict, description,
    /// and attempt count.
    pub fn annotate(
        &self,
        candidates: &[SearchResult],
        resolution: &Resolution,
    ) -> Vec<SearchResult> {
        candidates
            .iter()
            .map(|candidate| candidate.annotated(resolution.verdict, resolution.attempts))
            .collect()
    }

    fn window<'a>(&self, candidates: &'a [SearchResult], attempt: u32) -> &'a [SearchResult] {
        let start = (attempt as usize)
            .saturating_mul(self.window_size)
            .min(candidates.len());
        let end = start.saturating_add(self.window_size).min(candidates.len());
        &candidates[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplingBudget;
    use crate::providers::MockChatProvider;
    use conclave_core::Chunk;

    fn resolver(provider: Arc<MockChatProvider>) -> (VerdictResolver, Arc<DeliberationStats>) {
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
        (VerdictResolver::new(judge, 5, 5, stats.clone()), stats)
    }

    fn pool(len: usize) -> Vec<SearchResult> {
        (0..len)
            .map(|i| {
                SearchResult::new(
                    1.0 - i as f32 / 100.0,
                    Chunk::with_document_name(format!("candidate {}", i), format!("doc-{}.pdf", i)),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_decisive_on_first_window() {
        let provider = Arc::new(MockChatProvider::scripted(["1"]));
        let (resolver, _) = resolver(provider.clone());

        let resolution = resolver.resolve("query", &pool(12)).await.unwrap();
        assert_eq!(
            resolution,
            Resolution {
                verdict: Verdict::Grounded,
                attempts: 0,
                exhausted: false
            }
        );
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_moves_to_next_window_on_undecisive_verdict() {
        let provider = Arc::new(MockChatProvider::scripted(["3", "2"]));
        let (resolver, _) = resolver(provider.clone());

        let resolution = resolver.resolve("query", &pool(12)).await.unwrap();
        assert_eq!(resolution.verdict, Verdict::General);
        assert_eq!(resolution.attempts, 1);
        assert!(!resolution.exhausted);

        // The second request saw the second window, not the first.
        let requests = provider.requests();
        assert!(requests[1].messages[0].content.contains("candidate 5"));
        assert!(!requests[1].messages[0].content.contains("candidate 4"));
    }

    #[tokio::test]
    async fn test_empty_pool_declines_without_judge_call() {
        let provider = Arc::new(MockChatProvider::always("1"));
        let (resolver, stats) = resolver(provider.clone());

        let resolution = resolver.resolve("query", &[]).await.unwrap();
        assert_eq!(
            resolution,
            Resolution {
                verdict: Verdict::Insufficient,
                attempts: 0,
                exhausted: true
            }
        );
        assert_eq!(provider.requests().len(), 0);
        assert_eq!(stats.to_map()["fallbacks"], 1);
    }

    #[tokio::test]
    async fn test_retry_budget_exhaustion_falls_back() {
        let provider = Arc::new(MockChatProvider::always("0"));
        let (resolver, stats) = resolver(provider.clone());

        // Six windows available, six undecisive verdicts.
        let resolution = resolver.resolve("query", &pool(30)).await.unwrap();
        assert_eq!(resolution.verdict, Verdict::Insufficient);
        assert_eq!(resolution.attempts, 5);
        assert!(resolution.exhausted);
        assert_eq!(provider.requests().len(), 6);
        assert_eq!(stats.to_map()["fallbacks"], 1);
    }

    #[tokio::test]
    async fn test_annotate_broadcasts_to_every_candidate() {
        let provider = Arc::new(MockChatProvider::scripted(["1"]));
        let (resolver, _) = resolver(provider);

        let candidates = pool(7);
        let resolution = resolver.resolve("query", &candidates).await.unwrap();
        let annotated = resolver.annotate(&candidates, &resolution);

        assert_eq!(annotated.len(), 7);
        for result in &annotated {
            assert_eq!(result.verdict(), Some(Verdict::Grounded));
            assert_eq!(result.attempts(), Some(0));
        }
        // Inputs stay unannotated.
        assert!(candidates.iter().all(|c| c.verdict().is_none()));
    }

    #[tokio::test]
    async fn test_judge_errors_propagate() {
        let provider = Arc::new(MockChatProvider::scripted(["0"]));
        let (resolver, _) = resolver(provider);

        // Second window errors out (script exhausted); resolve must not
        // turn that into a verdict.
        let err = resolver.resolve("query", &pool(12)).await.unwrap_err();
        assert!(err.to_string().contains("mock script exhausted"));
    }
}
