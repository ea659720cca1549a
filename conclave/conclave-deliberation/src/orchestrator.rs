//! Facade wiring the judge, resolver, synthesizer, and consolidation.

use crate::config::DeliberationConfig;
use crate::consolidate::consolidate;
use crate::error::Result;
use crate::judge::JudgeClassifier;
use crate::providers::ChatProvider;
use crate::resolver::VerdictResolver;
use crate::stats::DeliberationStats;
use crate::synthesis::AnswerSynthesizer;
use conclave_core::{SearchResult, Verdict};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Outcome of a full deliberation pass: the final-synthesis prompt plus
/// the provenance a caller needs to present sources.
#[derive(Debug, Clone)]
pub struct DeliberationOutcome {
    /// Final-synthesis prompt, ready for the caller's terminal
    /// generation call.
    pub final_prompt: String,
    /// Session verdict.
    pub verdict: Verdict,
    /// Judge attempts consumed.
    pub attempts: u32,
    /// Source document names, deduplicated in pool order. Empty for a
    /// general-knowledge answer.
    pub source_refs: Vec<String>,
    /// Source chunk contents, deduplicated in pool order. Empty for a
    /// general-knowledge answer.
    pub source_contents: Vec<String>,
}

/// Multi-agent deliberation orchestrator.
///
/// Owns nothing but provider handles, configuration, and counters; every
/// entity created during a call dies with it. The judge provider and the
/// answering provider may be the same handle.
pub struct DeliberationOrchestrator {
    resolver: VerdictResolver,
    synthesizer: AnswerSynthesizer,
    stats: Arc<DeliberationStats>,
}

impl DeliberationOrchestrator {
    /// Build an orchestrator from a judge provider and an answering
    /// provider.
    pub fn new(
        judge_provider: Arc<dyn ChatProvider>,
        answer_provider: Arc<dyn ChatProvider>,
        config: DeliberationConfig,
    ) -> Self {
        let stats = Arc::new(DeliberationStats::default());
        let judge = JudgeClassifier::new(
            judge_provider,
            config.judge,
            config.extract_length,
            stats.clone(),
        );
        let resolver =
            VerdictResolver::new(judge, config.window_size, config.max_retries, stats.clone());
        let synthesizer = AnswerSynthesizer::new(answer_provider, config.answering, stats.clone());

        Self {
            resolver,
            synthesizer,
            stats,
        }
    }

    /// Resolve the session verdict and broadcast it onto every candidate.
    ///
    /// Returns new annotated values; the caller's sequence is not
    /// touched.
    pub async fn resolve_and_annotate(
        &self,
        query: &str,
        candidates: &[SearchResult],
    ) -> Result<Vec<SearchResult>> {
        let resolution = self.resolver.resolve(query, candidates).await?;
        Ok(self.resolver.annotate(candidates, &resolution))
    }

    /// Fan out answer generation for annotated candidates and merge the
    /// raw answers into the final-synthesis prompt.
    pub async fn synthesize_answer(
        &self,
        query: &str,
        annotated: &[SearchResult],
    ) -> Result<String> {
        let answers = self.synthesizer.synthesize(query, annotated).await?;
        Ok(consolidate(query, &answers))
    }

    /// Full pass: resolve, annotate, synthesize, and assemble provenance.
    pub async fn deliberate(
        &self,
        query: &str,
        candidates: &[SearchResult],
    ) -> Result<DeliberationOutcome> {
        let session = Uuid::new_v4();
        info!(%session, candidates = candidates.len(), "starting deliberation");

        let resolution = self.resolver.resolve(query, candidates).await?;
        let annotated = self.resolver.annotate(candidates, &resolution);
        let answers = self.synthesizer.synthesize(query, &annotated).await?;
        let final_prompt = consolidate(query, &answers);

        let (source_refs, source_contents) = match resolution.verdict {
            Verdict::General => (Vec::new(), Vec::new()),
            _ => (
                dedup_preserving_order(
                    annotated
                        .iter()
                        .filter_map(|result| result.chunk.document_name().map(str::to_string)),
                ),
                dedup_preserving_order(
                    annotated.iter().map(|result| result.chunk.content.clone()),
                ),
            ),
        };

        info!(
            %session,
            verdict = %resolution.verdict,
            attempts = resolution.attempts,
            answers = answers.len(),
            "deliberation finished"
        );

        Ok(DeliberationOutcome {
            final_prompt,
            verdict: resolution.verdict,
            attempts: resolution.attempts,
            source_refs,
            source_contents,
        })
    }

    /// Shared counters for this orchestrator.
    pub fn stats(&self) -> &DeliberationStats {
        &self.stats
    }
}

fn dedup_preserving_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
