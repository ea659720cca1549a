//! Basic usage example for conclave-deliberation.

use conclave_deliberation::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("=== Conclave Deliberation Example ===\n");

    // Scripted providers stand in for real model endpoints (in
    // production, use OpenAiChatProvider for both roles).
    // The judge finds window 0 unhelpful, then grounds on window 1.
    let judge = Arc::new(MockChatProvider::scripted(["3", "1"]));
    let answerer = Arc::new(MockChatProvider::responding(|request| {
        let prompt = &request.messages[0].content;
        if prompt.contains("town hall") {
            "Passports are renewed at the town hall (source: passport-guide.pdf).".to_string()
        } else {
            "Nothing here".to_string()
        }
    }));

    let orchestrator =
        DeliberationOrchestrator::new(judge, answerer, DeliberationConfig::default());

    // Candidates as the retrieval layer would hand them over, ordered by
    // relevance score.
    let candidates: Vec<SearchResult> = (0..7)
        .map(|i| {
            let (content, source) = if i == 6 {
                (
                    "Passports are renewed at the town hall of your place of residence."
                        .to_string(),
                    "passport-guide.pdf",
                )
            } else {
                (
                    format!("Vehicle registration rules, article {}.", i),
                    "vehicle-guide.pdf",
                )
            };
            SearchResult::new(
                0.9 - i as f32 / 20.0,
                Chunk::with_document_name(content, source),
            )
        })
        .collect();

    let query = "Where do I renew my passport?";

    println!("Resolving verdict for: {query}");
    let annotated = orchestrator.resolve_and_annotate(query, &candidates).await?;

    let first = &annotated[0];
    println!(
        "Verdict: {:?} after {} retries",
        first.verdict(),
        first.attempts().unwrap_or(0)
    );

    println!("\nSynthesizing the final prompt...");
    let final_prompt = orchestrator.synthesize_answer(query, &annotated).await?;

    println!("--- final-synthesis prompt ---");
    println!("{final_prompt}");

    println!("\nCounters: {:?}", orchestrator.stats().to_map());

    Ok(())
}
