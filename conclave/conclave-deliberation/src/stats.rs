//! Deliberation counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cross-session counters for the deliberation core.
///
/// The judge's parse fallback is silent at the API level (a reply with no
/// digit degrades to an unintelligible verdict, which retries normally).
/// These counters are how operators tell a judge-model formatting glitch
/// from genuinely unintelligible queries.
#[derive(Debug, Default)]
pub struct DeliberationStats {
    pub judge_calls: AtomicU64,
    pub parse_failures: AtomicU64,
    pub fallbacks: AtomicU64,
    pub answer_tasks: AtomicU64,
}

impl DeliberationStats {
    pub fn record_judge_call(&self) {
        self.judge_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_answer_tasks(&self, count: usize) {
        self.answer_tasks.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Counters as a map.
    pub fn to_map(&self) -> HashMap<String, u64> {
        let mut map = HashMap::new();
        map.insert(
            "judge_calls".to_string(),
            self.judge_calls.load(Ordering::Relaxed),
        );
        map.insert(
            "parse_failures".to_string(),
            self.parse_failures.load(Ordering::Relaxed),
        );
        map.insert(
            "fallbacks".to_string(),
            self.fallbacks.load(Ordering::Relaxed),
        );
        map.insert(
            "answer_tasks".to_string(),
            self.answer_tasks.load(Ordering::Relaxed),
        );
        map
    }
}
