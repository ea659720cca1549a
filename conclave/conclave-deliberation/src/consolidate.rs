//! Final-synthesis prompt construction.

use crate::prompts;

/// Merge raw candidate answers and the original query into the
/// final-synthesis prompt.
///
/// Returns prompt text, not a completion: the terminal generation call
/// belongs to the caller, whose deployment owns the final sampling
/// parameters. The rendered prompt is valid even for an empty answer
/// list, in which case the synthesis model only has the query to work
/// with.
pub fn consolidate(query: &str, answers: &[String]) -> String {
    prompts::consolidation_prompt(query, answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answers_still_yield_a_query_bearing_prompt() {
        let prompt = consolidate("what is the deadline?", &[]);
        assert!(prompt.contains("what is the deadline?"));
        assert!(!prompt.is_empty());
    }

    #[test]
    fn test_all_answers_are_embedded() {
        let answers = vec![
            "The deadline is March 1st (source: decree.pdf).".to_string(),
            "Nothing here".to_string(),
        ];
        let prompt = consolidate("what is the deadline?", &answers);
        for answer in &answers {
            assert!(prompt.contains(answer));
        }
    }
}
