//! Prompt templates for the judge, the answerers, and the consolidator.
//!
//! The templates are fixed; only the query, the excerpt labels, and the
//! current date are interpolated. Answerer templates use a sentinel
//! phrase instead of free-form refusals so downstream consolidation can
//! discard irrelevant excerpts mechanically.

use chrono::Utc;
use conclave_core::SearchResult;

/// Sentinel an answerer must reply with when its excerpt is irrelevant.
pub const NOTHING_HERE: &str = "Nothing here";

/// Source label used when the retrieval layer supplied no document name.
const UNKNOWN_SOURCE: &str = "unknown source";

/// Label one candidate as an excerpt for the judge: source name plus a
/// truncated snippet of the chunk content.
pub fn excerpt_label(result: &SearchResult, extract_length: usize) -> String {
    let source = result.chunk.document_name().unwrap_or(UNKNOWN_SOURCE);
    let snippet: String = result.chunk.content.chars().take(extract_length).collect();
    format!("(Excerpt: {}) {}...", source, snippet)
}

/// Instruction sent to the judge model: decide whether the excerpts are
/// needed, and sufficient, to answer the user message.
pub fn judge_prompt(query: &str, excerpts: &[String]) -> String {
    let date = Utc::now().format("%Y-%m-%d");
    let context = excerpts.join("\n");
    format!(
        r#"You are an expert at understanding and evaluating the information needed to answer a user message. Your job is to judge whether a user message can be answered given a provided context.
The current date is {date}.

The context is a list of article excerpts meant to help answer the user message, but it is not necessarily related to it. You must evaluate whether the context is needed or not.

Do not answer the user message.
Here is the user message: {query}

Here are your choices:

- If the user message is truly unclear or does not mean anything, reply 0 OR
- If the user message is understandable and the provided context is related to it (even loosely, even a single excerpt), or the user message touches a topic the context also touches, reply 1 OR
- If the context contains any element that can help answer the user message, reply 1 OR
- If the user message explicitly asks for sources or references, reply 1 (if the associated context is good) or 3 (if the associated context is bad) OR
- If the user message does not need context because it is simple general knowledge, reply 2 OR
- If the user message is a simple or personal message, or the rest of the conversation is enough to answer it, reply 2 OR
- If the user message needs context because it is specific or complex, but none of the excerpts is related to it, reply 3

For each choice, make sure to evaluate the user message against these criteria before giving your reply.
Look at the context carefully; if it can help answer the user message, that matters.
Even if the context only shares a few pieces of information or common words with the user message, consider it related to the question.

Do not write a sentence; reply only 0, 1, 2 or 3.

Examples
----------
Example 1 - "The context answers the question"
context: For early retirement [...]
question: How should I prepare for retirement?
reply: 1
Example 2 - "toto car is not a question and means nothing"
context: vehicle insurance policies [...]
question: toto car
reply: 0
Example 3 - "No context needed, the question is simple general knowledge"
context: In case of theft or loss [...]
question: What is the capital of France?
reply: 2
Example 4 - "Question needing relevant context that is not in the pool"
context: You can file a request [...]
question: Who is the current president of the USA?
reply: 3
----------

Do not answer the question, reply only 0, 1, 2, 3. Never give explanations or sentences in your reply, just return one digit. Your reply must follow this format:<DIGIT>
Also rely on the rest of the conversation when making your choice.
context: {context}
question: {query}
reply:"#
    )
}

/// Instruction for one answerer grounded in a single excerpt.
pub fn grounded_prompt(query: &str, result: &SearchResult) -> String {
    let source = result.chunk.document_name().unwrap_or(UNKNOWN_SOURCE);
    let doc = &result.chunk.content;
    format!(
        r#"You are an assistant answering questions from reference documents. Your answers must be succinct and clear. Do not elaborate needlessly.
Here is a context (source: {source}):
{doc}

Here is a question: {query}
Relying only on the given context, answer the question with the best possible answer.
- If the context does not let you answer the question, reply just "{NOTHING_HERE}"; never say "the text does not mention".
- If the context gives elements of an answer, answer only the question and invent nothing; give even partial elements of an answer if you cannot fully answer from the context. Give the name of the context's source in your answer.
- If the question is not explicit and refers back to the ongoing conversation, and you find the context related to that conversation, reply just "This information is relevant to the conversation".
question: {query}
reply ("{NOTHING_HERE}" or your answer):"#
    )
}

/// Instruction for the single context-free answerer.
pub fn general_prompt(query: &str) -> String {
    let date = Utc::now().format("%Y-%m-%d");
    format!(
        r#"You are an assistant answering user questions. The current date is {date}. Your answers must be succinct and clear. Do not elaborate needlessly.
Here is a user request: {query}
Answer this question as best you can.
Rules to respect:
Do not invent references.
If you need more information or the question is not clear, tell the user.
The answer must be as short as possible. Format your answer with line breaks.
Reply:"#
    )
}

/// Final-synthesis instruction merging the raw answers and the query.
pub fn consolidation_prompt(query: &str, answers: &[String]) -> String {
    format!(
        r#"You are an expert at writing good answers and explaining things.
Here are several generated answers: {answers:?}
Relying on these answers, keep only what is useful to answer the question: {query}
Cite the sources used if there are any, but never mention the generated answers themselves.
Reply with the best possible answer to this question.
If some elements of the answers contradict each other, still give them to the user and explain the information you have.
Just answer the question, say nothing else. You must blend this information so only the useful part comes out, in the best possible way.
Reply:"#
    )
}
