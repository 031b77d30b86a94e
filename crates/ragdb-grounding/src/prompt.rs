//! Fixed wording of the generation request and of the canned answers.

pub const SYSTEM_PROMPT: &str = "You are an assistant answering questions about a document collection. \
Answer ONLY from the context supplied with the question.\n\
- Do not use outside knowledge.\n\
- If the context does not contain enough information to answer, say so plainly instead of guessing.\n\
- Attribute statements to their source whenever the context names one.\n\
- Be concise and accurate.";

pub const NO_RELEVANT_INFORMATION: &str = "I couldn't find any relevant information to answer your question. \
Please try rephrasing or ask about a different topic from the documents.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// The request always carries the grounding instruction, the context and
/// the original question.
pub fn build_request(context: &str, query: &str) -> GenerationRequest {
    GenerationRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt: format!(
            "Context:\n{context}\n\nQuestion: {query}\n\nAnswer using only the context above."
        ),
    }
}

pub fn failure_message(cause: &dyn std::fmt::Display) -> String {
    format!("Sorry, I encountered an error processing your request: {cause}")
}

/// Answer used when no model is configured. Lists the real retrieved sources
/// so the pipeline stays testable end to end.
pub fn placeholder_message(query: &str, sources: &[String]) -> String {
    let from = if sources.is_empty() { "no sources".to_string() } else { sources.join(", ") };
    format!(
        "[placeholder: no language model configured] Context for \"{query}\" was assembled from {from}. \
Configure generation.api_key to receive a generated answer."
    )
}
