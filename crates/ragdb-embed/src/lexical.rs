use ragdb_core::traits::Embedder;

use crate::tokenize::terms;

/// Lowercased text plus its terms; queries use the terms, documents the
/// text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalVector {
    lowered: String,
    terms: Vec<String>,
}

/// Scores a document by the fraction of query words that occur in it as
/// substrings, case-insensitively.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalEmbedder;

impl LexicalEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl Embedder for LexicalEmbedder {
    type Vector = LexicalVector;

    fn embedder_id(&self) -> &str {
        "lexical"
    }

    fn embed(&self, text: &str) -> LexicalVector {
        LexicalVector { lowered: text.to_lowercase(), terms: terms(text) }
    }

    fn similarity(&self, query: &LexicalVector, document: &LexicalVector) -> f32 {
        if query.terms.is_empty() {
            return 0.0;
        }
        let matched = query.terms.iter().filter(|term| document.lowered.contains(term.as_str())).count();
        matched as f32 / query.terms.len() as f32
    }
}
