use std::collections::HashSet;

use ragdb_core::types::SearchResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledContext {
    pub text: String,
    /// Distinct source labels in first-seen order.
    pub sources: Vec<String>,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.sources.is_empty()
    }
}

/// Joins already-ranked results into one context block. No results is a
/// valid outcome meaning "nothing relevant", not an error.
pub fn assemble(results: &[SearchResult]) -> AssembledContext {
    let text = results
        .iter()
        .map(|r| format!("Source: {}\nContent: {}", r.chunk.source, r.chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut seen = HashSet::new();
    let mut sources = Vec::new();
    for r in results {
        if seen.insert(r.chunk.source.as_str()) {
            sources.push(r.chunk.source.clone());
        }
    }

    AssembledContext { text, sources }
}
