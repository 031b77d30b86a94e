use std::collections::BTreeSet;

use ragdb_core::error::{Error, Result};
use ragdb_core::traits::{Embedder, SearchEngine};
use ragdb_core::types::{Chunk, SearchResult};
use tracing::debug;

use crate::SimilarityIndex;

impl<E: Embedder> SimilarityIndex<E> {
    /// Ranks stored chunks against `query`.
    ///
    /// Chunks scoring zero are never returned. Ties keep insertion order, so
    /// the same store state always yields the same list.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        let query_vector = self.embedder.embed(query);

        let store = self.store.lock();
        let mut scored: Vec<(f32, u64, &Chunk)> = store
            .docs
            .values()
            .filter_map(|doc| {
                let score = self.embedder.similarity(&query_vector, &doc.vector);
                (score > 0.0).then_some((score, doc.seq, &doc.chunk))
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.truncate(limit);
        let results: Vec<SearchResult> =
            scored.into_iter().map(|(score, _, chunk)| SearchResult { chunk: chunk.clone(), score }).collect();
        drop(store);

        debug!(backend = self.embedder.embedder_id(), hits = results.len(), limit, "search");
        Ok(results)
    }
}

impl<E: Embedder> SearchEngine for SimilarityIndex<E> {
    fn store(&self, chunks: &[Chunk]) -> Result<()> {
        Self::store(self, chunks)
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        Self::search(self, query, limit)
    }

    fn all_sources(&self) -> BTreeSet<String> {
        Self::all_sources(self)
    }

    fn delete(&self, source: &str) -> Result<()> {
        Self::delete(self, source).map(|_| ())
    }
}
