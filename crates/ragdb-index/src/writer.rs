use std::collections::{BTreeSet, HashMap};

use ragdb_core::error::{Error, Result};
use ragdb_core::traits::Embedder;
use ragdb_core::types::Chunk;
use tracing::{debug, warn};

use crate::{IndexedDocument, SimilarityIndex, Store};

impl<E: Embedder> SimilarityIndex<E> {
    /// Upserts every chunk by id. An id that is already stored, or repeated
    /// within the batch, with different content is rejected as corruption
    /// and nothing is written.
    pub fn store(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Err(Error::EmptyInput);
        }
        let embedded = self.embed_chunks(chunks);
        if embedded.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut store = self.store.lock();
        check_collisions(&store, &embedded, None)?;
        let written = embedded.len();
        upsert(&mut store, embedded);
        debug!(chunks = written, total = store.docs.len(), "stored chunks");
        Ok(())
    }

    /// Removes every chunk of `source` and stores `chunks` in its place,
    /// under one lock acquisition.
    pub fn replace_source(&self, source: &str, chunks: &[Chunk]) -> Result<()> {
        if source.is_empty() {
            return Err(Error::EmptySource);
        }
        if chunks.is_empty() {
            return Err(Error::EmptyInput);
        }
        let embedded = self.embed_chunks(chunks);
        if embedded.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut store = self.store.lock();
        check_collisions(&store, &embedded, Some(source))?;
        let before = store.docs.len();
        store.docs.retain(|_, doc| doc.chunk.source != source);
        let removed = before - store.docs.len();
        let written = embedded.len();
        upsert(&mut store, embedded);
        debug!(source, removed, chunks = written, "replaced source");
        Ok(())
    }

    /// Removes every chunk whose source equals `source`; returns how many
    /// were removed. Unknown sources are not an error.
    pub fn delete(&self, source: &str) -> Result<usize> {
        if source.is_empty() {
            return Err(Error::EmptySource);
        }
        let mut store = self.store.lock();
        let before = store.docs.len();
        store.docs.retain(|_, doc| doc.chunk.source != source);
        let removed = before - store.docs.len();
        debug!(source, removed, "deleted source");
        Ok(removed)
    }

    pub fn all_sources(&self) -> BTreeSet<String> {
        self.store.lock().docs.values().map(|doc| doc.chunk.source.clone()).collect()
    }

    fn embed_chunks(&self, chunks: &[Chunk]) -> Vec<(Chunk, E::Vector)> {
        chunks
            .iter()
            .filter(|chunk| {
                let keep = !chunk.content.trim().is_empty();
                if !keep {
                    warn!(id = %chunk.id, "refusing to store blank chunk");
                }
                keep
            })
            .map(|chunk| (chunk.clone(), self.embedder.embed(&chunk.content)))
            .collect()
    }
}

/// `replacing` names a source whose current chunks are about to be removed
/// and therefore cannot collide.
fn check_collisions<V>(store: &Store<V>, incoming: &[(Chunk, V)], replacing: Option<&str>) -> Result<()> {
    let mut batch: HashMap<&str, &str> = HashMap::new();
    for (chunk, _) in incoming {
        if let Some(existing) = store.docs.get(&chunk.id) {
            let replaced = replacing.is_some_and(|source| existing.chunk.source == source);
            if !replaced && existing.chunk.content != chunk.content {
                return Err(Error::IndexCorruption { id: chunk.id.clone() });
            }
        }
        if let Some(previous) = batch.insert(chunk.id.as_str(), chunk.content.as_str()) {
            if previous != chunk.content {
                return Err(Error::IndexCorruption { id: chunk.id.clone() });
            }
        }
    }
    Ok(())
}

fn upsert<V>(store: &mut Store<V>, incoming: Vec<(Chunk, V)>) {
    for (chunk, vector) in incoming {
        let seq = match store.docs.get(&chunk.id) {
            Some(existing) => existing.seq,
            None => {
                store.next_seq += 1;
                store.next_seq
            }
        };
        store.docs.insert(chunk.id.clone(), IndexedDocument { chunk, vector, seq });
    }
}
