//! ragdb-index
//!
//! In-memory similarity index over document chunks. One lock guards the
//! keyed store so that `store`, `search` and `delete` never interleave;
//! embedding happens outside the lock.

pub mod search;
pub mod writer;

use std::collections::HashMap;

use parking_lot::Mutex;
use ragdb_core::traits::Embedder;
use ragdb_core::types::{Chunk, ChunkId};
use ragdb_embed::LexicalEmbedder;

/// A stored chunk together with its embedded representation.
#[derive(Debug, Clone)]
pub struct IndexedDocument<V> {
    pub chunk: Chunk,
    pub vector: V,
    /// Insertion order; breaks score ties so results stay deterministic.
    pub(crate) seq: u64,
}

pub(crate) struct Store<V> {
    pub(crate) docs: HashMap<ChunkId, IndexedDocument<V>>,
    pub(crate) next_seq: u64,
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Self { docs: HashMap::new(), next_seq: 0 }
    }
}

pub struct SimilarityIndex<E: Embedder> {
    pub(crate) embedder: E,
    pub(crate) store: Mutex<Store<E::Vector>>,
}

impl SimilarityIndex<LexicalEmbedder> {
    /// Index scored by the reference lexical policy.
    pub fn lexical() -> Self {
        Self::new(LexicalEmbedder::new())
    }
}

impl<E: Embedder> SimilarityIndex<E> {
    pub fn new(embedder: E) -> Self {
        Self { embedder, store: Mutex::new(Store::default()) }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn len(&self) -> usize {
        self.store.lock().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<Chunk> {
        self.store.lock().docs.get(id).map(|doc| doc.chunk.clone())
    }

    /// Ids of every chunk stored for `source`, in chunk order.
    pub fn chunk_ids(&self, source: &str) -> Vec<ChunkId> {
        let store = self.store.lock();
        let mut chunks: Vec<&Chunk> = store.docs.values().map(|doc| &doc.chunk).filter(|c| c.source == source).collect();
        chunks.sort_by_key(|c| c.chunk_index);
        chunks.into_iter().map(|c| c.id.clone()).collect()
    }
}
