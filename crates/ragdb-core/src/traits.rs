use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::error::{GenerationError, Result};
use crate::types::{Chunk, SearchResult};

/// Turns text into a comparable representation and scores pairs of them.
///
/// The similarity index only ever talks to this trait, so a lexical scorer
/// and a real embedding model are interchangeable.
pub trait Embedder: Send + Sync {
    type Vector: Send + Sync;

    /// Stable identifier of the backend (e.g. `lexical`, `hashing:d1024`).
    fn embedder_id(&self) -> &str;
    fn embed(&self, text: &str) -> Self::Vector;
    /// Relevance of `document` to `query`. Must be non-negative; zero means
    /// "not relevant at all".
    fn similarity(&self, query: &Self::Vector, document: &Self::Vector) -> f32;
}

pub trait SearchEngine: Send + Sync {
    fn store(&self, chunks: &[Chunk]) -> Result<()>;
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
    fn all_sources(&self) -> BTreeSet<String>;
    fn delete(&self, source: &str) -> Result<()>;
}

/// The language-model boundary.
#[async_trait]
pub trait Generator: Send + Sync {
    /// `false` when no model or credentials are configured; callers then
    /// substitute a placeholder answer instead of calling `generate`.
    fn is_available(&self) -> bool;

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> std::result::Result<String, GenerationError>;
}
