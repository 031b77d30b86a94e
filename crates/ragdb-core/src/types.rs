//! Domain types shared by the chunker, the similarity index and the
//! grounding layer.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// Source label used when the answer is restricted to a passage the user
/// selected instead of the indexed collection.
pub const SELECTED_TEXT_SOURCE: &str = "selected_text";

/// A segment of a source document that is independently indexed.
///
/// - `id`: derived from `(source, chunk_index, content)`; stable across runs
/// - `content`: the text payload, never blank
/// - `source`: opaque document identifier (usually a path)
/// - `chunk_index`/`total_chunks`: position within the parent document
/// - `fingerprint`: content hash, a cheap stand-in for an embedding key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub content: String,
    pub source: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub fingerprint: String,
}

/// A chunk returned by a search together with its relevance.
///
/// `score` is backend-specific but always non-negative, and higher is
/// always better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}

/// Where the context of a grounded answer comes from. The two modes never
/// mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GroundingRequest {
    /// Retrieve context from the similarity index.
    Indexed { query: String },
    /// Use the caller-supplied passage verbatim; no search happens.
    Restricted { query: String, selected_text: String },
}

impl GroundingRequest {
    /// Builds the request for a user message: a selected passage, even an
    /// empty one, always means restricted mode.
    pub fn from_message(query: &str, selected_text: Option<&str>) -> Self {
        match selected_text {
            Some(selected) => Self::Restricted { query: query.to_string(), selected_text: selected.to_string() },
            None => Self::Indexed { query: query.to_string() },
        }
    }

    pub fn query(&self) -> &str {
        match self {
            Self::Indexed { query } | Self::Restricted { query, .. } => query,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::Indexed { .. } => "indexed",
            Self::Restricted { .. } => "restricted",
        }
    }
}

/// The output contract of every query, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundedAnswer {
    pub response_text: String,
    pub sources: Vec<String>,
}

impl GroundedAnswer {
    pub fn new(response_text: impl Into<String>, sources: Vec<String>) -> Self {
        Self { response_text: response_text.into(), sources }
    }
}
