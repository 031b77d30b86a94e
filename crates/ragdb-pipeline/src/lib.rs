//! ragdb-pipeline
//!
//! The inbound operation surface: index documents, answer questions, list
//! and remove sources. Wires the chunker, the similarity index and the
//! grounding enforcer together around one shared index.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use ragdb_core::config::Settings;
use ragdb_core::data_processor::DataProcessor;
use ragdb_core::error::{Error, Result};
use ragdb_core::traits::{Embedder, Generator};
use ragdb_core::types::{Chunk, ChunkId, GroundedAnswer, GroundingRequest};
use ragdb_embed::{HashingEmbedder, LexicalEmbedder};
use ragdb_grounding::{generator, GroundingEnforcer};
use ragdb_index::SimilarityIndex;
use tracing::{info, info_span, Instrument};

pub struct RagService<E: Embedder> {
    processor: DataProcessor,
    index: Arc<SimilarityIndex<E>>,
    enforcer: GroundingEnforcer<SimilarityIndex<E>>,
    extensions: Vec<String>,
}

impl RagService<LexicalEmbedder> {
    pub fn lexical(settings: &Settings) -> Result<Self> {
        Self::new(settings, LexicalEmbedder::new())
    }
}

impl RagService<HashingEmbedder> {
    pub fn hashing(settings: &Settings) -> Result<Self> {
        Self::new(settings, HashingEmbedder::new(settings.retrieval.hashing_dim))
    }
}

impl<E: Embedder> RagService<E> {
    /// Builds the service with the generator described by
    /// `settings.generation`.
    pub fn new(settings: &Settings, embedder: E) -> Result<Self> {
        Self::with_generator(settings, embedder, generator::from_settings(&settings.generation))
    }

    pub fn with_generator(settings: &Settings, embedder: E, generator: Box<dyn Generator>) -> Result<Self> {
        settings.validate()?;
        let processor = DataProcessor::with_config(settings.chunking.clone())?;
        info!(embedder = embedder.embedder_id(), limit = settings.retrieval.limit, "building rag service");
        let index = Arc::new(SimilarityIndex::new(embedder));
        let enforcer = GroundingEnforcer::new(Arc::clone(&index), generator)
            .with_limit(settings.retrieval.limit)
            .with_timeout(settings.generation.timeout());
        Ok(Self { processor, index, enforcer, extensions: settings.data.extensions.clone() })
    }

    pub fn index_handle(&self) -> &Arc<SimilarityIndex<E>> {
        &self.index
    }

    /// Chunks `content` and stores it under `source`, replacing whatever
    /// that source held before. Returns the new chunk ids in order.
    pub fn index(&self, content: &str, source: &str) -> Result<Vec<ChunkId>> {
        if source.is_empty() {
            return Err(Error::EmptySource);
        }
        let chunks = self.processor.process_document(content, source)?;
        self.index_chunks(source, &chunks)
    }

    pub fn index_file(&self, path: &Path) -> Result<Vec<ChunkId>> {
        let chunks = self.processor.process_file(path)?;
        let source = path.to_string_lossy();
        self.index_chunks(&source, &chunks)
    }

    /// Indexes every matching file under `dir`; returns chunk counts per
    /// source.
    pub fn index_directory(&self, dir: &Path) -> Result<BTreeMap<String, usize>> {
        let chunks = self.processor.process_directory(dir, &self.extensions)?;
        let mut by_source: BTreeMap<String, Vec<Chunk>> = BTreeMap::new();
        for chunk in chunks {
            by_source.entry(chunk.source.clone()).or_default().push(chunk);
        }
        let mut counts = BTreeMap::new();
        for (source, chunks) in by_source {
            let ids = self.index_chunks(&source, &chunks)?;
            counts.insert(source, ids.len());
        }
        Ok(counts)
    }

    /// Stores already-processed chunks of one source, replacing its previous
    /// chunks.
    pub fn index_chunks(&self, source: &str, chunks: &[Chunk]) -> Result<Vec<ChunkId>> {
        self.index.replace_source(source, chunks)?;
        Ok(chunks.iter().map(|c| c.id.clone()).collect())
    }

    /// Answers `message`. Supplying `selected_text`, even an empty one,
    /// restricts the context to that text.
    pub async fn query(&self, message: &str, selected_text: Option<&str>, user_id: Option<&str>) -> GroundedAnswer {
        let request = GroundingRequest::from_message(message, selected_text);
        let span = info_span!("query", user = user_id.unwrap_or("anonymous"), mode = request.mode());
        self.enforcer.answer(&request).instrument(span).await
    }

    pub fn list_sources(&self) -> BTreeSet<String> {
        self.index.all_sources()
    }

    /// Removing an unknown source is not an error.
    pub fn remove_source(&self, source: &str) -> Result<()> {
        let removed = self.index.delete(source)?;
        info!(source, removed, "removed source");
        Ok(())
    }
}
