use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::chunker;
use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Window length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive windows.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, overlap: 100 }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.overlap >= self.chunk_size {
            return Err(Error::InvalidConfiguration(format!(
                "chunking requires chunk_size > 0 and overlap < chunk_size (got chunk_size={}, overlap={})",
                self.chunk_size, self.overlap
            )));
        }
        Ok(())
    }
}

/// Deterministic chunk id: the same `(source, index, content)` always maps
/// to the same id, and a change in any of them changes it.
pub fn chunk_id(source: &str, chunk_index: usize, content: &str) -> ChunkId {
    let digest = blake3::hash(format!("{source}_{chunk_index}_{content}").as_bytes()).to_hex();
    format!("{source}_chunk_{chunk_index}_{}", &digest.as_str()[..16])
}

pub fn fingerprint(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}

#[derive(Debug, Default, Clone)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(chunking_config: ChunkingConfig) -> Result<Self> {
        chunking_config.validate()?;
        Ok(Self { chunking_config })
    }

    pub fn chunking_config(&self) -> &ChunkingConfig {
        &self.chunking_config
    }

    pub fn process_document(&self, content: &str, source: &str) -> Result<Vec<Chunk>> {
        if content.trim().is_empty() {
            return Err(Error::EmptyDocument(source.to_string()));
        }
        let pieces = chunker::chunk(content, self.chunking_config.chunk_size, self.chunking_config.overlap)?;
        let total_chunks = pieces.len();
        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| Chunk {
                id: chunk_id(source, chunk_index, &content),
                fingerprint: fingerprint(&content),
                source: source.to_string(),
                chunk_index,
                total_chunks,
                content,
            })
            .collect();
        debug!(source, chunks = chunks.len(), "processed document");
        Ok(chunks)
    }

    /// Processes one UTF-8 file, labelling its chunks with the path.
    pub fn process_file(&self, file_path: &Path) -> Result<Vec<Chunk>> {
        let content = fs::read_to_string(file_path).map_err(|source| Error::Io { path: file_path.to_path_buf(), source })?;
        self.process_document(&content, &file_path.to_string_lossy())
    }

    /// Processes every file under `data_dir` whose extension is listed.
    /// Sources are paths relative to `data_dir`. Blank files are skipped.
    pub fn process_directory(&self, data_dir: &Path, extensions: &[String]) -> Result<Vec<Chunk>> {
        let files = self.list_files(data_dir, extensions);
        if files.is_empty() {
            warn!(dir = %data_dir.display(), "no matching files found");
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            debug!("Processing file {}/{}: {}", file_index + 1, files.len(), file_path.display());
            let content = fs::read_to_string(file_path).map_err(|source| Error::Io { path: file_path.clone(), source })?;
            let source = self.source_label(file_path, data_dir);
            match self.process_document(&content, &source) {
                Ok(chunks) => all_chunks.extend(chunks),
                Err(Error::EmptyDocument(_)) => warn!(source = %source, "skipping blank document"),
                Err(e) => return Err(e),
            }
        }
        info!("Processed {} files into {} chunks", files.len(), all_chunks.len());
        Ok(all_chunks)
    }

    fn source_label(&self, file_path: &Path, data_dir: &Path) -> String {
        let relative_path = file_path.strip_prefix(data_dir).unwrap_or(file_path);
        relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn list_files(&self, root: &Path, extensions: &[String]) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
            })
            .collect();
        files.sort();
        files
    }
}
