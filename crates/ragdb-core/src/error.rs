use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Document content cannot be empty (source: {0})")]
    EmptyDocument(String),

    #[error("Search query cannot be empty")]
    EmptyQuery,

    #[error("No chunks provided to store")]
    EmptyInput,

    #[error("Document source cannot be empty")]
    EmptySource,

    /// Two different contents were presented under the same chunk id.
    #[error("Chunk id collision for '{id}': stored content differs from incoming content")]
    IndexCorruption { id: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure at the language-model boundary. Never surfaces past the
/// grounding layer; it is folded into a well-formed answer there.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no language model is configured")]
    Unavailable,

    #[error("generation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model returned an empty completion")]
    EmptyCompletion,
}
