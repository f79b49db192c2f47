//! Library error type

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("Malformed chapter markup: {0}")]
    MalformedContent(String),

    #[error("Failed to read corpus at {path}: {source}")]
    CorpusLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid corpus JSON in {path}: {source}")]
    CorpusParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Remote chat backend failed: {0}")]
    RemoteBackend(String),

    #[error("Reader state error: {0}")]
    State(String),
}

pub type Result<T> = std::result::Result<T, BookError>;
