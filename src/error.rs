//! Error types for one-brc

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Any of these aborts the run and is surfaced to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to map {path} into memory: {source}")]
    BufferMap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Per-line failures. The chunk aggregator logs these and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    MalformedRecord(&'static str),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

/// Result type alias for fatal operations
pub type Result<T> = std::result::Result<T, Error>;
