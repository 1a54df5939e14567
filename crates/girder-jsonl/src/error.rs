//! Error types for girder-jsonl operations.

use std::io;
use thiserror::Error;

/// The error type for girder-jsonl operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A record could not be serialized, or a strict read hit bad JSON.
    #[error("JSON error at line {line_number}: {source}")]
    Json {
        /// 1-based line the error refers to (0 when writing).
        line_number: usize,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// A specialized Result type for girder-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
