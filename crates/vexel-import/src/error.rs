//! Error taxonomy for the import pipeline.
//!
//! Hard failures leave the caller's document untouched: a broken container,
//! a container with nothing to read, or a payload no parser accepts. Sparse
//! or odd content inside a readable payload is never an error; the converter
//! degrades to fallback passes instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// The byte stream is not a readable zip container.
    #[error("not a readable archive: {0}")]
    MalformedArchive(String),
    /// The archive was opened but holds no data file at all.
    #[error("no data file in archive")]
    NoDataFile,
    /// The chosen data file could not be parsed.
    #[error("unreadable document payload: {0}")]
    UnparsablePayload(String),
    /// The input matches none of the supported formats.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    /// Writing an export document failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ImportResult<T> = Result<T, ImportError>;
