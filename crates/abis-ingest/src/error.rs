//! Error types for resource ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Failures opening or streaming a resource.
///
/// Malformed data inside well-formed records is not an ingest error; the
/// engine reports it as validation errors.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Data file not found.
    #[error("data file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Byte-order mark of an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// CSV syntax or I/O failure while reading records.
    #[error("failed to parse {resource}: {source}")]
    Csv {
        resource: String,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
