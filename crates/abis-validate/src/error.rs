//! Error types for the validation engine.
//!
//! Bad data is never one of these: it becomes a `ValidationError` record in
//! the task. These cover I/O, schema resolution and check configuration.

use std::path::PathBuf;

use abis_codec::CodecError;
use abis_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure building a check from its serialized spec.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown check type \"{0}\"")]
    UnknownCheck(String),

    #[error("invalid parameters for check \"{check}\": {source}")]
    InvalidParams {
        check: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("check \"{check}\" is misconfigured: {reason}")]
    Invalid { check: String, reason: String },

    #[error("check \"{check}\" references {kind} lookup \"{name}\" which was not supplied")]
    MissingLookup {
        check: String,
        kind: &'static str,
        name: String,
    },
}

/// Malformed message template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder {{{name}}} in template \"{template}\"")]
    UnknownPlaceholder { name: String, template: String },

    #[error("unbalanced brace at position {position} in template \"{template}\"")]
    UnbalancedBrace { position: usize, template: String },
}

/// Formula that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at position {position}")]
pub struct ExprError {
    pub position: usize,
    pub reason: String,
}

impl ExprError {
    pub fn new(position: usize, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidateError>;
