use abis_model::Value;
use thiserror::Error;

/// A raw cell could not be decoded. Reported to the user as a type error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct DecodeError {
    pub reason: String,
}

impl DecodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The input was a decoded value of a variant this codec does not accept.
    pub fn unexpected(expected: &str, found: &Value) -> Self {
        Self::new(format!(
            "expected {expected} but found a {} value",
            found.type_name()
        ))
    }
}

/// Encoding was asked to serialize a value the codec never produces.
///
/// This is a programming error in the caller, not bad input data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("the {codec} codec cannot encode a {found} value")]
pub struct EncodeError {
    pub codec: &'static str,
    pub found: &'static str,
}

impl EncodeError {
    pub fn new(codec: &'static str, found: &Value) -> Self {
        Self {
            codec,
            found: found.type_name(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("field \"{field}\" declares unknown type \"{type_tag}\"")]
    UnknownType { field: String, type_tag: String },
    #[error("field \"{field}\" declares unsupported format \"{format}\" for type \"{type_tag}\"")]
    UnsupportedFormat {
        field: String,
        type_tag: String,
        format: String,
    },
    #[error("field \"{field}\" declares an empty list delimiter")]
    EmptyDelimiter { field: String },
}

pub type Result<T> = std::result::Result<T, CodecError>;
