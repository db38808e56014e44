//! Whitespace-normalized strings.
//!
//! Stripping happens before any constraint is evaluated, so a cell holding
//! only whitespace is null for `required` and `unique` alike.

use abis_model::{Field, Value};
use url::Url;

use crate::Codec;
use crate::error::{CodecError, DecodeError, EncodeError, Result};

/// Extra validation applied to a stripped string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StringFormat {
    #[default]
    Default,
    /// Absolute URI with a scheme.
    Uri,
}

impl StringFormat {
    pub fn from_field(field: &Field) -> Result<Self> {
        match field.format.as_deref().map(str::trim) {
            None | Some("") | Some("default") => Ok(StringFormat::Default),
            Some("uri") => Ok(StringFormat::Uri),
            Some(other) => Err(CodecError::UnsupportedFormat {
                field: field.name.clone(),
                type_tag: field.field_type.clone(),
                format: other.to_string(),
            }),
        }
    }

    fn check(self, text: &str) -> std::result::Result<(), DecodeError> {
        match self {
            StringFormat::Default => Ok(()),
            StringFormat::Uri => Url::parse(text)
                .map(|_| ())
                .map_err(|_| DecodeError::new(format!("\"{text}\" is not a valid URI"))),
        }
    }
}

/// Strip a raw cell; `None` when nothing is left.
pub fn normalize(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[derive(Debug, Clone, Default)]
pub struct StringCodec {
    format: StringFormat,
}

impl StringCodec {
    pub fn new(format: StringFormat) -> Self {
        Self { format }
    }

    pub fn from_field(field: &Field) -> Result<Self> {
        Ok(Self::new(StringFormat::from_field(field)?))
    }

    /// Decode one stripped, non-empty piece of text.
    pub(crate) fn decode_text(&self, text: &str) -> std::result::Result<String, DecodeError> {
        self.format.check(text)?;
        Ok(text.to_string())
    }
}

impl Codec for StringCodec {
    fn type_tag(&self) -> &'static str {
        "string"
    }

    fn decode(&self, raw: &Value) -> std::result::Result<Value, DecodeError> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::String(text) => match normalize(text) {
                None => Ok(Value::Null),
                Some(text) => self.decode_text(text).map(Value::String),
            },
            other => Err(DecodeError::unexpected("a string", other)),
        }
    }

    fn encode(&self, value: &Value) -> std::result::Result<String, EncodeError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(text) => Ok(text.clone()),
            other => Err(EncodeError::new("string", other)),
        }
    }
}

/// Accepts any cell, normalizing raw text the same way as [`StringCodec`].
#[derive(Debug, Clone, Default)]
pub struct AnyCodec;

impl Codec for AnyCodec {
    fn type_tag(&self) -> &'static str {
        "any"
    }

    fn decode(&self, raw: &Value) -> std::result::Result<Value, DecodeError> {
        match raw {
            Value::String(text) => Ok(normalize(text).map_or(Value::Null, Value::from)),
            other => Ok(other.clone()),
        }
    }

    fn encode(&self, value: &Value) -> std::result::Result<String, EncodeError> {
        Ok(value.to_string())
    }
}
