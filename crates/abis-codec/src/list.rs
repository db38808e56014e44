//! Delimited lists of strings, e.g. `https://a.example | https://b.example`.

use abis_model::{Field, Value};

use crate::Codec;
use crate::error::{CodecError, DecodeError, EncodeError, Result};
use crate::string::StringCodec;

pub const DEFAULT_DELIMITER: &str = "|";

#[derive(Debug, Clone)]
pub struct ListCodec {
    delimiter: String,
    item: StringCodec,
}

impl Default for ListCodec {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER, StringCodec::default())
    }
}

impl ListCodec {
    pub fn new(delimiter: impl Into<String>, item: StringCodec) -> Self {
        Self {
            delimiter: delimiter.into(),
            item,
        }
    }

    /// The field's `format` applies to each item, not to the joined text.
    pub fn from_field(field: &Field) -> Result<Self> {
        let delimiter = field.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER);
        if delimiter.is_empty() {
            return Err(CodecError::EmptyDelimiter {
                field: field.name.clone(),
            });
        }
        Ok(Self::new(delimiter, StringCodec::from_field(field)?))
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    fn decode_items<'a, I>(&self, segments: I) -> std::result::Result<Value, DecodeError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut items = Vec::new();
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            items.push(self.item.decode_text(segment)?);
        }
        if items.is_empty() {
            return Ok(Value::Null);
        }
        Ok(Value::List(items))
    }
}

impl Codec for ListCodec {
    fn type_tag(&self) -> &'static str {
        "list"
    }

    fn decode(&self, raw: &Value) -> std::result::Result<Value, DecodeError> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::String(text) => self.decode_items(text.split(self.delimiter.as_str())),
            Value::List(items) => self.decode_items(items.iter().map(String::as_str)),
            other => Err(DecodeError::unexpected("a delimited list", other)),
        }
    }

    fn encode(&self, value: &Value) -> std::result::Result<String, EncodeError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::List(items) => {
                let mut encoded = Vec::with_capacity(items.len());
                for item in items {
                    encoded.push(self.item.encode(&Value::String(item.clone()))?);
                }
                Ok(encoded.join(&self.delimiter))
            }
            other => Err(EncodeError::new("list", other)),
        }
    }
}
