use abis_model::Value;

use crate::Codec;
use crate::error::{DecodeError, EncodeError};
use crate::string::normalize;

const TRUE_VALUES: &[&str] = &["true", "True", "TRUE", "1"];
const FALSE_VALUES: &[&str] = &["false", "False", "FALSE", "0"];

#[derive(Debug, Clone, Default)]
pub struct IntegerCodec;

impl Codec for IntegerCodec {
    fn type_tag(&self) -> &'static str {
        "integer"
    }

    fn decode(&self, raw: &Value) -> Result<Value, DecodeError> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Integer(value) => Ok(Value::Integer(*value)),
            Value::String(text) => match normalize(text) {
                None => Ok(Value::Null),
                Some(text) => text
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| DecodeError::new(format!("\"{text}\" is not an integer"))),
            },
            other => Err(DecodeError::unexpected("an integer", other)),
        }
    }

    fn encode(&self, value: &Value) -> Result<String, EncodeError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::Integer(value) => Ok(value.to_string()),
            other => Err(EncodeError::new("integer", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NumberCodec;

impl Codec for NumberCodec {
    fn type_tag(&self) -> &'static str {
        "number"
    }

    fn decode(&self, raw: &Value) -> Result<Value, DecodeError> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Number(value) => Ok(Value::Number(*value)),
            Value::Integer(value) => Ok(Value::Number(*value as f64)),
            Value::String(text) => match normalize(text) {
                None => Ok(Value::Null),
                Some(text) => match text.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(Value::Number(value)),
                    _ => Err(DecodeError::new(format!("\"{text}\" is not a number"))),
                },
            },
            other => Err(DecodeError::unexpected("a number", other)),
        }
    }

    fn encode(&self, value: &Value) -> Result<String, EncodeError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::Number(value) => Ok(value.to_string()),
            other => Err(EncodeError::new("number", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BooleanCodec;

impl Codec for BooleanCodec {
    fn type_tag(&self) -> &'static str {
        "boolean"
    }

    fn decode(&self, raw: &Value) -> Result<Value, DecodeError> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Boolean(value) => Ok(Value::Boolean(*value)),
            Value::String(text) => match normalize(text) {
                None => Ok(Value::Null),
                Some(text) if TRUE_VALUES.contains(&text) => Ok(Value::Boolean(true)),
                Some(text) if FALSE_VALUES.contains(&text) => Ok(Value::Boolean(false)),
                Some(text) => Err(DecodeError::new(format!("\"{text}\" is not a boolean"))),
            },
            other => Err(DecodeError::unexpected("a boolean", other)),
        }
    }

    fn encode(&self, value: &Value) -> Result<String, EncodeError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::Boolean(value) => Ok(value.to_string()),
            other => Err(EncodeError::new("boolean", other)),
        }
    }
}
