//! Cell codecs for typed columns.
//!
//! A codec turns a raw cell into a typed [`Value`] and back. Codecs are pure:
//! the same input always yields the same output and nothing else is touched.
//! Decoding failures are [`DecodeError`]s that the engine reports as type
//! errors; encoding failures are [`EncodeError`]s and indicate a caller bug.

pub mod error;
pub mod geometry;
pub mod list;
pub mod primitive;
pub mod registry;
pub mod string;
pub mod temporal;

use std::fmt;

use abis_model::Value;

pub use error::{CodecError, DecodeError, EncodeError, Result};
pub use geometry::{DEFAULT_PRECISION, WktCodec};
pub use list::{DEFAULT_DELIMITER, ListCodec};
pub use primitive::{BooleanCodec, IntegerCodec, NumberCodec};
pub use registry::{CodecFactory, TypeRegistry};
pub use string::{AnyCodec, StringCodec, StringFormat};
pub use temporal::{TimestampCodec, parse_timestamp};

/// Reader/writer pair for one cell type.
pub trait Codec: fmt::Debug + Send + Sync {
    /// Type tag the codec is registered under.
    fn type_tag(&self) -> &'static str;

    /// Decode a raw string or pass through an already-decoded value of this type.
    ///
    /// `Value::Null` always decodes to `Value::Null`.
    fn decode(&self, raw: &Value) -> std::result::Result<Value, DecodeError>;

    /// Serialize a value previously produced by [`Codec::decode`].
    fn encode(&self, value: &Value) -> std::result::Result<String, EncodeError>;

    fn decode_str(&self, raw: &str) -> std::result::Result<Value, DecodeError> {
        self.decode(&Value::String(raw.to_string()))
    }
}
