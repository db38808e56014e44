//! Static registry from field type tag to codec factory.
//!
//! The built-in table is created once on first use. Schemas resolve each
//! field's type through it when a scan starts.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use abis_model::{Field, Schema};
use tracing::debug;

use crate::Codec;
use crate::error::{CodecError, Result};
use crate::geometry::WktCodec;
use crate::list::ListCodec;
use crate::primitive::{BooleanCodec, IntegerCodec, NumberCodec};
use crate::string::{AnyCodec, StringCodec};
use crate::temporal::TimestampCodec;

/// Builds a codec for one field.
pub type CodecFactory = fn(&Field) -> Result<Box<dyn Codec>>;

static BUILTIN: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::with_builtin);

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    factories: BTreeMap<&'static str, CodecFactory>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared registry holding every built-in type.
    pub fn global() -> &'static TypeRegistry {
        &BUILTIN
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("string", |field| Ok(Box::new(StringCodec::from_field(field)?)));
        registry.register("any", |_| Ok(Box::new(AnyCodec)));
        registry.register("integer", |_| Ok(Box::new(IntegerCodec)));
        registry.register("number", |_| Ok(Box::new(NumberCodec)));
        registry.register("boolean", |_| Ok(Box::new(BooleanCodec)));
        registry.register("timestamp", |_| Ok(Box::new(TimestampCodec)));
        registry.register("wkt", |field| Ok(Box::new(WktCodec::from_field(field)?)));
        registry.register("list", |field| Ok(Box::new(ListCodec::from_field(field)?)));
        registry
    }

    /// Register or replace the factory for a type tag.
    pub fn register(&mut self, type_tag: &'static str, factory: CodecFactory) {
        self.factories.insert(type_tag, factory);
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.factories.contains_key(type_tag)
    }

    pub fn type_tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Build the codec declared by a field.
    pub fn resolve(&self, field: &Field) -> Result<Box<dyn Codec>> {
        let factory = self
            .factories
            .get(field.field_type.trim())
            .ok_or_else(|| CodecError::UnknownType {
                field: field.name.clone(),
                type_tag: field.field_type.clone(),
            })?;
        debug!(field = %field.name, type_tag = %field.field_type, "resolved field codec");
        factory(field)
    }

    /// Build codecs for every field of a schema, in field order.
    pub fn resolve_schema(&self, schema: &Schema) -> Result<Vec<Box<dyn Codec>>> {
        schema.fields.iter().map(|field| self.resolve(field)).collect()
    }
}
