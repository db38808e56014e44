use abis_model::{ErrorKind, Lookups, ValidationError};
use serde_json::Value as JsonValue;

use crate::check::{Check, ResourceInfo};
use crate::error::RegistryError;

pub const TYPE: &str = "tabular";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::Source];

const TABULAR_FORMATS: &[&str] = &["csv", "tsv"];

/// Fails the scan before any row when the resource is not a delimited table
/// with a header row.
#[derive(Debug, Clone, Default)]
pub struct Tabular;

impl Tabular {
    pub fn new() -> Self {
        Self
    }

    pub fn from_params(_params: &JsonValue, _lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        Ok(Box::new(Self::new()))
    }
}

impl Check for Tabular {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_start(&mut self, resource: &ResourceInfo) -> Vec<ValidationError> {
        let tabular_format = TABULAR_FORMATS.contains(&resource.format.as_str());
        let has_header = resource
            .header
            .as_ref()
            .is_some_and(|header| !header.is_empty());
        if tabular_format && has_header {
            return Vec::new();
        }
        vec![ValidationError::source("the resource is not tabular")]
    }
}
