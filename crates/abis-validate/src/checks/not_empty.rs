use abis_model::{ErrorKind, Lookups, ValidationError};
use serde_json::Value as JsonValue;

use crate::check::{Check, ResourceInfo};
use crate::error::RegistryError;

pub const TYPE: &str = "not-empty";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::TableDimensions];

/// Requires at least one data row.
#[derive(Debug, Clone, Default)]
pub struct NotEmpty;

impl NotEmpty {
    pub fn new() -> Self {
        Self
    }

    pub fn from_params(_params: &JsonValue, _lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        Ok(Box::new(Self::new()))
    }
}

impl Check for NotEmpty {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_end(&mut self, resource: &ResourceInfo) -> Vec<ValidationError> {
        if resource.row_count > 0 {
            return Vec::new();
        }
        vec![ValidationError::table_dimensions("at least one row is required")]
    }
}
