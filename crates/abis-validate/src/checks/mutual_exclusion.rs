//! At most one field of a group, or exactly one with `or_behavior`.

use abis_model::{ErrorKind, Lookups, Row, ValidationError};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::check::{Check, join_fields};
use crate::checks::{parse_params, require_fields};
use crate::error::RegistryError;

pub const TYPE: &str = "mutual-exclusion";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::RowConstraint];

#[derive(Debug, Clone, Deserialize)]
struct Params {
    fields: Vec<String>,
    #[serde(default)]
    or_behavior: bool,
}

#[derive(Debug, Clone)]
pub struct MutualExclusion {
    fields: Vec<String>,
    or_behavior: bool,
}

impl MutualExclusion {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            or_behavior: false,
        }
    }

    /// Also fail rows where none of the fields is provided.
    #[must_use]
    pub fn with_or_behavior(mut self, or_behavior: bool) -> Self {
        self.or_behavior = or_behavior;
        self
    }

    pub fn from_params(params: &JsonValue, _lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let params: Params = parse_params(TYPE, params)?;
        require_fields(TYPE, &params.fields)?;
        Ok(Box::new(Self::new(params.fields).with_or_behavior(params.or_behavior)))
    }
}

impl Check for MutualExclusion {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        let present: Vec<&String> = self
            .fields
            .iter()
            .filter(|field| row.is_present(field))
            .collect();
        let note = match present.len() {
            0 if self.or_behavior => format!(
                "exactly one of the fields {} must be provided",
                join_fields(&self.fields)
            ),
            0 | 1 => return Vec::new(),
            _ => format!(
                "the fields {} are mutually exclusive (provided: {})",
                join_fields(&self.fields),
                join_fields(&present)
            ),
        };
        vec![ValidationError::row_constraint(row, note)]
    }
}
