//! Fields that must be provided together or not at all.

use abis_model::{ErrorKind, Lookups, Row, ValidationError, Whitelist};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::check::{Check, is_escaped, join_fields};
use crate::checks::{WhitelistParams, parse_params, require_fields, resolve_whitelist};
use crate::error::RegistryError;

pub const TYPE: &str = "mutual-inclusion";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::RowConstraint];

#[derive(Debug, Clone, Deserialize)]
struct Params {
    fields: Vec<String>,
    #[serde(default)]
    whitelist: WhitelistParams,
}

#[derive(Debug, Clone)]
pub struct MutualInclusion {
    fields: Vec<String>,
    whitelist: Whitelist,
}

impl MutualInclusion {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            whitelist: Whitelist::new(),
        }
    }

    #[must_use]
    pub fn with_whitelist(mut self, whitelist: Whitelist) -> Self {
        self.whitelist = whitelist;
        self
    }

    pub fn from_params(params: &JsonValue, lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let params: Params = parse_params(TYPE, params)?;
        require_fields(TYPE, &params.fields)?;
        let whitelist = resolve_whitelist(TYPE, &params.whitelist, lookups)?;
        Ok(Box::new(Self::new(params.fields).with_whitelist(whitelist)))
    }
}

impl Check for MutualInclusion {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        let missing: Vec<&String> = self
            .fields
            .iter()
            .filter(|field| !row.is_present(field))
            .collect();
        if missing.is_empty() || missing.len() == self.fields.len() || is_escaped(&self.whitelist, row)
        {
            return Vec::new();
        }
        vec![ValidationError::row_constraint(
            row,
            format!(
                "the fields {} must be provided together (missing: {})",
                join_fields(&self.fields),
                join_fields(&missing)
            ),
        )]
    }
}
