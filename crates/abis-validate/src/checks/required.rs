//! Required fields with a whitelist keyed on other fields.
//!
//! Like [`LogicalOr`](super::LogicalOr), but a whitelist field that the
//! resource does not declare is a configuration error, reported on every
//! row that reaches the check.

use abis_model::{ErrorKind, Lookups, Row, ValidationError, Whitelist};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::check::{Check, is_escaped, join_fields};
use crate::checks::{WhitelistParams, parse_params, require_fields, resolve_whitelist};
use crate::error::RegistryError;

pub const TYPE: &str = "required";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::RowConstraint, ErrorKind::Check];

#[derive(Debug, Clone, Deserialize)]
struct Params {
    fields: Vec<String>,
    #[serde(default)]
    whitelist: WhitelistParams,
}

#[derive(Debug, Clone)]
pub struct Required {
    fields: Vec<String>,
    whitelist: Whitelist,
}

impl Required {
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

impl Check for Required {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = self
            .whitelist
            .keys()
            .filter(|field| !row.contains_field(field))
            .map(|field| {
                ValidationError::check_error(
                    Some(row),
                    format!("whitelist field \"{field}\" does not exist in the resource"),
                )
            })
            .collect();

        if self.fields.iter().all(|field| !row.is_present(field)) && !is_escaped(&self.whitelist, row)
        {
            errors.push(ValidationError::row_constraint(
                row,
                format!(
                    "one or more of the fields {} must be provided",
                    join_fields(&self.fields)
                ),
            ));
        }
        errors
    }
}
