//! A combination of field values may appear only once per resource.
//!
//! The check remembers the first row each tuple was seen on. Because a
//! check is consumed by its scan, the memory starts empty for every resource.

use std::collections::BTreeMap;

use abis_model::{ErrorKind, Lookups, Row, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::check::{Check, join_fields};
use crate::checks::{parse_params, require_fields};
use crate::error::RegistryError;
use crate::template::MessageTemplate;

pub const TYPE: &str = "unique-together";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::RowConstraint];

pub const PLACEHOLDERS: &[&str] = &["fields", "values", "row_number", "first_seen_row_number"];
pub const DEFAULT_MESSAGE: &str = "the fields {fields} with values {values} have already been used in the row at position {first_seen_row_number}";

/// How null cells take part in the tuple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullHandling {
    /// Rows with any null target are neither compared nor recorded.
    #[default]
    Skip,
    /// Null is a value like any other.
    Include,
}

#[derive(Debug, Clone, Deserialize)]
struct Params {
    fields: Vec<String>,
    #[serde(default)]
    null_handling: NullHandling,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UniqueTogether {
    fields: Vec<String>,
    null_handling: NullHandling,
    message: MessageTemplate,
    first_seen: BTreeMap<Vec<Option<String>>, usize>,
}

impl UniqueTogether {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            null_handling: NullHandling::default(),
            message: MessageTemplate::custom_or_default(None, DEFAULT_MESSAGE, PLACEHOLDERS),
            first_seen: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_null_handling(mut self, null_handling: NullHandling) -> Self {
        self.null_handling = null_handling;
        self
    }

    /// Custom wording; falls back to the default when the template is malformed.
    #[must_use]
    pub fn with_message(mut self, template: &str) -> Self {
        self.message = MessageTemplate::custom_or_default(Some(template), DEFAULT_MESSAGE, PLACEHOLDERS);
        self
    }

    pub fn from_params(params: &JsonValue, _lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let params: Params = parse_params(TYPE, params)?;
        require_fields(TYPE, &params.fields)?;
        let mut check = Self::new(params.fields).with_null_handling(params.null_handling);
        if let Some(message) = params.message.as_deref() {
            check = check.with_message(message);
        }
        Ok(Box::new(check))
    }
}

fn render_values(values: &[Option<String>]) -> String {
    values
        .iter()
        .map(|value| match value {
            Some(value) => format!("\"{value}\""),
            None => "null".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl Check for UniqueTogether {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        let values: Vec<Option<String>> = self.fields.iter().map(|field| row.key(field)).collect();
        if self.null_handling == NullHandling::Skip && values.iter().any(Option::is_none) {
            return Vec::new();
        }
        let Some(first_seen) = self.first_seen.get(&values).copied() else {
            self.first_seen.insert(values, row.number());
            return Vec::new();
        };
        let note = self.message.render(&[
            ("fields", join_fields(&self.fields).as_str()),
            ("values", render_values(&values).as_str()),
            ("row_number", row.number().to_string().as_str()),
            ("first_seen_row_number", first_seen.to_string().as_str()),
        ]);
        vec![ValidationError::row_constraint(row, note)]
    }
}
