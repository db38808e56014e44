//! Key values must come from a set built from another template.

use std::collections::BTreeSet;
use std::sync::Arc;

use abis_model::{AllowedSet, ErrorKind, Lookups, Row, ValidationError, Value};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::check::Check;
use crate::checks::{SetSource, parse_params};
use crate::error::RegistryError;

pub const TYPE: &str = "set-membership";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::Constraint];

/// Run the rule only when `field` holds one of `values`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Gate {
    pub field: String,
    pub values: BTreeSet<String>,
}

impl Gate {
    pub fn new<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn is_open(&self, row: &Row) -> bool {
        row.key(&self.field)
            .is_some_and(|value| self.values.contains(&value))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Params {
    field: String,
    #[serde(default)]
    source_field: Option<String>,
    template: String,
    set: SetSource,
    #[serde(default)]
    only_when: Option<Gate>,
}

#[derive(Debug, Clone)]
pub struct SetMembership {
    field: String,
    source_field: String,
    template: String,
    allowed: Arc<AllowedSet>,
    gate: Option<Gate>,
}

impl SetMembership {
    /// `source_field` defaults to `field`.
    pub fn new(field: impl Into<String>, template: impl Into<String>, allowed: Arc<AllowedSet>) -> Self {
        let field = field.into();
        Self {
            source_field: field.clone(),
            field,
            template: template.into(),
            allowed,
            gate: None,
        }
    }

    /// Name of the column in the source template, used in messages.
    #[must_use]
    pub fn with_source_field(mut self, source_field: impl Into<String>) -> Self {
        self.source_field = source_field.into();
        self
    }

    #[must_use]
    pub fn only_when(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn from_params(params: &JsonValue, lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let params: Params = parse_params(TYPE, params)?;
        let allowed = params.set.resolve(TYPE, lookups)?;
        let mut check = Self::new(params.field, params.template, allowed);
        if let Some(source_field) = params.source_field {
            check = check.with_source_field(source_field);
        }
        if let Some(gate) = params.only_when {
            check = check.only_when(gate);
        }
        Ok(Box::new(check))
    }

    fn is_member(&self, value: &Value) -> bool {
        match value {
            Value::List(items) => items.iter().all(|item| self.allowed.contains(item)),
            other => other.as_key().is_none_or(|key| self.allowed.contains(&key)),
        }
    }
}

impl Check for SetMembership {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        if self.gate.as_ref().is_some_and(|gate| !gate.is_open(row)) {
            return Vec::new();
        }
        if self.is_member(row.get(&self.field)) {
            return Vec::new();
        }
        vec![ValidationError::constraint(
            row,
            &self.field,
            format!(
                "{} must match a {} in the {} template",
                self.field, self.source_field, self.template
            ),
        )]
    }
}
