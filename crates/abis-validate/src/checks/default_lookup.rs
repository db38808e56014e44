//! A value field may be left empty only when a default exists for its key.

use std::fmt;
use std::sync::Arc;

use abis_model::{DefaultMap, ErrorKind, Lookups, Row, ValidationError};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::check::Check;
use crate::checks::parse_params;
use crate::error::RegistryError;
use crate::template::MessageTemplate;

pub const TYPE: &str = "default-lookup";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::RowConstraint];

pub const PLACEHOLDERS: &[&str] = &["key_field", "value_field", "key_value"];
pub const DEFAULT_MISSING_KEY_MESSAGE: &str =
    "{value_field} must be provided when {key_field} is not provided";
pub const DEFAULT_NO_DEFAULT_MESSAGE: &str =
    "{value_field} must be provided because no default exists for {key_field} \"{key_value}\"";

type KeyFn = dyn Fn(&Row) -> Option<String> + Send + Sync;

/// How the lookup key is derived from a row.
pub enum KeySource {
    Field(String),
    /// Values of several fields joined with `|`; missing if any part is null.
    Composite(Vec<String>),
    /// Computed key; `label` names it in messages.
    Computed { label: String, key: Box<KeyFn> },
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Field(field) => f.debug_tuple("Field").field(field).finish(),
            KeySource::Composite(fields) => f.debug_tuple("Composite").field(fields).finish(),
            KeySource::Computed { label, .. } => {
                f.debug_struct("Computed").field("label", label).finish_non_exhaustive()
            }
        }
    }
}

impl KeySource {
    pub fn computed<F>(label: impl Into<String>, key: F) -> Self
    where
        F: Fn(&Row) -> Option<String> + Send + Sync + 'static,
    {
        KeySource::Computed {
            label: label.into(),
            key: Box::new(key),
        }
    }

    fn label(&self) -> String {
        match self {
            KeySource::Field(field) => field.clone(),
            KeySource::Composite(fields) => fields.join(" and "),
            KeySource::Computed { label, .. } => label.clone(),
        }
    }

    fn key(&self, row: &Row) -> Option<String> {
        match self {
            KeySource::Field(field) => row.key(field),
            KeySource::Composite(fields) => fields
                .iter()
                .map(|field| row.key(field))
                .collect::<Option<Vec<_>>>()
                .map(|parts| parts.join("|")),
            KeySource::Computed { key, .. } => key(row),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum KeyParams {
    Field(String),
    Composite(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
struct Params {
    key: KeyParams,
    value_field: String,
    lookup: String,
    #[serde(default)]
    missing_key_message: Option<String>,
    #[serde(default)]
    no_default_message: Option<String>,
}

#[derive(Debug)]
pub struct DefaultLookup {
    key: KeySource,
    key_label: String,
    value_field: String,
    defaults: Arc<DefaultMap>,
    missing_key_message: MessageTemplate,
    no_default_message: MessageTemplate,
}

impl DefaultLookup {
    pub fn new(key: KeySource, value_field: impl Into<String>, defaults: Arc<DefaultMap>) -> Self {
        Self {
            key_label: key.label(),
            key,
            value_field: value_field.into(),
            defaults,
            missing_key_message: MessageTemplate::custom_or_default(
                None,
                DEFAULT_MISSING_KEY_MESSAGE,
                PLACEHOLDERS,
            ),
            no_default_message: MessageTemplate::custom_or_default(
                None,
                DEFAULT_NO_DEFAULT_MESSAGE,
                PLACEHOLDERS,
            ),
        }
    }

    #[must_use]
    pub fn with_messages(mut self, missing_key: Option<&str>, no_default: Option<&str>) -> Self {
        self.missing_key_message =
            MessageTemplate::custom_or_default(missing_key, DEFAULT_MISSING_KEY_MESSAGE, PLACEHOLDERS);
        self.no_default_message =
            MessageTemplate::custom_or_default(no_default, DEFAULT_NO_DEFAULT_MESSAGE, PLACEHOLDERS);
        self
    }

    pub fn from_params(params: &JsonValue, lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let params: Params = parse_params(TYPE, params)?;
        let defaults = lookups
            .default_map(&params.lookup)
            .ok_or_else(|| RegistryError::MissingLookup {
                check: TYPE.to_string(),
                kind: "default",
                name: params.lookup.clone(),
            })?;
        let key = match params.key {
            KeyParams::Field(field) => KeySource::Field(field),
            KeyParams::Composite(fields) if fields.is_empty() => {
                return Err(RegistryError::Invalid {
                    check: TYPE.to_string(),
                    reason: "a composite key needs at least one field".to_string(),
                });
            }
            KeyParams::Composite(fields) => KeySource::Composite(fields),
        };
        Ok(Box::new(
            Self::new(key, params.value_field, defaults).with_messages(
                params.missing_key_message.as_deref(),
                params.no_default_message.as_deref(),
            ),
        ))
    }
}

impl Check for DefaultLookup {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        if row.is_present(&self.value_field) {
            return Vec::new();
        }
        let note = match self.key.key(row) {
            None => self.missing_key_message.render(&[
                ("key_field", self.key_label.as_str()),
                ("value_field", self.value_field.as_str()),
                ("key_value", ""),
            ]),
            Some(key) if self.defaults.contains_key(&key) => return Vec::new(),
            Some(key) => self.no_default_message.render(&[
                ("key_field", self.key_label.as_str()),
                ("value_field", self.value_field.as_str()),
                ("key_value", key.as_str()),
            ]),
        };
        vec![ValidationError::row_constraint(row, note)]
    }
}
