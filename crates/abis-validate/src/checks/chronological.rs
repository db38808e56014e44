//! Date-like fields must be in non-decreasing order.
//!
//! Each adjacent pair of fields is compared when both values are present.
//! Values of different precision are compared at the coarser precision, so
//! `2020` is neither before nor after `2020-06-30`.

use std::cmp::Ordering;

use abis_codec::parse_timestamp;
use abis_model::{ErrorKind, Lookups, Row, Timestamp, ValidationError, Value};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::check::Check;
use crate::checks::parse_params;
use crate::error::RegistryError;

pub const TYPE: &str = "chronological-order";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::RowConstraint, ErrorKind::Check];

#[derive(Debug, Clone, Deserialize)]
struct Params {
    fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ChronologicalOrder {
    fields: Vec<String>,
}

impl ChronologicalOrder {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_params(params: &JsonValue, _lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let params: Params = parse_params(TYPE, params)?;
        Ok(Box::new(Self::new(params.fields)))
    }
}

/// Temporal view of a cell; text cells are parsed, anything else is ignored.
fn timestamp_of(value: &Value) -> Option<Timestamp> {
    match value {
        Value::Timestamp(timestamp) => Some(timestamp.clone()),
        Value::String(text) => parse_timestamp(text.trim()).ok(),
        _ => None,
    }
}

impl Check for ChronologicalOrder {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        if self.fields.len() < 2 {
            return vec![ValidationError::check_error(
                Some(row),
                "chronological order requires at least two fields",
            )];
        }
        self.fields
            .windows(2)
            .filter_map(|pair| {
                let (first, second) = (&pair[0], &pair[1]);
                let first_value = timestamp_of(row.get(first))?;
                let second_value = timestamp_of(row.get(second))?;
                (first_value.cmp_common_precision(&second_value) == Ordering::Greater).then(|| {
                    ValidationError::row_constraint(
                        row,
                        format!(
                            "{first} ({first_value}) must not be later than {second} ({second_value})"
                        ),
                    )
                })
            })
            .collect()
    }
}
