//! Boolean formula over row fields and named side inputs.

use std::collections::BTreeMap;

use abis_model::{ErrorKind, Lookups, Row, ValidationError};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::check::Check;
use crate::checks::parse_params;
use crate::error::{ExprError, RegistryError};
use crate::expr::{Expr, ExprValue};

pub const TYPE: &str = "row-constraint";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::RowConstraint, ErrorKind::Check];

#[derive(Debug, Clone, Deserialize)]
struct Params {
    formula: String,
    #[serde(default)]
    side_inputs: BTreeMap<String, JsonValue>,
}

#[derive(Debug, Clone)]
pub struct RowConstraint {
    formula: String,
    expr: Result<Expr, ExprError>,
    side_inputs: BTreeMap<String, ExprValue>,
}

impl RowConstraint {
    /// An unparsable formula is reported as a check error on every row.
    pub fn new(formula: impl Into<String>) -> Self {
        let formula = formula.into();
        Self {
            expr: Expr::parse(&formula),
            formula,
            side_inputs: BTreeMap::new(),
        }
    }

    /// Add a named constant visible to the formula.
    #[must_use]
    pub fn with_side_input(mut self, name: impl Into<String>, value: &JsonValue) -> Self {
        self.side_inputs.insert(name.into(), ExprValue::from_json(value));
        self
    }

    pub fn from_params(params: &JsonValue, _lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let params: Params = parse_params(TYPE, params)?;
        let check = params
            .side_inputs
            .iter()
            .fold(Self::new(params.formula), |check, (name, value)| {
                check.with_side_input(name.clone(), value)
            });
        Ok(Box::new(check))
    }
}

impl Check for RowConstraint {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        let expr = match &self.expr {
            Ok(expr) => expr,
            Err(reason) => {
                return vec![ValidationError::check_error(
                    Some(row),
                    format!("the formula \"{}\" is invalid: {reason}", self.formula),
                )];
            }
        };

        let collisions: Vec<ValidationError> = self
            .side_inputs
            .keys()
            .filter(|name| row.contains_field(name))
            .map(|name| {
                ValidationError::check_error(
                    Some(row),
                    format!("side input \"{name}\" collides with a field of the same name"),
                )
            })
            .collect();
        if !collisions.is_empty() {
            return collisions;
        }

        let resolve = |name: &str| match self.side_inputs.get(name) {
            Some(value) => value.clone(),
            None => ExprValue::from_value(row.get(name)),
        };
        if expr.evaluate(&resolve).is_truthy() {
            return Vec::new();
        }
        vec![ValidationError::row_constraint(
            row,
            format!("the row constraint \"{}\" is not satisfied", self.formula),
        )]
    }
}
