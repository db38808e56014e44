//! Declared field constraints, evaluated per cell after decoding.

use std::collections::BTreeMap;

use abis_model::{ErrorKind, Field, ValidationError, Value};

/// Constraint state for one schema field during one scan.
#[derive(Debug, Clone)]
pub(crate) struct FieldConstraints {
    name: String,
    position: usize,
    required: bool,
    enum_values: Option<Vec<String>>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    /// Value key to the first row it was seen on; `None` when not unique.
    unique: Option<BTreeMap<String, usize>>,
}

impl FieldConstraints {
    /// `position` is the 1-based field number.
    pub(crate) fn new(field: &Field, position: usize) -> Self {
        let constraints = &field.constraints;
        Self {
            name: field.name.clone(),
            position,
            required: constraints.required,
            enum_values: constraints.enum_values.clone(),
            min_length: constraints.min_length,
            max_length: constraints.max_length,
            unique: constraints.unique.then(BTreeMap::new),
        }
    }

    fn error(&self, kind: ErrorKind, row_number: usize, cell: &str, note: String) -> ValidationError {
        ValidationError::new(kind, note)
            .at_row(row_number)
            .at_field(self.position, self.name.clone())
            .with_cell(cell)
    }

    pub(crate) fn check(&mut self, row_number: usize, cell: &str, value: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if value.is_null() {
            if self.required {
                errors.push(self.error(
                    ErrorKind::Constraint,
                    row_number,
                    cell,
                    "constraint \"required\" is \"true\"".to_string(),
                ));
            }
            return errors;
        }

        if let Some(allowed) = &self.enum_values {
            let in_enum = match value {
                Value::List(items) => items.iter().all(|item| allowed.contains(item)),
                other => other.as_key().is_some_and(|key| allowed.contains(&key)),
            };
            if !in_enum {
                let listed = allowed.join(", ");
                errors.push(self.error(
                    ErrorKind::Constraint,
                    row_number,
                    cell,
                    format!("constraint \"enum\" is \"{listed}\""),
                ));
            }
        }

        let length = match value {
            Value::List(items) => items.len(),
            other => other.to_string().chars().count(),
        };
        if let Some(min) = self.min_length
            && length < min
        {
            errors.push(self.error(
                ErrorKind::Constraint,
                row_number,
                cell,
                format!("constraint \"minLength\" is \"{min}\""),
            ));
        }
        if let Some(max) = self.max_length
            && length > max
        {
            errors.push(self.error(
                ErrorKind::Constraint,
                row_number,
                cell,
                format!("constraint \"maxLength\" is \"{max}\""),
            ));
        }

        if let Some(key) = value.as_key()
            && let Some(seen) = self.unique.as_mut()
        {
            match seen.get(&key).copied() {
                Some(first) => errors.push(self.error(
                    ErrorKind::Unique,
                    row_number,
                    cell,
                    format!("the same as in the row at position {first}"),
                )),
                None => {
                    seen.insert(key, row_number);
                }
            }
        }
        errors
    }
}
