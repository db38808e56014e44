//! Validation report containing one task per resource.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::issue::{ErrorKind, ValidationError};

/// Summary numbers for one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    /// Rows streamed from the resource.
    pub rows: usize,
    /// Fields declared by the schema.
    pub fields: usize,
    pub errors: usize,
    pub by_kind: BTreeMap<ErrorKind, usize>,
}

/// Errors raised while validating one resource, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub errors: Vec<ValidationError>,
    pub stats: TaskStats,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            errors: Vec::new(),
            stats: TaskStats::default(),
        }
    }

    pub fn push(&mut self, error: ValidationError) {
        self.stats.errors += 1;
        *self.stats.by_kind.entry(error.kind).or_default() += 1;
        self.errors.push(error);
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.stats.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// Attributes that [`Report::flatten`] can extract from each error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAttribute {
    RowNumber,
    FieldNumber,
    FieldName,
    Type,
    Note,
    Cell,
    Check,
}

impl ErrorAttribute {
    fn extract(self, error: &ValidationError) -> JsonValue {
        match self {
            ErrorAttribute::RowNumber => error.row_number.into(),
            ErrorAttribute::FieldNumber => error.field_number.into(),
            ErrorAttribute::FieldName => error.field_name.clone().into(),
            ErrorAttribute::Type => error.kind.code().into(),
            ErrorAttribute::Note => error.note.clone().into(),
            ErrorAttribute::Cell => error.cell.clone().into(),
            ErrorAttribute::Check => error.check.clone().into(),
        }
    }
}

/// Overall validation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub tasks: Vec<Task>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Valid iff no task holds an error.
    pub fn valid(&self) -> bool {
        self.tasks.iter().all(Task::valid)
    }

    pub fn error_count(&self) -> usize {
        self.tasks.iter().map(Task::error_count).sum()
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }

    /// All errors across tasks, task order first then emission order.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.tasks.iter().flat_map(|task| task.errors.iter())
    }

    /// Extract the selected attributes of every error as parallel tuples.
    ///
    /// Missing attributes are JSON `null`.
    pub fn flatten(&self, attributes: &[ErrorAttribute]) -> Vec<Vec<JsonValue>> {
        self.errors()
            .map(|error| {
                attributes
                    .iter()
                    .map(|attribute| attribute.extract(error))
                    .collect()
            })
            .collect()
    }
}
