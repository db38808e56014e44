//! Validation error records.
//!
//! A [`ValidationError`] is data, not a Rust error: checks return them and
//! the engine collects them into a task. Each record carries a kind, a note
//! written by whoever raised it and the location it applies to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::row::Row;

/// Kind of validation error. The string codes are a stable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A row-scoped business rule failed.
    #[serde(rename = "row-constraint")]
    RowConstraint,
    /// A single cell failed a declared or cross-resource field constraint.
    #[serde(rename = "constraint-error")]
    Constraint,
    /// A cell repeated a value in a `unique` column.
    #[serde(rename = "unique-error")]
    Unique,
    /// The row is shorter than the header.
    #[serde(rename = "missing-cell")]
    MissingCell,
    /// The row is longer than the header.
    #[serde(rename = "extra-cell")]
    ExtraCell,
    /// The cell could not be decoded by its field codec.
    #[serde(rename = "type-error")]
    Type,
    /// Resource-level cardinality violation.
    #[serde(rename = "table-dimensions")]
    TableDimensions,
    /// The resource does not have the expected shape. Fatal.
    #[serde(rename = "source-error")]
    Source,
    /// The check itself is misconfigured.
    #[serde(rename = "check-error")]
    Check,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::RowConstraint,
        ErrorKind::Constraint,
        ErrorKind::Unique,
        ErrorKind::MissingCell,
        ErrorKind::ExtraCell,
        ErrorKind::Type,
        ErrorKind::TableDimensions,
        ErrorKind::Source,
        ErrorKind::Check,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::RowConstraint => "row-constraint",
            ErrorKind::Constraint => "constraint-error",
            ErrorKind::Unique => "unique-error",
            ErrorKind::MissingCell => "missing-cell",
            ErrorKind::ExtraCell => "extra-cell",
            ErrorKind::Type => "type-error",
            ErrorKind::TableDimensions => "table-dimensions",
            ErrorKind::Source => "source-error",
            ErrorKind::Check => "check-error",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            ErrorKind::RowConstraint => "Row Constraint Error",
            ErrorKind::Constraint => "Constraint Error",
            ErrorKind::Unique => "Unique Error",
            ErrorKind::MissingCell => "Missing Cell",
            ErrorKind::ExtraCell => "Extra Cell",
            ErrorKind::Type => "Type Error",
            ErrorKind::TableDimensions => "Table Dimensions Error",
            ErrorKind::Source => "Source Error",
            ErrorKind::Check => "Check Error",
        }
    }

    /// Whether errors of this kind stop the scan.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::Source)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ErrorKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| ModelError::UnknownErrorKind(code.to_string()))
    }
}

/// A single validation error raised for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub note: String,
    /// 1-based row position, header excluded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_number: Option<usize>,
    /// 1-based field position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<String>,
    /// Type tag of the check that raised the error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, note: impl Into<String>) -> Self {
        Self {
            kind,
            note: note.into(),
            row_number: None,
            field_number: None,
            field_name: None,
            cell: None,
            check: None,
        }
    }

    /// A business rule failed for the whole row.
    pub fn row_constraint(row: &Row, note: impl Into<String>) -> Self {
        Self::new(ErrorKind::RowConstraint, note).at_row(row.number())
    }

    /// A field-level constraint failed for one cell of the row.
    pub fn constraint(row: &Row, field: &str, note: impl Into<String>) -> Self {
        let mut error = Self::new(ErrorKind::Constraint, note).at_row(row.number());
        error.field_number = row.field_number(field);
        error.field_name = Some(field.to_string());
        error.cell = Some(row.get(field).to_string());
        error
    }

    /// The check configuration is invalid; attributed to the row that exercised it.
    pub fn check_error(row: Option<&Row>, note: impl Into<String>) -> Self {
        let error = Self::new(ErrorKind::Check, note);
        match row {
            Some(row) => error.at_row(row.number()),
            None => error,
        }
    }

    pub fn table_dimensions(note: impl Into<String>) -> Self {
        Self::new(ErrorKind::TableDimensions, note)
    }

    pub fn source(note: impl Into<String>) -> Self {
        Self::new(ErrorKind::Source, note)
    }

    #[must_use]
    pub fn at_row(mut self, row_number: usize) -> Self {
        self.row_number = Some(row_number);
        self
    }

    #[must_use]
    pub fn at_field(mut self, field_number: usize, field_name: impl Into<String>) -> Self {
        self.field_number = Some(field_number);
        self.field_name = Some(field_name.into());
        self
    }

    #[must_use]
    pub fn with_cell(mut self, cell: impl Into<String>) -> Self {
        self.cell = Some(cell.into());
        self
    }

    #[must_use]
    pub fn with_check(mut self, check: impl Into<String>) -> Self {
        self.check = Some(check.into());
        self
    }

    /// Full sentence describing the error and where it occurred.
    pub fn message(&self) -> String {
        let row = self.row_number.unwrap_or_default();
        let field_number = self.field_number.unwrap_or_default();
        let field = self.field_name.as_deref().unwrap_or_default();
        let cell = self.cell.as_deref().unwrap_or_default();
        let note = &self.note;
        match self.kind {
            ErrorKind::RowConstraint => {
                format!("The row at position {row} has an error: {note}")
            }
            ErrorKind::Constraint => format!(
                "The cell \"{cell}\" in row at position {row} and field \"{field}\" at position {field_number} does not conform to a constraint: {note}"
            ),
            ErrorKind::Unique => format!(
                "Row at position {row} has unique constraint violation in field \"{field}\" at position {field_number}: {note}"
            ),
            ErrorKind::MissingCell => format!(
                "Row at position {row} has a missing cell in field \"{field}\" at position {field_number}"
            ),
            ErrorKind::ExtraCell => format!(
                "Row at position {row} has an extra value in field at position {field_number}"
            ),
            ErrorKind::Type => format!(
                "Type error in the cell \"{cell}\" in row {row} and field \"{field}\" at position {field_number}: {note}"
            ),
            ErrorKind::TableDimensions => {
                format!("The data source does not have the required dimensions: {note}")
            }
            ErrorKind::Source => {
                format!("The data source has not supported or has inconsistent contents: {note}")
            }
            ErrorKind::Check => format!("The check is not valid: {note}"),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
