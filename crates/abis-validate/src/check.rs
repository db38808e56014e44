//! Check protocol.
//!
//! A check is a rule instance with three lifecycle hooks. The engine calls
//! `validate_start` once before any row, `validate_row` once per row in file
//! order and `validate_end` once after the last row. Every hook returns the
//! errors it found; the default for each is none.

use abis_model::{ErrorKind, Row, ValidationError, Whitelist};

/// What a check can see of the resource being scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    pub name: String,
    /// Lower-cased format tag, e.g. `csv`.
    pub format: String,
    /// Schema field names in order.
    pub fields: Vec<String>,
    /// Normalized header labels; `None` when the source has no header.
    pub header: Option<Vec<String>>,
    /// Rows streamed so far.
    pub row_count: usize,
}

impl ResourceInfo {
    pub fn new(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            fields: Vec::new(),
            header: None,
            row_count: 0,
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: Option<Vec<String>>) -> Self {
        self.header = header;
        self
    }
}

/// A validation rule bound to one scan.
///
/// Checks are consumed by the scan that runs them, so accumulator state in a
/// stateful check starts empty for every resource.
pub trait Check: Send {
    /// Stable identifier, also used to stamp emitted errors.
    fn type_tag(&self) -> &'static str;

    /// Every error kind this check may emit.
    fn error_kinds(&self) -> &'static [ErrorKind];

    fn validate_start(&mut self, _resource: &ResourceInfo) -> Vec<ValidationError> {
        Vec::new()
    }

    fn validate_row(&mut self, _row: &Row) -> Vec<ValidationError> {
        Vec::new()
    }

    fn validate_end(&mut self, _resource: &ResourceInfo) -> Vec<ValidationError> {
        Vec::new()
    }
}

/// Render field names as `a, b, c`.
pub fn join_fields<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|field| field.as_ref())
        .collect::<Vec<&str>>()
        .join(", ")
}

/// Whether any whitelist field's value in the row belongs to its allowed set.
pub fn is_escaped(whitelist: &Whitelist, row: &Row) -> bool {
    whitelist
        .iter()
        .any(|(field, allowed)| row.key(field).is_some_and(|key| allowed.contains(&key)))
}
