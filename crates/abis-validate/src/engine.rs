//! Single-pass scan of one resource.
//!
//! Order of work for a resource:
//!
//! 1. resolve a codec for every schema field
//! 2. run every check's start hook; a `source-error` stops here
//! 3. for each record: decode cells, apply field constraints, report
//!    missing and extra cells, then run every check's row hook
//! 4. run every check's end hook
//!
//! A record that cannot be read (broken quoting, invalid UTF-8) becomes a
//! `source-error` at that row; reading stops there and end hooks are
//! skipped, but errors found so far are kept.
//!
//! Within a row, cell errors come first, then check errors in the order the
//! checks were given.

use std::collections::BTreeSet;
use std::sync::Arc;

use abis_codec::{Codec, CodecError, TypeRegistry};
use abis_ingest::{IngestError, RawRecord, Resource};
use abis_model::{ErrorKind, Report, Row, Schema, Task, ValidationError, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, trace, warn};

use crate::check::{Check, ResourceInfo};
use crate::constraints::FieldConstraints;
use crate::error::Result;

/// Knobs for a scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Error kinds dropped from the task.
    pub skip_errors: BTreeSet<ErrorKind>,
    /// Stop collecting after this many errors; the scan still completes.
    pub limit_errors: Option<usize>,
    /// Stop streaming after this many rows.
    pub limit_rows: Option<usize>,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_skip_errors<I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = ErrorKind>,
    {
        self.skip_errors = kinds.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_limit_errors(mut self, limit: usize) -> Self {
        self.limit_errors = Some(limit);
        self
    }

    #[must_use]
    pub fn with_limit_rows(mut self, limit: usize) -> Self {
        self.limit_rows = Some(limit);
        self
    }
}

/// Validate one resource with the given checks.
///
/// The checks are consumed: stateful checks cannot carry state into another
/// scan. Data problems are returned inside the task; `Err` means the scan
/// could not run (unknown field type).
pub fn validate_resource(
    mut resource: Resource,
    mut checks: Vec<Box<dyn Check>>,
    options: &ValidationOptions,
) -> Result<Task> {
    let span = info_span!("validate_resource", resource = %resource.name());
    let _guard = span.enter();

    let schema = resource.schema().clone();
    let mut decoder = RowDecoder::new(&schema, resource.header())?;
    let mut info = ResourceInfo::new(resource.name(), resource.format())
        .with_fields(schema.field_names())
        .with_header(resource.header().map(<[String]>::to_vec));
    let mut collector = Collector::new(Task::new(resource.name()), options);
    debug!(checks = checks.len(), fields = schema.fields.len(), "starting scan");

    let mut fatal = false;
    for check in &mut checks {
        let errors = check.validate_start(&info);
        fatal |= errors.iter().any(|error| error.kind.is_fatal());
        collector.extend(stamp(check.type_tag(), errors));
    }
    if fatal {
        warn!("resource failed a start check; rows were not read");
        return Ok(collector.finish(&schema, 0));
    }
    if !resource.is_tabular() {
        warn!(format = %info.format, "resource has no tabular content to stream");
    }

    let mut cell_errors = Vec::new();
    for record in resource.records() {
        if options.limit_rows.is_some_and(|limit| info.row_count >= limit) {
            debug!(limit = info.row_count, "row limit reached");
            break;
        }
        let record = match record {
            Ok(record) => record,
            Err(error) => {
                let row = info.row_count + 1;
                warn!(row, %error, "record could not be read; stopping");
                collector.extend([unreadable_record(&error).at_row(row)]);
                fatal = true;
                break;
            }
        };
        info.row_count += 1;
        let row = decoder.decode(&record, &mut cell_errors);
        collector.extend(cell_errors.drain(..));
        for check in &mut checks {
            let errors = check.validate_row(&row);
            collector.extend(stamp(check.type_tag(), errors));
        }
        trace!(row = row.number(), "row validated");
    }

    if !fatal {
        for check in &mut checks {
            let errors = check.validate_end(&info);
            collector.extend(stamp(check.type_tag(), errors));
        }
    }

    let task = collector.finish(&schema, info.row_count);
    info!(
        rows = task.stats.rows,
        errors = task.stats.errors,
        valid = task.valid(),
        "resource validated"
    );
    Ok(task)
}

/// Validate several resources in order, one task each.
pub fn validate_all<I>(runs: I, options: &ValidationOptions) -> Result<Report>
where
    I: IntoIterator<Item = (Resource, Vec<Box<dyn Check>>)>,
{
    let mut report = Report::new();
    for (resource, checks) in runs {
        report.add_task(validate_resource(resource, checks, options)?);
    }
    Ok(report)
}

/// Decode every row of a resource without running checks.
///
/// Cells that fail to decode are null. Used to build lookups from a
/// producing resource before a consuming resource is scanned.
pub fn read_rows(mut resource: Resource) -> Result<Vec<Row>> {
    let mut decoder = RowDecoder::new(resource.schema(), resource.header())?;
    let mut discarded = Vec::new();
    let mut rows = Vec::new();
    for record in resource.records() {
        rows.push(decoder.decode(&record?, &mut discarded));
        discarded.clear();
    }
    debug!(resource = %resource.name(), rows = rows.len(), "materialized rows");
    Ok(rows)
}

fn unreadable_record(error: &IngestError) -> ValidationError {
    match error {
        IngestError::Csv { source, .. } => {
            ValidationError::source(format!("the row could not be read: {source}"))
        }
        other => ValidationError::source(other.to_string()),
    }
}

fn stamp(
    type_tag: &'static str,
    errors: Vec<ValidationError>,
) -> impl Iterator<Item = ValidationError> {
    errors.into_iter().map(move |error| {
        if error.check.is_some() {
            error
        } else {
            error.with_check(type_tag)
        }
    })
}

/// Applies skip and limit options while errors are collected.
struct Collector<'o> {
    task: Task,
    options: &'o ValidationOptions,
    truncated: bool,
}

impl<'o> Collector<'o> {
    fn new(task: Task, options: &'o ValidationOptions) -> Self {
        Self {
            task,
            options,
            truncated: false,
        }
    }

    fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        for error in errors {
            if self.options.skip_errors.contains(&error.kind) {
                continue;
            }
            if self
                .options
                .limit_errors
                .is_some_and(|limit| self.task.error_count() >= limit)
            {
                if !self.truncated {
                    warn!(limit = self.task.error_count(), "error limit reached");
                    self.truncated = true;
                }
                continue;
            }
            self.task.push(error);
        }
    }

    fn finish(mut self, schema: &Schema, rows: usize) -> Task {
        self.task.stats.rows = rows;
        self.task.stats.fields = schema.fields.len();
        self.task
    }
}

/// Turns raw records into typed rows for one scan.
struct RowDecoder {
    names: Arc<[String]>,
    /// Header column index for each schema field.
    columns: Vec<Option<usize>>,
    codecs: Vec<Box<dyn Codec>>,
    constraints: Vec<FieldConstraints>,
    missing_values: Vec<String>,
    header_len: usize,
}

impl RowDecoder {
    fn new(schema: &Schema, header: Option<&[String]>) -> std::result::Result<Self, CodecError> {
        let codecs = TypeRegistry::global().resolve_schema(schema)?;
        let header = header.unwrap_or_default();
        let columns = schema
            .fields
            .iter()
            .map(|field| header.iter().position(|label| *label == field.name))
            .collect::<Vec<_>>();
        for (field, column) in schema.fields.iter().zip(&columns) {
            if column.is_none() && !header.is_empty() {
                debug!(field = %field.name, "schema field has no column; cells are null");
            }
        }
        Ok(Self {
            names: schema.field_names().into(),
            columns,
            codecs,
            constraints: schema
                .fields
                .iter()
                .enumerate()
                .map(|(idx, field)| FieldConstraints::new(field, idx + 1))
                .collect(),
            missing_values: schema.missing_values.clone(),
            header_len: header.len(),
        })
    }

    fn decode(&mut self, record: &RawRecord, errors: &mut Vec<ValidationError>) -> Row {
        let number = record.number;
        let mut values = Vec::with_capacity(self.names.len());

        for (idx, name) in self.names.iter().enumerate() {
            let position = idx + 1;
            let raw = match self.columns[idx] {
                None => None,
                Some(column) => match record.cells.get(column) {
                    Some(cell) => Some(cell.as_str()),
                    None => {
                        errors.push(
                            ValidationError::new(ErrorKind::MissingCell, "the cell is missing")
                                .at_row(number)
                                .at_field(position, name.clone()),
                        );
                        values.push(Value::Null);
                        continue;
                    }
                },
            };
            let cell = raw.unwrap_or_default();
            let value = if raw.is_none() || self.missing_values.iter().any(|marker| marker == cell) {
                Value::Null
            } else {
                match self.codecs[idx].decode_str(cell) {
                    Ok(value) => value,
                    Err(error) => {
                        errors.push(
                            ValidationError::new(ErrorKind::Type, error.reason)
                                .at_row(number)
                                .at_field(position, name.clone())
                                .with_cell(cell),
                        );
                        values.push(Value::Null);
                        continue;
                    }
                }
            };
            errors.extend(self.constraints[idx].check(number, cell, &value));
            values.push(value);
        }

        for (column, cell) in record.cells.iter().enumerate().skip(self.header_len) {
            let mut error = ValidationError::new(ErrorKind::ExtraCell, "the cell is extra")
                .at_row(number)
                .with_cell(cell.as_str());
            error.field_number = Some(column + 1);
            errors.push(error);
        }

        Row::new(number, Arc::clone(&self.names), values)
    }
}
