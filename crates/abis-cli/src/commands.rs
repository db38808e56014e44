use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use abis_cli::config::{load_check_specs, load_lookups, load_schema};
use abis_ingest::Resource;
use abis_model::{Lookups, Report};
use abis_validate::{CheckRegistry, ValidationOptions, validate_resource, write_report_json};

use crate::cli::ValidateArgs;
use crate::summary::apply_table_style;

/// Outcome of `abis validate`.
pub struct ValidateResult {
    pub data: PathBuf,
    pub report: Report,
    pub report_path: Option<PathBuf>,
}

pub fn run_checks() {
    let mut table = Table::new();
    table.set_header(vec!["Check", "Error kinds", "Description"]);
    apply_table_style(&mut table);
    for entry in CheckRegistry::global().entries() {
        let kinds = entry
            .error_kinds
            .iter()
            .map(|kind| kind.code())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![entry.type_tag, kinds.as_str(), entry.description]);
    }
    println!("{table}");
}

pub fn run_validate(args: &ValidateArgs) -> Result<ValidateResult> {
    let span = info_span!("validate", data = %args.data.display());
    let _guard = span.enter();

    let schema = load_schema(&args.schema)?;
    let specs = match &args.checks {
        Some(path) => load_check_specs(path)?,
        None => Vec::new(),
    };
    let lookups = match &args.lookups {
        Some(path) => load_lookups(path)?,
        None => Lookups::new(),
    };
    let checks = CheckRegistry::global()
        .build_all(&specs, &lookups)
        .context("build checks")?;

    let resource = Resource::from_path(&args.data, schema)
        .with_context(|| format!("open {}", args.data.display()))?;
    let task = validate_resource(resource, checks, &validation_options(args))
        .with_context(|| format!("validate {}", args.data.display()))?;
    let report = Report::from_tasks(vec![task]);

    let report_path = match &args.report_dir {
        Some(dir) => Some(write_report_json(dir, &report).context("write validation report")?),
        None => None,
    };
    info!(
        valid = report.valid(),
        errors = report.error_count(),
        "validation finished"
    );
    Ok(ValidateResult {
        data: args.data.clone(),
        report,
        report_path,
    })
}

fn validation_options(args: &ValidateArgs) -> ValidationOptions {
    let mut options = ValidationOptions::new().with_skip_errors(args.skip_errors.iter().copied());
    if let Some(limit) = args.limit_errors {
        options = options.with_limit_errors(limit);
    }
    if let Some(limit) = args.limit_rows {
        options = options.with_limit_rows(limit);
    }
    options
}
