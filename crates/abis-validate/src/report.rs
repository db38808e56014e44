//! JSON report output.

use std::path::{Path, PathBuf};

use abis_model::{Report, Task};
use chrono::Utc;
use serde::Serialize;

use crate::error::{Result, ValidateError};

pub const REPORT_FILE_NAME: &str = "validation_report.json";
const REPORT_SCHEMA: &str = "abis-validation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct ReportPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    valid: bool,
    error_count: usize,
    tasks: &'a [Task],
}

/// Write `validation_report.json` into `output_dir`, creating the directory.
pub fn write_report_json(output_dir: &Path, report: &Report) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(write_error(output_dir))?;
    let output_path = output_dir.join(REPORT_FILE_NAME);
    let payload = ReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        valid: report.valid(),
        error_count: report.error_count(),
        tasks: &report.tasks,
    };
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(&output_path, format!("{json}\n")).map_err(write_error(&output_path))?;
    Ok(output_path)
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> ValidateError {
    let path = path.to_path_buf();
    move |source| ValidateError::Write { path, source }
}
