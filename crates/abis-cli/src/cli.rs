//! CLI argument definitions for the `abis` validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use abis_model::ErrorKind;

#[derive(Parser)]
#[command(
    name = "abis",
    version,
    about = "Validate biodiversity submission tables against a schema and rule set",
    long_about = "Validate biodiversity submission tables against a schema and rule set.\n\n\
                  Reads a CSV or TSV resource, decodes each cell by its declared type,\n\
                  runs the configured checks in a single pass and reports every error."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate one data file.
    Validate(ValidateArgs),

    /// List registered check types and the error kinds they raise.
    Checks,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// CSV or TSV file to validate.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Table schema (JSON).
    #[arg(long = "schema", value_name = "JSON")]
    pub schema: PathBuf,

    /// Array of check specifications (JSON).
    #[arg(long = "checks", value_name = "JSON")]
    pub checks: Option<PathBuf>,

    /// Named lookup artifacts referenced by cross-resource checks (JSON).
    #[arg(long = "lookups", value_name = "JSON")]
    pub lookups: Option<PathBuf>,

    /// Write validation_report.json into this directory.
    #[arg(long = "report-dir", value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Stop recording errors after this many.
    #[arg(long = "limit-errors", value_name = "N")]
    pub limit_errors: Option<usize>,

    /// Only scan the first N rows.
    #[arg(long = "limit-rows", value_name = "N")]
    pub limit_rows: Option<usize>,

    /// Error kinds to drop from the report (comma separated codes).
    #[arg(long = "skip-errors", value_name = "KIND", value_delimiter = ',')]
    pub skip_errors: Vec<ErrorKind>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
