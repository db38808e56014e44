//! Rule-based validation of biodiversity submission resources.
//!
//! A resource is scanned once. Every row is decoded through its schema's
//! codecs, checked against declared field constraints and then handed to each
//! configured [`Check`]. Problems with the data become
//! [`ValidationError`](abis_model::ValidationError) records in a
//! [`Task`](abis_model::Task); only configuration and I/O failures are `Err`.
//!
//! Checks are built from serialized [`CheckSpec`]s through the static
//! [`CheckRegistry`], or directly through each check's constructor.

pub mod check;
pub mod checks;
mod constraints;
pub mod engine;
pub mod error;
pub mod expr;
pub mod lookup;
pub mod registry;
pub mod report;
pub mod template;

pub use check::{Check, ResourceInfo, is_escaped, join_fields};
pub use engine::{ValidationOptions, read_rows, validate_all, validate_resource};
pub use error::{ExprError, RegistryError, Result, TemplateError, ValidateError};
pub use expr::{CompareOp, Expr, ExprValue};
pub use lookup::{build_allowed_set, build_default_map, build_site_identifier_map};
pub use registry::{CheckEntry, CheckFactory, CheckRegistry, CheckSpec};
pub use report::{REPORT_FILE_NAME, write_report_json};
pub use template::MessageTemplate;
