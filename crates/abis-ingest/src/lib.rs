//! Resource runtime: open a delimited text source, normalize its header and
//! stream raw records once.

pub mod error;
pub mod header;
pub mod resource;

pub use error::{IngestError, Result};
pub use header::{delimiter_for, format_from_path, normalize_header};
pub use resource::{RawRecord, Records, Resource};
