//! Data model for biodiversity submission validation.
//!
//! Schema descriptors, decoded cell values, rows, validation errors and the
//! report hierarchy shared by the codec, ingest and validate crates.

pub mod error;
pub mod field;
pub mod issue;
pub mod lookup;
pub mod report;
pub mod row;
pub mod value;

pub use error::{ModelError, Result};
pub use field::{Constraints, Field, Schema};
pub use issue::{ErrorKind, ValidationError};
pub use lookup::{
    AllowedSet, DefaultMap, LookupDocument, Lookups, SiteIdentifier, SiteIdentifierMap, Whitelist,
};
pub use report::{ErrorAttribute, Report, Task, TaskStats};
pub use row::Row;
pub use value::{Geometry, Precision, Timestamp, Value};
