//! JSON configuration files read by the CLI.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

use abis_model::{LookupDocument, Lookups, Schema};
use abis_validate::CheckSpec;

/// Read a table schema and check its field names.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let schema: Schema = read_json(path, "schema")?;
    schema
        .check()
        .with_context(|| format!("invalid schema in {}", path.display()))?;
    debug!(path = %path.display(), fields = schema.fields.len(), "loaded schema");
    Ok(schema)
}

/// Read a JSON array of check specifications.
pub fn load_check_specs(path: &Path) -> Result<Vec<CheckSpec>> {
    let specs: Vec<CheckSpec> = read_json(path, "checks")?;
    debug!(path = %path.display(), checks = specs.len(), "loaded check specs");
    Ok(specs)
}

/// Read named lookup artifacts.
pub fn load_lookups(path: &Path) -> Result<Lookups> {
    let document: LookupDocument = read_json(path, "lookups")?;
    let lookups = Lookups::from(document);
    debug!(
        path = %path.display(),
        sets = lookups.sets.len(),
        defaults = lookups.defaults.len(),
        site_identifiers = lookups.site_identifiers.len(),
        "loaded lookups"
    );
    Ok(lookups)
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read {what} file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {what} file {}", path.display()))
}
