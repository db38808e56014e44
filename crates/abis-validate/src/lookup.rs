//! Lookup artifacts built from the decoded rows of a producing resource.
//!
//! Run the producer through [`read_rows`](crate::read_rows) first, build the
//! artifacts here, then register them in [`Lookups`](abis_model::Lookups)
//! before the consuming resource's checks are built.

use abis_model::{AllowedSet, DefaultMap, Row, SiteIdentifierMap, Value};
use tracing::debug;

use crate::checks::SiteIdentifierFields;

/// Every present value of `field`; list items are added individually.
pub fn build_allowed_set(rows: &[Row], field: &str) -> AllowedSet {
    let mut set = AllowedSet::new();
    for row in rows {
        match row.get(field) {
            Value::Null => {}
            Value::List(items) => set.extend(items.iter().cloned()),
            other => set.extend(other.as_key()),
        }
    }
    debug!(field, size = set.len(), "built allowed set");
    set
}

/// Map the key (fields joined with `|`) to the value of `value_field`.
///
/// Rows missing any key part or the value are skipped. The first row wins
/// when a key repeats.
pub fn build_default_map(rows: &[Row], key_fields: &[&str], value_field: &str) -> DefaultMap {
    let mut map = DefaultMap::new();
    for row in rows {
        let Some(value) = row.key(value_field) else {
            continue;
        };
        let parts = key_fields
            .iter()
            .map(|field| row.key(field))
            .collect::<Option<Vec<_>>>();
        if let Some(parts) = parts {
            map.entry(parts.join("|")).or_insert(value);
        }
    }
    debug!(key = ?key_fields, value_field, size = map.len(), "built default map");
    map
}

/// Map each visit key to the site identifier given on its row.
///
/// A visit whose row supplies no identifier maps to `None`; the first row
/// wins when a visit repeats.
pub fn build_site_identifier_map(
    rows: &[Row],
    key_field: &str,
    fields: &SiteIdentifierFields,
) -> SiteIdentifierMap {
    let mut map = SiteIdentifierMap::new();
    for row in rows {
        if let Some(key) = row.key(key_field) {
            map.entry(key).or_insert_with(|| fields.identifier(row));
        }
    }
    debug!(key_field, size = map.len(), "built site identifier map");
    map
}
