//! Built-in checks.
//!
//! Each module exposes the check type, its Rust constructor and a
//! `from_params` factory used by the [`CheckRegistry`](crate::CheckRegistry).

pub mod chronological;
pub mod coordinates;
pub mod default_lookup;
pub mod identifier_presence;
pub mod logical_or;
pub mod membership;
pub mod mutual_exclusion;
pub mod mutual_inclusion;
pub mod not_empty;
pub mod required;
pub mod row_constraint;
pub mod site_id_match;
pub mod sites_geometry;
pub mod tabular;
pub mod unique_together;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use abis_model::{AllowedSet, Lookups, Whitelist};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::RegistryError;

pub use chronological::ChronologicalOrder;
pub use coordinates::{BoundingBox, Coordinates, default_bounding_boxes};
pub use default_lookup::{DefaultLookup, KeySource};
pub use identifier_presence::IdentifierPresence;
pub use logical_or::LogicalOr;
pub use membership::{Gate, SetMembership};
pub use mutual_exclusion::MutualExclusion;
pub use mutual_inclusion::MutualInclusion;
pub use not_empty::NotEmpty;
pub use required::Required;
pub use row_constraint::RowConstraint;
pub use site_id_match::{SiteIdentifierFields, SiteIdentifierMatch};
pub use sites_geometry::{GeometryFields, SitesGeometry};
pub use tabular::Tabular;
pub use unique_together::{NullHandling, UniqueTogether};

/// Deserialize check parameters; a missing `params` object is treated as `{}`.
pub(crate) fn parse_params<T: DeserializeOwned>(
    check: &str,
    params: &JsonValue,
) -> Result<T, RegistryError> {
    let params = match params {
        JsonValue::Null => JsonValue::Object(serde_json::Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(params).map_err(|source| RegistryError::InvalidParams {
        check: check.to_string(),
        source,
    })
}

/// Reject an empty target field list.
pub(crate) fn require_fields(check: &str, fields: &[String]) -> Result<(), RegistryError> {
    if fields.is_empty() {
        return Err(RegistryError::Invalid {
            check: check.to_string(),
            reason: "at least one field is required".to_string(),
        });
    }
    Ok(())
}

/// Allowed values inline, or the name of a set in [`Lookups`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SetSource {
    Values(BTreeSet<String>),
    Lookup { lookup: String },
}

impl SetSource {
    pub(crate) fn resolve(&self, check: &str, lookups: &Lookups) -> Result<Arc<AllowedSet>, RegistryError> {
        match self {
            SetSource::Values(values) => Ok(Arc::new(values.clone())),
            SetSource::Lookup { lookup } => {
                lookups
                    .set(lookup)
                    .ok_or_else(|| RegistryError::MissingLookup {
                        check: check.to_string(),
                        kind: "set",
                        name: lookup.clone(),
                    })
            }
        }
    }
}

/// Serialized whitelist: field name to its escape values.
pub type WhitelistParams = BTreeMap<String, SetSource>;

pub(crate) fn resolve_whitelist(
    check: &str,
    params: &WhitelistParams,
    lookups: &Lookups,
) -> Result<Whitelist, RegistryError> {
    params
        .iter()
        .map(|(field, source)| Ok((field.clone(), source.resolve(check, lookups)?)))
        .collect()
}
