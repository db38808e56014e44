//! Static registry from check type tag to factory.
//!
//! Each build call returns fresh check instances, so two scans never share
//! accumulator state even when they use the same spec.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use abis_model::{ErrorKind, Lookups};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::check::Check;
use crate::checks::{
    chronological, coordinates, default_lookup, identifier_presence, logical_or, membership,
    mutual_exclusion, mutual_inclusion, not_empty, required, row_constraint, site_id_match,
    sites_geometry, tabular, unique_together,
};
use crate::error::RegistryError;

/// Builds a check from its parameters and the available lookups.
pub type CheckFactory = fn(&JsonValue, &Lookups) -> Result<Box<dyn Check>, RegistryError>;

/// Serialized check configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSpec {
    #[serde(rename = "type")]
    pub check_type: String,
    #[serde(default)]
    pub params: JsonValue,
}

impl CheckSpec {
    pub fn new(check_type: impl Into<String>, params: JsonValue) -> Self {
        Self {
            check_type: check_type.into(),
            params,
        }
    }
}

/// Registered check type.
#[derive(Debug, Clone, Copy)]
pub struct CheckEntry {
    pub type_tag: &'static str,
    pub error_kinds: &'static [ErrorKind],
    pub description: &'static str,
    pub factory: CheckFactory,
}

static BUILTIN: LazyLock<CheckRegistry> = LazyLock::new(CheckRegistry::with_builtin);

#[derive(Debug, Clone, Default)]
pub struct CheckRegistry {
    entries: BTreeMap<&'static str, CheckEntry>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared registry holding every built-in check.
    pub fn global() -> &'static CheckRegistry {
        &BUILTIN
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        let builtin = [
            CheckEntry {
                type_tag: tabular::TYPE,
                error_kinds: tabular::ERROR_KINDS,
                description: "resource must be a delimited table with a header",
                factory: tabular::Tabular::from_params,
            },
            CheckEntry {
                type_tag: not_empty::TYPE,
                error_kinds: not_empty::ERROR_KINDS,
                description: "resource must contain at least one row",
                factory: not_empty::NotEmpty::from_params,
            },
            CheckEntry {
                type_tag: coordinates::TYPE,
                error_kinds: coordinates::ERROR_KINDS,
                description: "coordinates must fall inside a permitted bounding box",
                factory: coordinates::Coordinates::from_params,
            },
            CheckEntry {
                type_tag: logical_or::TYPE,
                error_kinds: logical_or::ERROR_KINDS,
                description: "at least one of the fields must be provided",
                factory: logical_or::LogicalOr::from_params,
            },
            CheckEntry {
                type_tag: mutual_inclusion::TYPE,
                error_kinds: mutual_inclusion::ERROR_KINDS,
                description: "fields must be provided together or not at all",
                factory: mutual_inclusion::MutualInclusion::from_params,
            },
            CheckEntry {
                type_tag: mutual_exclusion::TYPE,
                error_kinds: mutual_exclusion::ERROR_KINDS,
                description: "at most one (or exactly one) of the fields may be provided",
                factory: mutual_exclusion::MutualExclusion::from_params,
            },
            CheckEntry {
                type_tag: required::TYPE,
                error_kinds: required::ERROR_KINDS,
                description: "fields are required unless a whitelist value applies",
                factory: required::Required::from_params,
            },
            CheckEntry {
                type_tag: default_lookup::TYPE,
                error_kinds: default_lookup::ERROR_KINDS,
                description: "value may be omitted only when a default exists for its key",
                factory: default_lookup::DefaultLookup::from_params,
            },
            CheckEntry {
                type_tag: row_constraint::TYPE,
                error_kinds: row_constraint::ERROR_KINDS,
                description: "formula over row fields and side inputs must hold",
                factory: row_constraint::RowConstraint::from_params,
            },
            CheckEntry {
                type_tag: sites_geometry::TYPE,
                error_kinds: sites_geometry::ERROR_KINDS,
                description: "site needs a point or footprint with a geodetic datum",
                factory: sites_geometry::SitesGeometry::from_params,
            },
            CheckEntry {
                type_tag: unique_together::TYPE,
                error_kinds: unique_together::ERROR_KINDS,
                description: "combination of field values must be unique",
                factory: unique_together::UniqueTogether::from_params,
            },
            CheckEntry {
                type_tag: chronological::TYPE,
                error_kinds: chronological::ERROR_KINDS,
                description: "date fields must be in chronological order",
                factory: chronological::ChronologicalOrder::from_params,
            },
            CheckEntry {
                type_tag: site_id_match::TYPE,
                error_kinds: site_id_match::ERROR_KINDS,
                description: "site identifier must match the site recorded for the visit",
                factory: site_id_match::SiteIdentifierMatch::from_params,
            },
            CheckEntry {
                type_tag: membership::TYPE,
                error_kinds: membership::ERROR_KINDS,
                description: "value must appear in a set built from another template",
                factory: membership::SetMembership::from_params,
            },
            CheckEntry {
                type_tag: identifier_presence::TYPE,
                error_kinds: identifier_presence::ERROR_KINDS,
                description: "exactly one site identification scheme must be provided",
                factory: identifier_presence::IdentifierPresence::from_params,
            },
        ];
        for entry in builtin {
            registry.register(entry);
        }
        registry
    }

    /// Register or replace a check type.
    pub fn register(&mut self, entry: CheckEntry) {
        self.entries.insert(entry.type_tag, entry);
    }

    pub fn get(&self, type_tag: &str) -> Option<&CheckEntry> {
        self.entries.get(type_tag)
    }

    /// Entries ordered by type tag.
    pub fn entries(&self) -> impl Iterator<Item = &CheckEntry> {
        self.entries.values()
    }

    pub fn build(&self, spec: &CheckSpec, lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let entry = self
            .get(spec.check_type.trim())
            .ok_or_else(|| RegistryError::UnknownCheck(spec.check_type.clone()))?;
        debug!(check = entry.type_tag, "building check");
        (entry.factory)(&spec.params, lookups)
    }

    /// Build checks in spec order.
    pub fn build_all(
        &self,
        specs: &[CheckSpec],
        lookups: &Lookups,
    ) -> Result<Vec<Box<dyn Check>>, RegistryError> {
        specs.iter().map(|spec| self.build(spec, lookups)).collect()
    }
}
