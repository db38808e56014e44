//! Lookup artifacts shared between resources.
//!
//! A lookup is built by the caller from the rows of one resource and handed,
//! read-only, to checks that validate another resource. Artifacts are
//! wrapped in `Arc` so several checks can hold the same data.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Keys allowed for a field.
pub type AllowedSet = BTreeSet<String>;

/// Key to default value.
pub type DefaultMap = BTreeMap<String, String>;

/// Visit key to the site identifier recorded for it, `None` when the visit
/// exists but names no site.
pub type SiteIdentifierMap = BTreeMap<String, Option<SiteIdentifier>>;

/// Escape clause: field name to the set of values that bypass a rule.
pub type Whitelist = BTreeMap<String, Arc<AllowedSet>>;

/// The two ways a submission can identify a site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiteIdentifier {
    /// Local identifier plus the organisation that issued it.
    Local { id: String, source: String },
    /// Reference to a site that already exists in the data repository.
    External { iri: String },
}

impl fmt::Display for SiteIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteIdentifier::Local { id, source } => write!(f, "{id} ({source})"),
            SiteIdentifier::External { iri } => f.write_str(iri),
        }
    }
}

/// Named lookup artifacts available to cross-resource checks.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    pub sets: BTreeMap<String, Arc<AllowedSet>>,
    pub defaults: BTreeMap<String, Arc<DefaultMap>>,
    pub site_identifiers: BTreeMap<String, Arc<SiteIdentifierMap>>,
}

impl Lookups {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_set(mut self, name: impl Into<String>, set: AllowedSet) -> Self {
        self.sets.insert(name.into(), Arc::new(set));
        self
    }

    #[must_use]
    pub fn with_defaults(mut self, name: impl Into<String>, map: DefaultMap) -> Self {
        self.defaults.insert(name.into(), Arc::new(map));
        self
    }

    #[must_use]
    pub fn with_site_identifiers(mut self, name: impl Into<String>, map: SiteIdentifierMap) -> Self {
        self.site_identifiers.insert(name.into(), Arc::new(map));
        self
    }

    pub fn set(&self, name: &str) -> Option<Arc<AllowedSet>> {
        self.sets.get(name).cloned()
    }

    pub fn default_map(&self, name: &str) -> Option<Arc<DefaultMap>> {
        self.defaults.get(name).cloned()
    }

    pub fn site_identifier_map(&self, name: &str) -> Option<Arc<SiteIdentifierMap>> {
        self.site_identifiers.get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty() && self.defaults.is_empty() && self.site_identifiers.is_empty()
    }
}

/// On-disk shape of [`Lookups`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupDocument {
    pub sets: BTreeMap<String, AllowedSet>,
    pub defaults: BTreeMap<String, DefaultMap>,
    pub site_identifiers: BTreeMap<String, SiteIdentifierMap>,
}

impl From<LookupDocument> for Lookups {
    fn from(document: LookupDocument) -> Self {
        Self {
            sets: wrap(document.sets),
            defaults: wrap(document.defaults),
            site_identifiers: wrap(document.site_identifiers),
        }
    }
}

fn wrap<T>(map: BTreeMap<String, T>) -> BTreeMap<String, Arc<T>> {
    map.into_iter()
        .map(|(name, value)| (name, Arc::new(value)))
        .collect()
}
