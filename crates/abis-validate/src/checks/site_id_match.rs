//! Site identifiers must agree with the site recorded for the same visit
//! in another template.

use std::sync::Arc;

use abis_model::{ErrorKind, Lookups, Row, SiteIdentifier, SiteIdentifierMap, ValidationError};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::check::{Check, join_fields};
use crate::checks::parse_params;
use crate::error::RegistryError;

pub const TYPE: &str = "site-identifier-match";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::Constraint, ErrorKind::RowConstraint];

/// Column names that make up a site identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteIdentifierFields {
    pub site_id: String,
    pub site_id_source: String,
    pub existing_site_iri: String,
}

impl Default for SiteIdentifierFields {
    fn default() -> Self {
        Self {
            site_id: "siteID".to_string(),
            site_id_source: "siteIDSource".to_string(),
            existing_site_iri: "existingBDRSiteIRI".to_string(),
        }
    }
}

impl SiteIdentifierFields {
    /// Identifier supplied by a row: a local pair wins over an external IRI.
    pub fn identifier(&self, row: &Row) -> Option<SiteIdentifier> {
        if let (Some(id), Some(source)) = (row.key(&self.site_id), row.key(&self.site_id_source)) {
            return Some(SiteIdentifier::Local { id, source });
        }
        row.key(&self.existing_site_iri)
            .map(|iri| SiteIdentifier::External { iri })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Params {
    #[serde(default = "default_key_field")]
    key_field: String,
    template: String,
    lookup: String,
    #[serde(default)]
    fields: SiteIdentifierFields,
}

fn default_key_field() -> String {
    "siteVisitID".to_string()
}

#[derive(Debug, Clone)]
pub struct SiteIdentifierMatch {
    key_field: String,
    template: String,
    sites: Arc<SiteIdentifierMap>,
    fields: SiteIdentifierFields,
}

impl SiteIdentifierMatch {
    pub fn new(
        key_field: impl Into<String>,
        template: impl Into<String>,
        sites: Arc<SiteIdentifierMap>,
    ) -> Self {
        Self {
            key_field: key_field.into(),
            template: template.into(),
            sites,
            fields: SiteIdentifierFields::default(),
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: SiteIdentifierFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn from_params(params: &JsonValue, lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let params: Params = parse_params(TYPE, params)?;
        let sites = lookups
            .site_identifier_map(&params.lookup)
            .ok_or_else(|| RegistryError::MissingLookup {
                check: TYPE.to_string(),
                kind: "site identifier",
                name: params.lookup.clone(),
            })?;
        Ok(Box::new(
            Self::new(params.key_field, params.template, sites).with_fields(params.fields),
        ))
    }

    fn mismatched(&self, row: &Row, expected: &SiteIdentifier) -> Vec<&str> {
        let differs = |field: &str, expected: &str| row.key(field).as_deref() != Some(expected);
        match expected {
            SiteIdentifier::Local { id, source } => [
                (self.fields.site_id.as_str(), id.as_str()),
                (self.fields.site_id_source.as_str(), source.as_str()),
            ]
            .into_iter()
            .filter(|(field, value)| differs(*field, *value))
            .map(|(field, _)| field)
            .collect(),
            SiteIdentifier::External { iri } => {
                let field = self.fields.existing_site_iri.as_str();
                if differs(field, iri.as_str()) { vec![field] } else { Vec::new() }
            }
        }
    }
}

impl Check for SiteIdentifierMatch {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        let Some(key) = row.key(&self.key_field) else {
            return Vec::new();
        };
        let expected = match self.sites.get(&key) {
            None => {
                return vec![ValidationError::constraint(
                    row,
                    &self.key_field,
                    format!(
                        "{field} must match a {field} in the {template} template",
                        field = self.key_field,
                        template = self.template
                    ),
                )];
            }
            Some(None) => return Vec::new(),
            Some(Some(expected)) => expected,
        };
        let mismatched = self.mismatched(row, expected);
        if mismatched.is_empty() {
            return Vec::new();
        }
        vec![ValidationError::row_constraint(
            row,
            format!(
                "the site identifier does not match the site recorded for {} \"{key}\" in the {} template (mismatched: {})",
                self.key_field,
                self.template,
                join_fields(&mismatched)
            ),
        )]
    }
}
