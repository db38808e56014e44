//! Exactly one site identification scheme: a local `siteID` with its
//! `siteIDSource`, or an `existingBDRSiteIRI`.

use abis_model::{ErrorKind, Lookups, Row, ValidationError};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::check::Check;
use crate::checks::SiteIdentifierFields;
use crate::checks::parse_params;
use crate::error::RegistryError;

pub const TYPE: &str = "identifier-presence";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::RowConstraint];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Params {
    fields: SiteIdentifierFields,
    only_when_present: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct IdentifierPresence {
    fields: SiteIdentifierFields,
    gate: Option<String>,
}

impl IdentifierPresence {
    pub fn new(fields: SiteIdentifierFields) -> Self {
        Self { fields, gate: None }
    }

    /// Skip rows where `field` is null.
    #[must_use]
    pub fn only_when_present(mut self, field: impl Into<String>) -> Self {
        self.gate = Some(field.into());
        self
    }

    pub fn from_params(params: &JsonValue, _lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let params: Params = parse_params(TYPE, params)?;
        let mut check = Self::new(params.fields);
        if let Some(gate) = params.only_when_present {
            check = check.only_when_present(gate);
        }
        Ok(Box::new(check))
    }
}

impl Check for IdentifierPresence {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        if self.gate.as_ref().is_some_and(|gate| !row.is_present(gate)) {
            return Vec::new();
        }
        let id = row.is_present(&self.fields.site_id);
        let source = row.is_present(&self.fields.site_id_source);
        let external = row.is_present(&self.fields.existing_site_iri);

        let SiteIdentifierFields {
            site_id,
            site_id_source,
            existing_site_iri,
        } = &self.fields;
        let note = match (id || source, id && source, external) {
            (true, _, true) => format!(
                "only one of {site_id} and {site_id_source}, or {existing_site_iri} may be provided"
            ),
            (_, true, false) | (false, _, true) => return Vec::new(),
            _ => format!(
                "either {site_id} and {site_id_source}, or {existing_site_iri} must be provided"
            ),
        };
        vec![ValidationError::row_constraint(row, note)]
    }
}
