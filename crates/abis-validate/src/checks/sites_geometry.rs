//! A site needs a point or a footprint, each with a geodetic datum.
//!
//! Sites referenced by occurrences that carry their own geometry are exempt.

use std::sync::Arc;

use abis_model::{AllowedSet, ErrorKind, Lookups, Row, ValidationError};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::check::Check;
use crate::checks::parse_params;
use crate::error::RegistryError;

pub const TYPE: &str = "sites-geometry";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::RowConstraint];

/// Column names the rule reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeometryFields {
    pub latitude: String,
    pub longitude: String,
    pub datum: String,
    pub footprint: String,
    pub site_id: String,
}

impl Default for GeometryFields {
    fn default() -> Self {
        Self {
            latitude: "decimalLatitude".to_string(),
            longitude: "decimalLongitude".to_string(),
            datum: "geodeticDatum".to_string(),
            footprint: "footprintWKT".to_string(),
            site_id: "siteID".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Params {
    fields: GeometryFields,
    occurrence_sites: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SitesGeometry {
    fields: GeometryFields,
    occurrence_sites: Option<Arc<AllowedSet>>,
}

impl SitesGeometry {
    pub fn new(fields: GeometryFields) -> Self {
        Self {
            fields,
            occurrence_sites: None,
        }
    }

    /// Site identifiers whose occurrences already provide geometry.
    #[must_use]
    pub fn with_occurrence_sites(mut self, sites: Arc<AllowedSet>) -> Self {
        self.occurrence_sites = Some(sites);
        self
    }

    pub fn from_params(params: &JsonValue, lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let params: Params = parse_params(TYPE, params)?;
        let mut check = Self::new(params.fields);
        if let Some(name) = params.occurrence_sites {
            let sites = lookups.set(&name).ok_or_else(|| RegistryError::MissingLookup {
                check: TYPE.to_string(),
                kind: "set",
                name,
            })?;
            check = check.with_occurrence_sites(sites);
        }
        Ok(Box::new(check))
    }

    fn has_occurrence_geometry(&self, row: &Row) -> bool {
        let Some(sites) = &self.occurrence_sites else {
            return false;
        };
        row.key(&self.fields.site_id)
            .is_some_and(|site| sites.contains(&site))
    }
}

impl Check for SitesGeometry {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        let latitude = row.is_present(&self.fields.latitude);
        let longitude = row.is_present(&self.fields.longitude);
        let datum = row.is_present(&self.fields.datum);
        let footprint = row.is_present(&self.fields.footprint);

        let point = latitude && longitude;
        if datum && (point || footprint) {
            return Vec::new();
        }
        if self.has_occurrence_geometry(row) {
            return Vec::new();
        }

        let GeometryFields {
            latitude: lat,
            longitude: lon,
            datum: datum_field,
            footprint: footprint_field,
            ..
        } = &self.fields;
        let note = if point || footprint {
            format!(
                "{datum_field} must be provided when {lat} and {lon} or {footprint_field} are provided"
            )
        } else if latitude != longitude {
            format!("{lat} and {lon} must be provided together")
        } else {
            format!(
                "either {lat}, {lon} and {datum_field}, or {footprint_field} and {datum_field} must be provided"
            )
        };
        vec![ValidationError::row_constraint(row, note)]
    }
}
