//! Coordinate bounds.
//!
//! A point must fall inside at least one permitted bounding box. Rows
//! missing either coordinate are not checked.

use abis_model::{ErrorKind, Lookups, Row, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::check::Check;
use crate::checks::parse_params;
use crate::error::RegistryError;

pub const TYPE: &str = "coordinates";
pub const ERROR_KINDS: &[ErrorKind] = &[ErrorKind::RowConstraint];

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub name: String,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn new(
        name: impl Into<String>,
        (min_latitude, max_latitude): (f64, f64),
        (min_longitude, max_longitude): (f64, f64),
    ) -> Self {
        Self {
            name: name.into(),
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

/// Australia and its external territories.
pub fn default_bounding_boxes() -> Vec<BoundingBox> {
    vec![
        BoundingBox::new("Australian mainland and Tasmania", (-44.0, -9.0), (112.0, 154.0)),
        BoundingBox::new("Lord Howe Island", (-31.9, -31.3), (158.9, 159.4)),
        BoundingBox::new("Norfolk Island", (-29.2, -28.9), (167.8, 168.1)),
        BoundingBox::new("Christmas Island", (-10.7, -10.3), (105.5, 105.8)),
        BoundingBox::new("Cocos (Keeling) Islands", (-12.3, -11.8), (96.7, 97.0)),
        BoundingBox::new("Macquarie Island", (-54.8, -54.4), (158.7, 159.0)),
        BoundingBox::new("Heard and McDonald Islands", (-53.3, -52.9), (72.5, 73.9)),
        // Adelie Land (136E to 142E) is not part of the territory.
        BoundingBox::new("Australian Antarctic Territory", (-90.0, -60.0), (44.63, 136.0)),
        BoundingBox::new("Australian Antarctic Territory", (-90.0, -60.0), (142.0, 160.0)),
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct Params {
    latitude_field: String,
    longitude_field: String,
    bounding_boxes: Option<Vec<BoundingBox>>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            latitude_field: "decimalLatitude".to_string(),
            longitude_field: "decimalLongitude".to_string(),
            bounding_boxes: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Coordinates {
    latitude_field: String,
    longitude_field: String,
    boxes: Vec<BoundingBox>,
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::new("decimalLatitude", "decimalLongitude")
    }
}

impl Coordinates {
    pub fn new(latitude_field: impl Into<String>, longitude_field: impl Into<String>) -> Self {
        Self {
            latitude_field: latitude_field.into(),
            longitude_field: longitude_field.into(),
            boxes: default_bounding_boxes(),
        }
    }

    #[must_use]
    pub fn with_bounding_boxes(mut self, boxes: Vec<BoundingBox>) -> Self {
        self.boxes = boxes;
        self
    }

    pub fn from_params(params: &JsonValue, _lookups: &Lookups) -> Result<Box<dyn Check>, RegistryError> {
        let params: Params = parse_params(TYPE, params)?;
        let mut check = Self::new(params.latitude_field, params.longitude_field);
        if let Some(boxes) = params.bounding_boxes {
            check = check.with_bounding_boxes(boxes);
        }
        Ok(Box::new(check))
    }
}

impl Check for Coordinates {
    fn type_tag(&self) -> &'static str {
        TYPE
    }

    fn error_kinds(&self) -> &'static [ErrorKind] {
        ERROR_KINDS
    }

    fn validate_row(&mut self, row: &Row) -> Vec<ValidationError> {
        let (Some(latitude), Some(longitude)) = (
            row.get(&self.latitude_field).as_f64(),
            row.get(&self.longitude_field).as_f64(),
        ) else {
            return Vec::new();
        };
        if self.boxes.iter().any(|bounds| bounds.contains(latitude, longitude)) {
            return Vec::new();
        }
        vec![ValidationError::row_constraint(
            row,
            format!("coordinates ({latitude}, {longitude}) are not within any permitted area"),
        )]
    }
}
