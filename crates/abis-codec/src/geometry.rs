//! Well-known-text geometry.
//!
//! Text is parsed with the `wkt` crate, then the parsed geometry is written
//! back in a canonical layout: upper-case keywords, `, ` between coordinates
//! and every number rounded to a fixed number of decimals. `Z`, `M` and `ZM`
//! are kept when the coordinates carry them.

use abis_model::{Field, Geometry, Value};
use wkt::Wkt;
use wkt::types::{Coord, Point, Polygon};

use crate::Codec;
use crate::error::{DecodeError, EncodeError, Result};

pub const DEFAULT_PRECISION: u8 = 8;

#[derive(Debug, Clone)]
pub struct WktCodec {
    precision: u8,
}

impl Default for WktCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

impl WktCodec {
    pub fn new(precision: u8) -> Self {
        Self { precision }
    }

    pub fn from_field(field: &Field) -> Result<Self> {
        Ok(Self::new(field.precision.unwrap_or(DEFAULT_PRECISION)))
    }

    fn parse(&self, text: &str) -> std::result::Result<Geometry, DecodeError> {
        canonicalize(text, self.precision).map(Geometry::new)
    }
}

impl Codec for WktCodec {
    fn type_tag(&self) -> &'static str {
        "wkt"
    }

    fn decode(&self, raw: &Value) -> std::result::Result<Value, DecodeError> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Geometry(geometry) => Ok(Value::Geometry(geometry.clone())),
            Value::String(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(Value::Null);
                }
                self.parse(text).map(Value::Geometry)
            }
            other => Err(DecodeError::unexpected("well-known text", other)),
        }
    }

    fn encode(&self, value: &Value) -> std::result::Result<String, EncodeError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::Geometry(geometry) => canonicalize(geometry.as_wkt(), self.precision)
                .map_err(|_| EncodeError::new("wkt", value)),
            other => Err(EncodeError::new("wkt", other)),
        }
    }
}

/// Parse WKT text and write it back in the canonical layout.
pub fn canonicalize(text: &str, precision: u8) -> std::result::Result<String, DecodeError> {
    let geometry = text
        .trim()
        .parse::<Wkt<f64>>()
        .map_err(|reason| DecodeError::new(format!("invalid well-known text: {reason}")))?;
    Ok(write_geometry(&geometry, precision))
}

fn write_geometry(geometry: &Wkt<f64>, precision: u8) -> String {
    let coords = |coords: &[Coord<f64>]| write_coords(coords, precision);
    match geometry {
        Wkt::Point(point) => tagged("POINT", first_point(point), write_point(point, precision)),
        Wkt::LineString(line) => tagged("LINESTRING", line.0.first(), coords(&line.0)),
        Wkt::Polygon(polygon) => {
            tagged("POLYGON", first_ring(polygon), write_polygon(polygon, precision))
        }
        Wkt::MultiPoint(multi) => {
            let members = multi.0.iter().map(|point| write_point(point, precision));
            tagged("MULTIPOINT", multi.0.iter().find_map(first_point), group(members))
        }
        Wkt::MultiLineString(multi) => {
            let members = multi.0.iter().map(|line| coords(&line.0));
            let first = multi.0.iter().find_map(|line| line.0.first());
            tagged("MULTILINESTRING", first, group(members))
        }
        Wkt::MultiPolygon(multi) => {
            let members = multi.0.iter().map(|polygon| write_polygon(polygon, precision));
            tagged("MULTIPOLYGON", multi.0.iter().find_map(first_ring), group(members))
        }
        Wkt::GeometryCollection(collection) => {
            let members = collection
                .0
                .iter()
                .map(|member| write_geometry(member, precision));
            format!("GEOMETRYCOLLECTION {}", group(members))
        }
    }
}

/// Keyword, dimension suffix taken from `sample`, then the body.
fn tagged(keyword: &str, sample: Option<&Coord<f64>>, body: String) -> String {
    let suffix = match sample.map(|coord| (coord.z.is_some(), coord.m.is_some())) {
        Some((true, true)) => " ZM",
        Some((true, false)) => " Z",
        Some((false, true)) => " M",
        _ => "",
    };
    format!("{keyword}{suffix} {body}")
}

fn first_point(point: &Point<f64>) -> Option<&Coord<f64>> {
    point.0.as_ref()
}

fn first_ring(polygon: &Polygon<f64>) -> Option<&Coord<f64>> {
    polygon.0.first().and_then(|ring| ring.0.first())
}

fn write_point(point: &Point<f64>, precision: u8) -> String {
    match &point.0 {
        Some(coord) => format!("({})", write_coord(coord, precision)),
        None => "EMPTY".to_string(),
    }
}

fn write_polygon(polygon: &Polygon<f64>, precision: u8) -> String {
    group(polygon.0.iter().map(|ring| write_coords(&ring.0, precision)))
}

fn write_coords(coords: &[Coord<f64>], precision: u8) -> String {
    group(coords.iter().map(|coord| write_coord(coord, precision)))
}

fn write_coord(coord: &Coord<f64>, precision: u8) -> String {
    [Some(coord.x), Some(coord.y), coord.z, coord.m]
        .into_iter()
        .flatten()
        .map(|value| format_coordinate(value, precision))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `(a, b, c)`, or `EMPTY` when there are no members.
fn group(members: impl Iterator<Item = String>) -> String {
    let members = members.collect::<Vec<_>>();
    if members.is_empty() {
        "EMPTY".to_string()
    } else {
        format!("({})", members.join(", "))
    }
}

fn format_coordinate(value: f64, precision: u8) -> String {
    let mut text = format!("{value:.prec$}", prec = usize::from(precision));
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}
