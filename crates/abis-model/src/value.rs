//! Typed cell values.
//!
//! Every cell handed to a check has already been decoded by its field codec
//! into one of these variants. A missing cell and a cell that decoded to
//! nothing are both [`Value::Null`].

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Timelike};

/// A decoded cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Timestamp(Timestamp),
    Geometry(Geometry),
    List(Vec<String>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_present(&self) -> bool {
        !self.is_null()
    }

    /// Text used when the value takes part in a lookup or a tuple key.
    ///
    /// Returns `None` for null so callers cannot accidentally match an empty
    /// string against a lookup entry.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Value::Timestamp(value) => Some(value),
            _ => None,
        }
    }

    /// Short variant label used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Timestamp(_) => "timestamp",
            Value::Geometry(_) => "wkt",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::String(text) => f.write_str(text),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Number(value) => write!(f, "{value}"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Timestamp(value) => write!(f, "{value}"),
            Value::Geometry(value) => write!(f, "{value}"),
            Value::List(items) => f.write_str(&items.join("|")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Granularity of a [`Timestamp`], ordered from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Precision {
    Year,
    YearMonth,
    Date,
    DateTime,
}

/// A temporal value that keeps the precision it was supplied with.
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    Year(i32),
    YearMonth { year: i32, month: u32 },
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    ZonedDateTime(DateTime<FixedOffset>),
}

impl Timestamp {
    pub fn precision(&self) -> Precision {
        match self {
            Timestamp::Year(_) => Precision::Year,
            Timestamp::YearMonth { .. } => Precision::YearMonth,
            Timestamp::Date(_) => Precision::Date,
            Timestamp::DateTime(_) | Timestamp::ZonedDateTime(_) => Precision::DateTime,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            Timestamp::Year(year) => *year,
            Timestamp::YearMonth { year, .. } => *year,
            Timestamp::Date(date) => date.year(),
            Timestamp::DateTime(datetime) => datetime.year(),
            Timestamp::ZonedDateTime(datetime) => datetime.year(),
        }
    }

    pub fn month(&self) -> Option<u32> {
        match self {
            Timestamp::Year(_) => None,
            Timestamp::YearMonth { month, .. } => Some(*month),
            Timestamp::Date(date) => Some(date.month()),
            Timestamp::DateTime(datetime) => Some(datetime.month()),
            Timestamp::ZonedDateTime(datetime) => Some(datetime.month()),
        }
    }

    /// Calendar date in the value's own offset.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Timestamp::Year(_) | Timestamp::YearMonth { .. } => None,
            Timestamp::Date(date) => Some(*date),
            Timestamp::DateTime(datetime) => Some(datetime.date()),
            Timestamp::ZonedDateTime(datetime) => Some(datetime.date_naive()),
        }
    }

    fn local_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Timestamp::DateTime(datetime) => Some(*datetime),
            Timestamp::ZonedDateTime(datetime) => Some(datetime.naive_local()),
            _ => None,
        }
    }

    /// Compare two timestamps at the coarser of their two precisions.
    ///
    /// Both values are truncated to the common precision first, so `2020`
    /// and `2020-06-30` compare equal. Two zoned date-times compare as
    /// instants; any other date-time pair compares by local wall time.
    pub fn cmp_common_precision(&self, other: &Timestamp) -> Ordering {
        match self.precision().min(other.precision()) {
            Precision::Year => self.year().cmp(&other.year()),
            Precision::YearMonth => (self.year(), self.month()).cmp(&(other.year(), other.month())),
            Precision::Date => self.date().cmp(&other.date()),
            Precision::DateTime => match (self, other) {
                (Timestamp::ZonedDateTime(left), Timestamp::ZonedDateTime(right)) => left.cmp(right),
                _ => self.local_datetime().cmp(&other.local_datetime()),
            },
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Year(year) => write!(f, "{year:04}"),
            Timestamp::YearMonth { year, month } => write!(f, "{year:04}-{month:02}"),
            Timestamp::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Timestamp::DateTime(datetime) => {
                if datetime.nanosecond() == 0 {
                    write!(f, "{}", datetime.format("%Y-%m-%dT%H:%M:%S"))
                } else {
                    write!(f, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.f"))
                }
            }
            Timestamp::ZonedDateTime(datetime) => {
                f.write_str(&datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

/// Canonical well-known-text geometry.
///
/// Holds text already produced by the WKT codec; construct it through the
/// codec so the coordinates are parsed and rounded consistently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Geometry(String);

impl Geometry {
    pub fn new(wkt: impl Into<String>) -> Self {
        Self(wkt.into())
    }

    pub fn as_wkt(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
