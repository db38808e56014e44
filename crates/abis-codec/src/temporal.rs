//! Flexible-precision timestamps.
//!
//! Accepted layouts, tried from most to least specific:
//!
//! - `YYYY-MM-DDThh:mm[:ss[.fff]][Z|±hh:mm|±hhmm]` (a space may replace `T`)
//! - `YYYY-MM-DD` and `DD/MM/YYYY`
//! - `YYYY-MM` and `MM/YYYY`
//! - `YYYY`
//!
//! Years always have four digits so `01/02/03` is never guessed at.

use std::sync::LazyLock;

use abis_model::{Timestamp, Value};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};

use crate::Codec;
use crate::error::{DecodeError, EncodeError};

static DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{2})-(\d{2})[T ](\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?(Z|[+-]\d{2}:?\d{2})?$",
    )
    .expect("valid datetime pattern")
});
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid date pattern"));
static DMY_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid date pattern"));
static ISO_YEAR_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("valid year-month pattern"));
static MY_YEAR_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{4})$").expect("valid year-month pattern"));
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})$").expect("valid year pattern"));

#[derive(Debug, Clone, Default)]
pub struct TimestampCodec;

impl Codec for TimestampCodec {
    fn type_tag(&self) -> &'static str {
        "timestamp"
    }

    fn decode(&self, raw: &Value) -> Result<Value, DecodeError> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Timestamp(value) => Ok(Value::Timestamp(value.clone())),
            Value::String(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(Value::Null);
                }
                parse_timestamp(text).map(Value::Timestamp)
            }
            other => Err(DecodeError::unexpected("a timestamp", other)),
        }
    }

    fn encode(&self, value: &Value) -> Result<String, EncodeError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::Timestamp(value) => Ok(value.to_string()),
            other => Err(EncodeError::new("timestamp", other)),
        }
    }
}

/// Parse a trimmed, non-empty timestamp string.
pub fn parse_timestamp(text: &str) -> Result<Timestamp, DecodeError> {
    let invalid = || DecodeError::new(format!("\"{text}\" is not a valid timestamp"));

    if let Some(caps) = DATETIME.captures(text) {
        return parse_datetime(&caps).ok_or_else(invalid);
    }
    if let Some(caps) = ISO_DATE.captures(text) {
        return date(number(&caps, 1), number(&caps, 2), number(&caps, 3)).ok_or_else(invalid);
    }
    if let Some(caps) = DMY_DATE.captures(text) {
        return date(number(&caps, 3), number(&caps, 2), number(&caps, 1)).ok_or_else(invalid);
    }
    if let Some(caps) = ISO_YEAR_MONTH.captures(text) {
        return year_month(number(&caps, 1), number(&caps, 2)).ok_or_else(invalid);
    }
    if let Some(caps) = MY_YEAR_MONTH.captures(text) {
        return year_month(number(&caps, 2), number(&caps, 1)).ok_or_else(invalid);
    }
    if let Some(caps) = YEAR.captures(text) {
        return Ok(Timestamp::Year(number(&caps, 1) as i32));
    }
    Err(invalid())
}

/// Numeric capture group; groups are all-digit so parsing cannot fail.
fn number(caps: &Captures<'_>, group: usize) -> u32 {
    caps.get(group)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or_default()
}

fn date(year: u32, month: u32, day: u32) -> Option<Timestamp> {
    NaiveDate::from_ymd_opt(year as i32, month, day).map(Timestamp::Date)
}

fn year_month(year: u32, month: u32) -> Option<Timestamp> {
    (1..=12).contains(&month).then_some(Timestamp::YearMonth {
        year: year as i32,
        month,
    })
}

fn parse_datetime(caps: &Captures<'_>) -> Option<Timestamp> {
    let date = NaiveDate::from_ymd_opt(
        number(caps, 1) as i32,
        number(caps, 2),
        number(caps, 3),
    )?;
    let nanos = caps.get(7).map_or(0, |m| fraction_to_nanos(m.as_str()));
    let time = NaiveTime::from_hms_nano_opt(number(caps, 4), number(caps, 5), number(caps, 6), nanos)?;
    let naive = NaiveDateTime::new(date, time);
    match caps.get(8) {
        None => Some(Timestamp::DateTime(naive)),
        Some(offset) => {
            let offset = parse_offset(offset.as_str())?;
            naive
                .and_local_timezone(offset)
                .single()
                .map(Timestamp::ZonedDateTime)
        }
    }
}

fn fraction_to_nanos(fraction: &str) -> u32 {
    let padded = format!("{fraction:0<9}");
    padded.parse().unwrap_or_default()
}

fn parse_offset(text: &str) -> Option<FixedOffset> {
    if text == "Z" {
        return FixedOffset::east_opt(0);
    }
    let sign = if text.starts_with('-') { -1 } else { 1 };
    let digits: String = text[1..].chars().filter(char::is_ascii_digit).collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
