//! Protocol-era formatters
//!
//! SIF 1.x and SIF 2.x render the same logical values differently (dates,
//! times and booleans changed when the schema moved to XML Schema types).
//! Callers pick the formatter for the negotiated version with
//! [`formatter_for`].

use super::{SifDataType, SifDecimal, SifDuration};
use crate::error::ParseError;
use crate::version::SifVersion;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Wire rendering of SIF primitive values for one protocol era.
pub trait SifFormatter: Send + Sync {
    fn name(&self) -> &'static str;

    fn date_to_text(&self, value: NaiveDate) -> String;
    fn parse_date(&self, text: &str) -> Result<NaiveDate, ParseError>;

    fn time_to_text(&self, value: NaiveTime) -> String;
    fn parse_time(&self, text: &str) -> Result<NaiveTime, ParseError>;

    fn datetime_to_text(&self, value: NaiveDateTime) -> String;
    fn parse_datetime(&self, text: &str) -> Result<NaiveDateTime, ParseError>;

    fn bool_to_text(&self, value: bool) -> String;
    fn parse_bool(&self, text: &str) -> Result<bool, ParseError>;

    fn parse_int(&self, text: &str) -> Result<i32, ParseError> {
        text.trim()
            .parse()
            .map_err(|e| ParseError::new(text, SifDataType::Int, format!("{}", e)))
    }

    fn parse_uint(&self, text: &str) -> Result<u32, ParseError> {
        text.trim()
            .parse()
            .map_err(|e| ParseError::new(text, SifDataType::UInt, format!("{}", e)))
    }

    fn parse_long(&self, text: &str) -> Result<i64, ParseError> {
        text.trim()
            .parse()
            .map_err(|e| ParseError::new(text, SifDataType::Long, format!("{}", e)))
    }

    fn decimal_to_text(&self, value: &SifDecimal) -> String {
        value.to_string()
    }

    fn parse_decimal(&self, text: &str) -> Result<SifDecimal, ParseError> {
        SifDecimal::parse(text).map_err(|e| ParseError::new(text, SifDataType::Decimal, e))
    }

    fn duration_to_text(&self, value: &SifDuration) -> String {
        value.to_string()
    }

    fn parse_duration(&self, text: &str) -> Result<SifDuration, ParseError> {
        SifDuration::parse(text).map_err(|e| ParseError::new(text, SifDataType::Duration, e))
    }
}

const SIF1X_DATE: &str = "%Y%m%d";
const SIF1X_DATETIME: &str = "%Y%m%dT%H:%M:%S";
const XS_DATE: &str = "%Y-%m-%d";
const XS_TIME: &str = "%H:%M:%S";
const XS_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Formatter for SIF 1.1 through 1.5r1
#[derive(Debug, Default, Clone, Copy)]
pub struct Sif1xFormatter;

/// Formatter for SIF 2.0 and later (XML Schema lexical forms)
#[derive(Debug, Default, Clone, Copy)]
pub struct Sif2xFormatter;

static SIF1X: Sif1xFormatter = Sif1xFormatter;
static SIF2X: Sif2xFormatter = Sif2xFormatter;

/// Select the formatter for a negotiated protocol version.
pub fn formatter_for(version: SifVersion) -> &'static dyn SifFormatter {
    if version.is_sif1x() {
        &SIF1X
    } else {
        &SIF2X
    }
}

impl SifFormatter for Sif1xFormatter {
    fn name(&self) -> &'static str {
        "SIF 1.x"
    }

    fn date_to_text(&self, value: NaiveDate) -> String {
        value.format(SIF1X_DATE).to_string()
    }

    fn parse_date(&self, text: &str) -> Result<NaiveDate, ParseError> {
        NaiveDate::parse_from_str(text.trim(), SIF1X_DATE)
            .map_err(|e| ParseError::new(text, SifDataType::Date, e.to_string()))
    }

    fn time_to_text(&self, value: NaiveTime) -> String {
        value.format(XS_TIME).to_string()
    }

    fn parse_time(&self, text: &str) -> Result<NaiveTime, ParseError> {
        NaiveTime::parse_from_str(text.trim(), XS_TIME)
            .map_err(|e| ParseError::new(text, SifDataType::Time, e.to_string()))
    }

    fn datetime_to_text(&self, value: NaiveDateTime) -> String {
        value.format(SIF1X_DATETIME).to_string()
    }

    fn parse_datetime(&self, text: &str) -> Result<NaiveDateTime, ParseError> {
        NaiveDateTime::parse_from_str(text.trim(), SIF1X_DATETIME)
            .map_err(|e| ParseError::new(text, SifDataType::DateTime, e.to_string()))
    }

    fn bool_to_text(&self, value: bool) -> String {
        let text = if value { "Yes" } else { "No" };
        text.to_string()
    }

    fn parse_bool(&self, text: &str) -> Result<bool, ParseError> {
        match text.trim() {
            t if t.eq_ignore_ascii_case("yes") => Ok(true),
            t if t.eq_ignore_ascii_case("no") => Ok(false),
            _ => Err(ParseError::new(text, SifDataType::Boolean, "expected Yes or No")),
        }
    }
}

/// Drop an xs time zone designator (`Z`, `+hh:mm`, `-hh:mm`) from the end of
/// a time or dateTime lexical value.
fn strip_zone(text: &str) -> &str {
    if let Some(stripped) = text.strip_suffix('Z') {
        return stripped;
    }
    if text.len() > 6 && text.is_char_boundary(text.len() - 6) {
        let (head, tail) = text.split_at(text.len() - 6);
        let bytes = tail.as_bytes();
        if (bytes[0] == b'+' || bytes[0] == b'-') && bytes[3] == b':' {
            // a date-only value also ends in "-dd", so require a time part
            if head.contains(':') {
                return head;
            }
        }
    }
    text
}

/// Drop an xs time zone designator from an xs:date value. Only `Z` or a
/// trailing `+hh:mm` / `-hh:mm` is removed.
fn strip_date_zone(text: &str) -> &str {
    if let Some(stripped) = text.strip_suffix('Z') {
        return stripped;
    }
    if text.len() > 6 && text.is_char_boundary(text.len() - 6) {
        let (head, tail) = text.split_at(text.len() - 6);
        let b = tail.as_bytes();
        let is_offset = (b[0] == b'+' || b[0] == b'-')
            && b[1].is_ascii_digit()
            && b[2].is_ascii_digit()
            && b[3] == b':'
            && b[4].is_ascii_digit()
            && b[5].is_ascii_digit();
        if is_offset {
            return head;
        }
    }
    text
}

/// Drop fractional seconds after `ss`.
fn strip_fraction(text: &str) -> &str {
    match text.rfind('.') {
        Some(pos) if text[pos + 1..].chars().all(|c| c.is_ascii_digit()) => &text[..pos],
        _ => text,
    }
}

impl SifFormatter for Sif2xFormatter {
    fn name(&self) -> &'static str {
        "SIF 2.x"
    }

    fn date_to_text(&self, value: NaiveDate) -> String {
        value.format(XS_DATE).to_string()
    }

    fn parse_date(&self, text: &str) -> Result<NaiveDate, ParseError> {
        NaiveDate::parse_from_str(strip_date_zone(text.trim()), XS_DATE)
            .map_err(|e| ParseError::new(text, SifDataType::Date, e.to_string()))
    }

    fn time_to_text(&self, value: NaiveTime) -> String {
        value.format(XS_TIME).to_string()
    }

    fn parse_time(&self, text: &str) -> Result<NaiveTime, ParseError> {
        let trimmed = strip_fraction(strip_zone(text.trim()));
        NaiveTime::parse_from_str(trimmed, XS_TIME)
            .map_err(|e| ParseError::new(text, SifDataType::Time, e.to_string()))
    }

    fn datetime_to_text(&self, value: NaiveDateTime) -> String {
        value.format(XS_DATETIME).to_string()
    }

    fn parse_datetime(&self, text: &str) -> Result<NaiveDateTime, ParseError> {
        let trimmed = strip_fraction(strip_zone(text.trim()));
        NaiveDateTime::parse_from_str(trimmed, XS_DATETIME)
            .map_err(|e| ParseError::new(text, SifDataType::DateTime, e.to_string()))
    }

    fn bool_to_text(&self, value: bool) -> String {
        value.to_string()
    }

    fn parse_bool(&self, text: &str) -> Result<bool, ParseError> {
        match text.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ParseError::new(text, SifDataType::Boolean, "expected true or false")),
        }
    }
}
