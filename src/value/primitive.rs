//! Native types that can be wrapped in a [`SifValue`](super::SifValue)

use super::formatter::{Sif2xFormatter, SifFormatter};
use super::{Primitive, SifDataType, SifDecimal, SifDuration};
use crate::error::ParseError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// A native Rust type bound to one SIF datatype category.
pub trait SifPrimitive: Sized + Clone + Send + Sync + 'static {
    const DATA_TYPE: SifDataType;

    fn into_primitive(self) -> Primitive;

    /// Exact extraction; `None` for any other category.
    fn from_primitive(value: &Primitive) -> Option<Self>;

    fn parse_with(formatter: &dyn SifFormatter, text: &str) -> Result<Self, ParseError>;

    fn format_with(&self, formatter: &dyn SifFormatter) -> String;

    /// Best-effort conversion from a value of any category.
    ///
    /// Text is parsed with the SIF 2.x lexical forms.
    fn coerce(value: &Primitive) -> Option<Self> {
        if let Some(exact) = Self::from_primitive(value) {
            return Some(exact);
        }
        match value {
            Primitive::String(text) => Self::parse_with(&Sif2xFormatter, text).ok(),
            _ => None,
        }
    }
}

/// Integral view of a numeric primitive, used for widening/narrowing.
fn integral(value: &Primitive) -> Option<i128> {
    match value {
        Primitive::Int(v) => Some(*v as i128),
        Primitive::UInt(v) => Some(*v as i128),
        Primitive::Long(v) => Some(*v as i128),
        Primitive::Decimal(d) => d.to_integer(),
        _ => None,
    }
}

impl SifPrimitive for String {
    const DATA_TYPE: SifDataType = SifDataType::String;

    fn into_primitive(self) -> Primitive {
        Primitive::String(self)
    }

    fn from_primitive(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn parse_with(_formatter: &dyn SifFormatter, text: &str) -> Result<Self, ParseError> {
        Ok(text.to_string())
    }

    fn format_with(&self, _formatter: &dyn SifFormatter) -> String {
        self.clone()
    }

    fn coerce(value: &Primitive) -> Option<Self> {
        Some(super::converter::primitive_text(&Sif2xFormatter, value))
    }
}

impl SifPrimitive for i32 {
    const DATA_TYPE: SifDataType = SifDataType::Int;

    fn into_primitive(self) -> Primitive {
        Primitive::Int(self)
    }

    fn from_primitive(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn parse_with(formatter: &dyn SifFormatter, text: &str) -> Result<Self, ParseError> {
        formatter.parse_int(text)
    }

    fn format_with(&self, _formatter: &dyn SifFormatter) -> String {
        self.to_string()
    }

    fn coerce(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::String(text) => Self::parse_with(&Sif2xFormatter, text).ok(),
            other => integral(other).and_then(|v| i32::try_from(v).ok()),
        }
    }
}

impl SifPrimitive for u32 {
    const DATA_TYPE: SifDataType = SifDataType::UInt;

    fn into_primitive(self) -> Primitive {
        Primitive::UInt(self)
    }

    fn from_primitive(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::UInt(v) => Some(*v),
            _ => None,
        }
    }

    fn parse_with(formatter: &dyn SifFormatter, text: &str) -> Result<Self, ParseError> {
        formatter.parse_uint(text)
    }

    fn format_with(&self, _formatter: &dyn SifFormatter) -> String {
        self.to_string()
    }

    fn coerce(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::String(text) => Self::parse_with(&Sif2xFormatter, text).ok(),
            other => integral(other).and_then(|v| u32::try_from(v).ok()),
        }
    }
}

impl SifPrimitive for i64 {
    const DATA_TYPE: SifDataType = SifDataType::Long;

    fn into_primitive(self) -> Primitive {
        Primitive::Long(self)
    }

    fn from_primitive(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::Long(v) => Some(*v),
            _ => None,
        }
    }

    fn parse_with(formatter: &dyn SifFormatter, text: &str) -> Result<Self, ParseError> {
        formatter.parse_long(text)
    }

    fn format_with(&self, _formatter: &dyn SifFormatter) -> String {
        self.to_string()
    }

    fn coerce(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::String(text) => Self::parse_with(&Sif2xFormatter, text).ok(),
            other => integral(other).and_then(|v| i64::try_from(v).ok()),
        }
    }
}

impl SifPrimitive for SifDecimal {
    const DATA_TYPE: SifDataType = SifDataType::Decimal;

    fn into_primitive(self) -> Primitive {
        Primitive::Decimal(self)
    }

    fn from_primitive(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    fn parse_with(formatter: &dyn SifFormatter, text: &str) -> Result<Self, ParseError> {
        formatter.parse_decimal(text)
    }

    fn format_with(&self, formatter: &dyn SifFormatter) -> String {
        formatter.decimal_to_text(self)
    }

    fn coerce(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::Decimal(d) => Some(*d),
            Primitive::String(text) => Self::parse_with(&Sif2xFormatter, text).ok(),
            other => integral(other).map(|v| SifDecimal::new(v, 0)),
        }
    }
}

impl SifPrimitive for bool {
    const DATA_TYPE: SifDataType = SifDataType::Boolean;

    fn into_primitive(self) -> Primitive {
        Primitive::Boolean(self)
    }

    fn from_primitive(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    fn parse_with(formatter: &dyn SifFormatter, text: &str) -> Result<Self, ParseError> {
        formatter.parse_bool(text)
    }

    fn format_with(&self, formatter: &dyn SifFormatter) -> String {
        formatter.bool_to_text(*self)
    }
}

impl SifPrimitive for NaiveDate {
    const DATA_TYPE: SifDataType = SifDataType::Date;

    fn into_primitive(self) -> Primitive {
        Primitive::Date(self)
    }

    fn from_primitive(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::Date(d) => Some(*d),
            _ => None,
        }
    }

    fn parse_with(formatter: &dyn SifFormatter, text: &str) -> Result<Self, ParseError> {
        formatter.parse_date(text)
    }

    fn format_with(&self, formatter: &dyn SifFormatter) -> String {
        formatter.date_to_text(*self)
    }

    fn coerce(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::Date(d) => Some(*d),
            Primitive::DateTime(dt) => Some(dt.date()),
            Primitive::String(text) => Self::parse_with(&Sif2xFormatter, text).ok(),
            _ => None,
        }
    }
}

impl SifPrimitive for NaiveTime {
    const DATA_TYPE: SifDataType = SifDataType::Time;

    fn into_primitive(self) -> Primitive {
        Primitive::Time(self)
    }

    fn from_primitive(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::Time(t) => Some(*t),
            _ => None,
        }
    }

    fn parse_with(formatter: &dyn SifFormatter, text: &str) -> Result<Self, ParseError> {
        formatter.parse_time(text)
    }

    fn format_with(&self, formatter: &dyn SifFormatter) -> String {
        formatter.time_to_text(*self)
    }

    fn coerce(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::Time(t) => Some(*t),
            Primitive::DateTime(dt) => Some(dt.time()),
            Primitive::String(text) => Self::parse_with(&Sif2xFormatter, text).ok(),
            _ => None,
        }
    }
}

impl SifPrimitive for NaiveDateTime {
    const DATA_TYPE: SifDataType = SifDataType::DateTime;

    fn into_primitive(self) -> Primitive {
        Primitive::DateTime(self)
    }

    fn from_primitive(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    fn parse_with(formatter: &dyn SifFormatter, text: &str) -> Result<Self, ParseError> {
        formatter.parse_datetime(text)
    }

    fn format_with(&self, formatter: &dyn SifFormatter) -> String {
        formatter.datetime_to_text(*self)
    }

    fn coerce(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::DateTime(dt) => Some(*dt),
            Primitive::Date(d) => d.and_hms_opt(0, 0, 0),
            Primitive::String(text) => Self::parse_with(&Sif2xFormatter, text).ok(),
            _ => None,
        }
    }
}

impl SifPrimitive for SifDuration {
    const DATA_TYPE: SifDataType = SifDataType::Duration;

    fn into_primitive(self) -> Primitive {
        Primitive::Duration(self)
    }

    fn from_primitive(value: &Primitive) -> Option<Self> {
        match value {
            Primitive::Duration(d) => Some(*d),
            _ => None,
        }
    }

    fn parse_with(formatter: &dyn SifFormatter, text: &str) -> Result<Self, ParseError> {
        formatter.parse_duration(text)
    }

    fn format_with(&self, formatter: &dyn SifFormatter) -> String {
        formatter.duration_to_text(self)
    }
}
