//! Type converters
//!
//! One converter per datatype category, selected by a field's declared
//! datatype. A converter owns the parse/render rules for its category and
//! delegates the era-specific lexical form to the formatter it is given.

use super::formatter::SifFormatter;
use super::primitive::SifPrimitive;
use super::{DbType, Primitive, SifDataType, SifDecimal, SifDuration, SifValue};
use crate::error::{AdkError, ParseError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::marker::PhantomData;

/// Parses and renders values of a single datatype category.
pub trait TypeConverter: Send + Sync {
    fn data_type(&self) -> SifDataType;

    fn db_type(&self) -> DbType {
        self.data_type().db_type()
    }

    /// Parse wire text. `None` is an absent value; so is blank text for every
    /// category except strings.
    fn parse(&self, formatter: &dyn SifFormatter, text: Option<&str>)
        -> Result<SifValue, ParseError>;

    /// Render a value; absent values render as `None`.
    fn to_text(
        &self,
        formatter: &dyn SifFormatter,
        value: &SifValue,
    ) -> Result<Option<String>, AdkError>;

    /// Wrap an arbitrary native value, coercing it to this category when a
    /// sensible conversion exists.
    fn get_wrapped(&self, value: Primitive) -> Result<SifValue, AdkError>;
}

/// Converter for the category bound to `T`.
pub struct PrimitiveConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> PrimitiveConverter<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: SifPrimitive> TypeConverter for PrimitiveConverter<T> {
    fn data_type(&self) -> SifDataType {
        T::DATA_TYPE
    }

    fn parse(
        &self,
        formatter: &dyn SifFormatter,
        text: Option<&str>,
    ) -> Result<SifValue, ParseError> {
        match text {
            None => Ok(SifValue::absent(T::DATA_TYPE)),
            Some(t) if T::DATA_TYPE != SifDataType::String && t.trim().is_empty() => {
                Ok(SifValue::absent(T::DATA_TYPE))
            }
            Some(t) => T::parse_with(formatter, t).map(|v| SifValue::of(Some(v))),
        }
    }

    fn to_text(
        &self,
        formatter: &dyn SifFormatter,
        value: &SifValue,
    ) -> Result<Option<String>, AdkError> {
        if value.category() != T::DATA_TYPE {
            return Err(AdkError::invalid_cast(
                format!("{:?}", T::DATA_TYPE),
                format!("{:?}", value.category()),
            ));
        }
        Ok(value.get::<T>().map(|v| v.format_with(formatter)))
    }

    fn get_wrapped(&self, value: Primitive) -> Result<SifValue, AdkError> {
        match T::coerce(&value) {
            Some(v) => Ok(SifValue::of(Some(v))),
            None => Err(AdkError::invalid_cast(
                format!("{:?}", T::DATA_TYPE),
                format!("{:?}", value),
            )),
        }
    }
}

static STRING: PrimitiveConverter<String> = PrimitiveConverter::new();
static INT: PrimitiveConverter<i32> = PrimitiveConverter::new();
static UINT: PrimitiveConverter<u32> = PrimitiveConverter::new();
static LONG: PrimitiveConverter<i64> = PrimitiveConverter::new();
static DECIMAL: PrimitiveConverter<SifDecimal> = PrimitiveConverter::new();
static BOOLEAN: PrimitiveConverter<bool> = PrimitiveConverter::new();
static DATE: PrimitiveConverter<NaiveDate> = PrimitiveConverter::new();
static TIME: PrimitiveConverter<NaiveTime> = PrimitiveConverter::new();
static DATETIME: PrimitiveConverter<NaiveDateTime> = PrimitiveConverter::new();
static DURATION: PrimitiveConverter<SifDuration> = PrimitiveConverter::new();

/// Converter for a declared datatype.
pub fn converter_for(data_type: SifDataType) -> &'static dyn TypeConverter {
    match data_type {
        SifDataType::String => &STRING,
        SifDataType::Int => &INT,
        SifDataType::UInt => &UINT,
        SifDataType::Long => &LONG,
        SifDataType::Decimal => &DECIMAL,
        SifDataType::Boolean => &BOOLEAN,
        SifDataType::Date => &DATE,
        SifDataType::Time => &TIME,
        SifDataType::DateTime => &DATETIME,
        SifDataType::Duration => &DURATION,
    }
}

/// Render any present value with a formatter.
pub fn primitive_text(formatter: &dyn SifFormatter, value: &Primitive) -> String {
    match value {
        Primitive::String(s) => s.clone(),
        Primitive::Int(v) => v.to_string(),
        Primitive::UInt(v) => v.to_string(),
        Primitive::Long(v) => v.to_string(),
        Primitive::Decimal(d) => formatter.decimal_to_text(d),
        Primitive::Boolean(b) => formatter.bool_to_text(*b),
        Primitive::Date(d) => formatter.date_to_text(*d),
        Primitive::Time(t) => formatter.time_to_text(*t),
        Primitive::DateTime(dt) => formatter.datetime_to_text(*dt),
        Primitive::Duration(d) => formatter.duration_to_text(d),
    }
}

/// Render a value with the converter for its own category.
pub fn value_text(formatter: &dyn SifFormatter, value: &SifValue) -> Option<String> {
    value.raw().map(|p| primitive_text(formatter, p))
}
