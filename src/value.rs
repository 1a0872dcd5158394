//! Typed Values
//!
//! Nullable wrappers binding a native value to a SIF datatype. A [`SifValue`]
//! never changes after construction; fields take a new value wholesale.
//! How a value looks on the wire is decided by a [`formatter::SifFormatter`]
//! through the [`converter::TypeConverter`] for its category.

pub mod converter;
pub mod decimal;
pub mod duration;
pub mod formatter;
pub mod primitive;

pub use converter::{converter_for, TypeConverter};
pub use decimal::SifDecimal;
pub use duration::SifDuration;
pub use formatter::{formatter_for, Sif1xFormatter, Sif2xFormatter, SifFormatter};
pub use primitive::SifPrimitive;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// SIF datatype category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SifDataType {
    String,
    Int,
    UInt,
    Long,
    Decimal,
    Boolean,
    Date,
    Time,
    DateTime,
    Duration,
}

impl SifDataType {
    pub fn db_type(&self) -> DbType {
        match self {
            SifDataType::String => DbType::String,
            SifDataType::Int => DbType::Int32,
            SifDataType::UInt => DbType::UInt32,
            SifDataType::Long => DbType::Int64,
            SifDataType::Decimal => DbType::Decimal,
            SifDataType::Boolean => DbType::Boolean,
            SifDataType::Date => DbType::Date,
            SifDataType::Time => DbType::Time,
            SifDataType::DateTime => DbType::DateTime,
            SifDataType::Duration => DbType::Duration,
        }
    }
}

/// Storage type reported to database-backed agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbType {
    String,
    Int32,
    UInt32,
    Int64,
    Decimal,
    Boolean,
    Date,
    Time,
    DateTime,
    Duration,
}

/// A present native value of one SIF category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    String(String),
    Int(i32),
    UInt(u32),
    Long(i64),
    Decimal(SifDecimal),
    Boolean(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Duration(SifDuration),
}

impl Primitive {
    pub fn data_type(&self) -> SifDataType {
        match self {
            Primitive::String(_) => SifDataType::String,
            Primitive::Int(_) => SifDataType::Int,
            Primitive::UInt(_) => SifDataType::UInt,
            Primitive::Long(_) => SifDataType::Long,
            Primitive::Decimal(_) => SifDataType::Decimal,
            Primitive::Boolean(_) => SifDataType::Boolean,
            Primitive::Date(_) => SifDataType::Date,
            Primitive::Time(_) => SifDataType::Time,
            Primitive::DateTime(_) => SifDataType::DateTime,
            Primitive::Duration(_) => SifDataType::Duration,
        }
    }

    fn partial_cmp_same(&self, other: &Primitive) -> Option<Ordering> {
        match (self, other) {
            (Primitive::String(a), Primitive::String(b)) => Some(a.cmp(b)),
            (Primitive::Int(a), Primitive::Int(b)) => Some(a.cmp(b)),
            (Primitive::UInt(a), Primitive::UInt(b)) => Some(a.cmp(b)),
            (Primitive::Long(a), Primitive::Long(b)) => Some(a.cmp(b)),
            (Primitive::Decimal(a), Primitive::Decimal(b)) => Some(a.cmp(b)),
            (Primitive::Boolean(a), Primitive::Boolean(b)) => Some(a.cmp(b)),
            (Primitive::Date(a), Primitive::Date(b)) => Some(a.cmp(b)),
            (Primitive::Time(a), Primitive::Time(b)) => Some(a.cmp(b)),
            (Primitive::DateTime(a), Primitive::DateTime(b)) => Some(a.cmp(b)),
            (Primitive::Duration(a), Primitive::Duration(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Typed value: a category tag plus an optional native value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SifValue {
    data_type: SifDataType,
    value: Option<Primitive>,
    #[serde(default)]
    do_not_encode: bool,
}

impl SifValue {
    /// Wrap an optional native value.
    pub fn of<T: SifPrimitive>(value: Option<T>) -> Self {
        Self {
            data_type: T::DATA_TYPE,
            value: value.map(SifPrimitive::into_primitive),
            do_not_encode: false,
        }
    }

    pub fn absent(data_type: SifDataType) -> Self {
        Self {
            data_type,
            value: None,
            do_not_encode: false,
        }
    }

    pub fn from_primitive(value: Primitive) -> Self {
        Self {
            data_type: value.data_type(),
            value: Some(value),
            do_not_encode: false,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::of(Some(value.into()))
    }

    pub fn int(value: Option<i32>) -> Self {
        Self::of(value)
    }

    pub fn boolean(value: Option<bool>) -> Self {
        Self::of(value)
    }

    pub fn date(value: Option<NaiveDate>) -> Self {
        Self::of(value)
    }

    /// Copy of this value flagged to be written without XML escaping.
    pub fn with_do_not_encode(mut self, do_not_encode: bool) -> Self {
        self.do_not_encode = do_not_encode;
        self
    }

    pub fn category(&self) -> SifDataType {
        self.data_type
    }

    pub fn db_type(&self) -> DbType {
        self.data_type.db_type()
    }

    pub fn do_not_encode(&self) -> bool {
        self.do_not_encode
    }

    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    /// Type-erased view of the wrapped value
    pub fn raw(&self) -> Option<&Primitive> {
        self.value.as_ref()
    }

    pub fn into_raw(self) -> Option<Primitive> {
        self.value
    }

    /// Read the wrapped value as `T`. Returns `None` when absent or when `T`
    /// is not this value's category.
    pub fn get<T: SifPrimitive>(&self) -> Option<T> {
        self.value.as_ref().and_then(T::from_primitive)
    }
}

impl PartialEq for SifValue {
    fn eq(&self, other: &Self) -> bool {
        self.data_type == other.data_type && self.value == other.value
    }
}

impl Eq for SifValue {}

impl Hash for SifValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data_type.hash(state);
        match &self.value {
            Some(value) => value.hash(state),
            None => u64::MAX.hash(state),
        }
    }
}

impl From<Primitive> for SifValue {
    fn from(value: Primitive) -> Self {
        SifValue::from_primitive(value)
    }
}

/// Order two values of the same category.
///
/// Two absent values are equal; a present value never orders against an
/// absent one or a value of another category.
pub fn compare_values(a: &SifValue, b: &SifValue) -> Option<Ordering> {
    if a.data_type != b.data_type {
        return None;
    }
    match (&a.value, &b.value) {
        (None, None) => Some(Ordering::Equal),
        (Some(x), Some(y)) => x.partial_cmp_same(y),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &SifValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_equality_follows_wrapped_value() {
        assert_eq!(SifValue::int(Some(3)), SifValue::int(Some(3)));
        assert_ne!(SifValue::int(Some(3)), SifValue::int(Some(4)));
        assert_eq!(SifValue::int(None), SifValue::int(None));
        assert_ne!(SifValue::int(None), SifValue::int(Some(0)));
    }

    #[test]
    fn test_do_not_encode_ignored_by_equality_and_hash() {
        let plain = SifValue::string("<b>");
        let raw = SifValue::string("<b>").with_do_not_encode(true);
        assert!(raw.do_not_encode());
        assert_eq!(plain, raw);
        assert_eq!(hash_of(&plain), hash_of(&raw));
    }

    #[test]
    fn test_absent_hash_is_stable() {
        assert_eq!(
            hash_of(&SifValue::absent(SifDataType::Date)),
            hash_of(&SifValue::date(None))
        );
    }

    #[test]
    fn test_typed_access() {
        let value = SifValue::of(Some(42i64));
        assert_eq!(value.category(), SifDataType::Long);
        assert_eq!(value.db_type(), DbType::Int64);
        assert_eq!(value.get::<i64>(), Some(42));
        assert_eq!(value.get::<i32>(), None);
        assert_eq!(value.raw(), Some(&Primitive::Long(42)));
    }

    #[test]
    fn test_decimal_value_equal_after_json() {
        let value = SifValue::of(Some(SifDecimal::new(150, 2)));
        let json = serde_json::to_string(&value).unwrap();
        let read: SifValue = serde_json::from_str(&json).unwrap();
        assert_eq!(read, SifValue::of(Some(SifDecimal::new(15, 1))));
        assert_eq!(hash_of(&read), hash_of(&value));
    }

    #[test]
    fn test_compare_values() {
        let a = SifValue::int(Some(1));
        let b = SifValue::int(Some(2));
        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));
        assert_eq!(
            compare_values(&SifValue::int(None), &SifValue::int(None)),
            Some(Ordering::Equal)
        );
        assert_eq!(compare_values(&a, &SifValue::int(None)), None);
        assert_eq!(compare_values(&a, &SifValue::string("1")), None);
    }
}
