//! Cell values exchanged with stored routines.
//!
//! [`SqlValue`] is what a cursor hands out per column and what the parameter
//! binder produces per property. [`FromSqlValue`] is the locale-independent
//! "convert object to target type" rule used by the row mapper.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Uuid(Uuid),
    DateTime(NaiveDateTime),
    Bytes(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "int",
            SqlValue::Float(_) => "float",
            SqlValue::Decimal(_) => "decimal",
            SqlValue::Text(_) => "text",
            SqlValue::Uuid(_) => "uuid",
            SqlValue::DateTime(_) => "datetime",
            SqlValue::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => Ok(()),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Float(x) => write!(f, "{x}"),
            SqlValue::Decimal(d) => write!(f, "{d}"),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Uuid(u) => write!(f, "{u}"),
            SqlValue::DateTime(d) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S%.f")),
            SqlValue::Bytes(b) => b.iter().try_for_each(|byte| write!(f, "{byte:02x}")),
        }
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => SqlValue::Null,
            Value::Bool(b) => SqlValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlValue::Int(i),
                None => SqlValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => SqlValue::Text(s),
            other => SqlValue::Text(other.to_string()),
        }
    }
}

macro_rules! sql_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for SqlValue {
            fn from(v: $ty) -> Self { SqlValue::$variant(v.into()) }
        })*
    };
}

sql_value_from!(
    bool => Bool,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    f32 => Float,
    f64 => Float,
    Decimal => Decimal,
    String => Text,
    Uuid => Uuid,
    NaiveDateTime => DateTime,
    Vec<u8> => Bytes,
);

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self { SqlValue::Text(v.to_string()) }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Conversion from a non-null cell into a property type.
///
/// Callers handle SQL NULL before reaching this trait; `Null` is reported as
/// a conversion failure.
pub trait FromSqlValue: Sized {
    fn from_sql(value: &SqlValue) -> Result<Self, String>;
}

fn unsupported<T>(value: &SqlValue, target: &str) -> Result<T, String> {
    Err(format!("cannot convert {} value '{}' to {}", value.kind(), value, target))
}

impl FromSqlValue for String {
    fn from_sql(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Null => unsupported(value, "string"),
            SqlValue::Text(s) => Ok(s.clone()),
            other => Ok(other.to_string()),
        }
    }
}

impl FromSqlValue for i64 {
    fn from_sql(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Int(i) => Ok(*i),
            SqlValue::Bool(b) => Ok(i64::from(*b)),
            SqlValue::Float(x) => {
                let r = x.round();
                if r.is_finite() && r >= i64::MIN as f64 && r <= i64::MAX as f64 {
                    Ok(r as i64)
                } else {
                    Err(format!("value {x} is outside the range of int64"))
                }
            }
            SqlValue::Decimal(d) => d
                .round()
                .to_i64()
                .ok_or_else(|| format!("value {d} is outside the range of int64")),
            SqlValue::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("'{s}' is not a valid integer: {e}")),
            other => unsupported(other, "int64"),
        }
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {
        $(impl FromSqlValue for $ty {
            fn from_sql(value: &SqlValue) -> Result<Self, String> {
                let wide = i64::from_sql(value)?;
                <$ty>::try_from(wide)
                    .map_err(|_| format!("value {wide} is outside the range of {}", stringify!($ty)))
            }
        })*
    };
}

narrow_int!(i16, i32);

impl FromSqlValue for f64 {
    fn from_sql(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Float(x) => Ok(*x),
            SqlValue::Int(i) => Ok(*i as f64),
            SqlValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            SqlValue::Decimal(d) => d.to_f64().ok_or_else(|| format!("value {d} is not representable as double")),
            SqlValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("'{s}' is not a valid number: {e}")),
            other => unsupported(other, "double"),
        }
    }
}

impl FromSqlValue for f32 {
    fn from_sql(value: &SqlValue) -> Result<Self, String> {
        f64::from_sql(value).map(|x| x as f32)
    }
}

impl FromSqlValue for Decimal {
    fn from_sql(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Decimal(d) => Ok(*d),
            SqlValue::Int(i) => Ok(Decimal::from(*i)),
            SqlValue::Bool(b) => Ok(if *b { Decimal::ONE } else { Decimal::ZERO }),
            SqlValue::Float(x) => Decimal::from_f64(*x).ok_or_else(|| format!("value {x} is not representable as decimal")),
            SqlValue::Text(s) => {
                let t = s.trim();
                Decimal::from_str(t)
                    .or_else(|_| Decimal::from_scientific(t))
                    .map_err(|e| format!("'{s}' is not a valid decimal: {e}"))
            }
            other => unsupported(other, "decimal"),
        }
    }
}

impl FromSqlValue for bool {
    fn from_sql(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Bool(b) => Ok(*b),
            SqlValue::Int(i) => Ok(*i != 0),
            SqlValue::Float(x) => Ok(*x != 0.0),
            SqlValue::Decimal(d) => Ok(!d.is_zero()),
            SqlValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(format!("'{s}' is not a valid boolean")),
            },
            other => unsupported(other, "bool"),
        }
    }
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    let t = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Ok(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("'{s}' is not a valid date/time"))
}

impl FromSqlValue for NaiveDateTime {
    fn from_sql(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::DateTime(d) => Ok(*d),
            SqlValue::Text(s) => parse_datetime(s),
            other => unsupported(other, "datetime"),
        }
    }
}

impl FromSqlValue for DateTime<Utc> {
    fn from_sql(value: &SqlValue) -> Result<Self, String> {
        NaiveDateTime::from_sql(value).map(|d| d.and_utc())
    }
}

impl FromSqlValue for Uuid {
    fn from_sql(value: &SqlValue) -> Result<Self, String> {
        match value {
            SqlValue::Uuid(u) => Ok(*u),
            SqlValue::Text(s) => Uuid::parse_str(s.trim()).map_err(|e| format!("'{s}' is not a valid uuid: {e}")),
            SqlValue::Bytes(b) => Uuid::from_slice(b).map_err(|e| e.to_string()),
            other => unsupported(other, "uuid"),
        }
    }
}

/// Untyped fallback for properties that keep the raw cell.
impl FromSqlValue for serde_json::Value {
    fn from_sql(value: &SqlValue) -> Result<Self, String> {
        Ok(match value {
            SqlValue::Null => serde_json::Value::Null,
            SqlValue::Bool(b) => serde_json::Value::Bool(*b),
            SqlValue::Int(i) => serde_json::Value::from(*i),
            SqlValue::Float(x) => serde_json::Value::from(*x),
            other => serde_json::Value::String(other.to_string()),
        })
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql(value: &SqlValue) -> Result<Self, String> {
        T::from_sql(value).map(Some)
    }
}
