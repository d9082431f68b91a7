//! Column values exchanged between models, statements and backends.
//!
//! [`Value`] is a closed tagged union; conversions in and out of Rust field
//! types go through [`ToValue`] and [`FromValue`], which reject incompatible
//! shapes with a [`ValueError`] instead of panicking.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

/// The type of a value, kept on `Null` so backends can bind typed NULLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Float,
    Text,
    Timestamp,
    Bytes,
    Json,
    Uuid,
}

impl Kind {
    pub const ALL: [Kind; 8] = [
        Kind::Bool,
        Kind::Int,
        Kind::Float,
        Kind::Text,
        Kind::Timestamp,
        Kind::Bytes,
        Kind::Json,
        Kind::Uuid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Text => "text",
            Kind::Timestamp => "timestamp",
            Kind::Bytes => "bytes",
            Kind::Json => "json",
            Kind::Uuid => "uuid",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null(Kind),
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    Uuid(Uuid),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null(kind) => *kind,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Text(_) => Kind::Text,
            Value::Timestamp(_) => Kind::Timestamp,
            Value::Bytes(_) => Kind::Bytes,
            Value::Json(_) => Kind::Json,
            Value::Uuid(_) => Kind::Uuid,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    /// Name used in type-mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null(_) => "null",
            other => other.kind().name(),
        }
    }

    /// The "required" test: true when the value is the zero value of its type.
    ///
    /// Drives key addressability and insert-vs-update dispatch.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null(_) => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Text(s) => s.is_empty(),
            Value::Timestamp(ts) => ts.timestamp() == 0 && ts.timestamp_subsec_nanos() == 0,
            Value::Bytes(b) => b.is_empty(),
            Value::Json(json) => match json {
                serde_json::Value::Null => true,
                serde_json::Value::String(s) => s.is_empty(),
                serde_json::Value::Array(a) => a.is_empty(),
                serde_json::Value::Object(o) => o.is_empty(),
                _ => false,
            },
            Value::Uuid(u) => u.is_nil(),
        }
    }
}

/// A value that could not be converted into the requested field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl ValueError {
    pub fn new(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            found: found.type_name(),
        }
    }
}

impl std::fmt::Display for ValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expected {}, found {}", self.expected, self.found)
    }
}

impl std::error::Error for ValueError {}

/// Conversion from a model field into a [`Value`].
pub trait ToValue {
    /// Kind reported for `None` when the field is optional.
    const KIND: Kind;

    fn to_value(&self) -> Value;
}

/// Conversion from a scanned [`Value`] back into a model field.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl ToValue for bool {
    const KIND: Kind = Kind::Bool;
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            // SQLite has no boolean storage class.
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            other => Err(ValueError::new("bool", &other)),
        }
    }
}

macro_rules! int_value {
    ($($ty:ty),+) => {
        $(
            impl ToValue for $ty {
                const KIND: Kind = Kind::Int;
                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i)
                            .map_err(|_| ValueError { expected: stringify!($ty), found: "out-of-range int" }),
                        other => Err(ValueError::new(stringify!($ty), &other)),
                    }
                }
            }
        )+
    };
}

int_value!(i16, i32, i64, u8, u16, u32);

impl ToValue for u64 {
    const KIND: Kind = Kind::Int;
    // Above i64::MAX there is no integer representation; decimal text makes the
    // store reject the value instead of storing a wrapped number.
    fn to_value(&self) -> Value {
        match i64::try_from(*self) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Text(self.to_string()),
        }
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Int(i) => u64::try_from(i).map_err(|_| ValueError {
                expected: "u64",
                found: "out-of-range int",
            }),
            Value::Text(s) => s.parse().map_err(|_| ValueError {
                expected: "u64",
                found: "text",
            }),
            other => Err(ValueError::new("u64", &other)),
        }
    }
}

impl ToValue for f64 {
    const KIND: Kind = Kind::Float;
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(ValueError::new("f64", &other)),
        }
    }
}

impl ToValue for f32 {
    const KIND: Kind = Kind::Float;
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl ToValue for String {
    const KIND: Kind = Kind::Text;
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(ValueError::new("String", &other)),
        }
    }
}

impl ToValue for Vec<u8> {
    const KIND: Kind = Kind::Bytes;
    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(ValueError::new("Vec<u8>", &other)),
        }
    }
}

impl ToValue for DateTime<Utc> {
    const KIND: Kind = Kind::Timestamp;
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Timestamp(ts) => Ok(ts),
            // SQLite stores timestamps as text.
            Value::Text(ref s) => parse_timestamp(s).ok_or_else(|| ValueError::new("DateTime<Utc>", &value)),
            other => Err(ValueError::new("DateTime<Utc>", &other)),
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

impl ToValue for serde_json::Value {
    const KIND: Kind = Kind::Json;
    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Json(json) => Ok(json),
            Value::Text(ref s) => serde_json::from_str(s).map_err(|_| ValueError::new("json", &value)),
            other => Err(ValueError::new("json", &other)),
        }
    }
}

impl ToValue for Uuid {
    const KIND: Kind = Kind::Uuid;
    fn to_value(&self) -> Value {
        Value::Uuid(*self)
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Uuid(u) => Ok(u),
            Value::Text(ref s) => Uuid::parse_str(s).map_err(|_| ValueError::new("Uuid", &value)),
            Value::Bytes(ref b) => Uuid::from_slice(b).map_err(|_| ValueError::new("Uuid", &value)),
            other => Err(ValueError::new("Uuid", &other)),
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    const KIND: Kind = T::KIND;
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null(T::KIND),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null(_) => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
