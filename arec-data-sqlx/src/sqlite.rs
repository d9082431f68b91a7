//! Value binding and row decoding for SQLite.
//!
//! SQLite has four storage classes, so timestamps, UUIDs and JSON travel as
//! text and are parsed back by the model's `FromValue` impls.

use arec_data::{DataError, Kind, Row as DataRow, Value};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{Database, Row, TypeInfo, ValueRef};

use crate::error::SqlxErrorExt;

type SqliteQuery<'q> = Query<'q, Sqlite, <Sqlite as Database>::Arguments<'q>>;

pub(crate) fn bind_all<'q>(mut query: SqliteQuery<'q>, args: &[Value]) -> SqliteQuery<'q> {
    for arg in args {
        query = bind(query, arg.clone());
    }
    query
}

fn bind(query: SqliteQuery<'_>, value: Value) -> SqliteQuery<'_> {
    match value {
        Value::Null(kind) => match kind {
            Kind::Bool => query.bind(None::<bool>),
            Kind::Int => query.bind(None::<i64>),
            Kind::Float => query.bind(None::<f64>),
            Kind::Bytes => query.bind(None::<Vec<u8>>),
            Kind::Text | Kind::Timestamp | Kind::Json | Kind::Uuid => query.bind(None::<String>),
        },
        Value::Bool(b) => query.bind(b),
        Value::Int(i) => query.bind(i),
        Value::Float(f) => query.bind(f),
        Value::Text(s) => query.bind(s),
        Value::Timestamp(ts) => query.bind(ts.to_rfc3339()),
        Value::Bytes(b) => query.bind(b),
        Value::Json(json) => query.bind(json.to_string()),
        Value::Uuid(u) => query.bind(u.hyphenated().to_string()),
    }
}

pub(crate) fn decode_row(row: &SqliteRow) -> Result<DataRow, DataError> {
    (0..row.len()).map(|i| decode_column(row, i)).collect()
}

fn decode_column(row: &SqliteRow, index: usize) -> Result<Value, DataError> {
    let raw = row.try_get_raw(index).map_err(SqlxErrorExt::into_data_error)?;
    let type_name = raw.type_info().name().to_ascii_uppercase();
    let kind = kind_of(&type_name);
    if raw.is_null() {
        return Ok(Value::Null(kind));
    }

    // Storage classes are dynamic, so decode by the value's own class.
    let value = match kind {
        Kind::Int => Value::Int(get(row, index)?),
        Kind::Bool => Value::Bool(get(row, index)?),
        Kind::Float => Value::Float(get(row, index)?),
        Kind::Bytes => Value::Bytes(get(row, index)?),
        Kind::Text | Kind::Timestamp | Kind::Json | Kind::Uuid => Value::Text(get(row, index)?),
    };
    Ok(value)
}

fn get<'r, T>(row: &'r SqliteRow, index: usize) -> Result<T, DataError>
where
    T: sqlx::Decode<'r, Sqlite>,
{
    row.try_get_unchecked(index).map_err(SqlxErrorExt::into_data_error)
}

fn kind_of(type_name: &str) -> Kind {
    match type_name {
        "INTEGER" | "INT" | "INT4" | "INT8" | "BIGINT" => Kind::Int,
        "BOOLEAN" => Kind::Bool,
        "REAL" | "FLOAT" | "DOUBLE" => Kind::Float,
        "BLOB" => Kind::Bytes,
        _ => Kind::Text,
    }
}
