//! Value binding and row decoding for PostgreSQL.

use arec_data::{DataError, Kind, Row as DataRow, Value};
use chrono::NaiveDateTime;
use sqlx::postgres::{PgRow, Postgres};
use sqlx::query::Query;
use sqlx::{Database, Row, TypeInfo, ValueRef};

use crate::error::SqlxErrorExt;

type PgQuery<'q> = Query<'q, Postgres, <Postgres as Database>::Arguments<'q>>;

pub(crate) fn bind_all<'q>(mut query: PgQuery<'q>, args: &[Value]) -> PgQuery<'q> {
    for arg in args {
        query = bind(query, arg.clone());
    }
    query
}

fn bind(query: PgQuery<'_>, value: Value) -> PgQuery<'_> {
    match value {
        // Typed NULLs: an untyped text NULL would not coerce into non-text columns.
        Value::Null(kind) => match kind {
            Kind::Bool => query.bind(None::<bool>),
            Kind::Int => query.bind(None::<i64>),
            Kind::Float => query.bind(None::<f64>),
            Kind::Text => query.bind(None::<String>),
            Kind::Timestamp => query.bind(None::<chrono::DateTime<chrono::Utc>>),
            Kind::Bytes => query.bind(None::<Vec<u8>>),
            Kind::Json => query.bind(None::<serde_json::Value>),
            Kind::Uuid => query.bind(None::<uuid::Uuid>),
        },
        Value::Bool(b) => query.bind(b),
        Value::Int(i) => query.bind(i),
        Value::Float(f) => query.bind(f),
        Value::Text(s) => query.bind(s),
        Value::Timestamp(ts) => query.bind(ts),
        Value::Bytes(b) => query.bind(b),
        Value::Json(json) => query.bind(json),
        Value::Uuid(u) => query.bind(u),
    }
}

pub(crate) fn decode_row(row: &PgRow) -> Result<DataRow, DataError> {
    (0..row.len()).map(|i| decode_column(row, i)).collect()
}

fn decode_column(row: &PgRow, index: usize) -> Result<Value, DataError> {
    let raw = row.try_get_raw(index).map_err(SqlxErrorExt::into_data_error)?;
    let type_name = raw.type_info().name().to_string();
    let kind = kind_of(&type_name)?;
    if raw.is_null() {
        return Ok(Value::Null(kind));
    }

    let value = match (kind, type_name.as_str()) {
        (Kind::Bool, _) => Value::Bool(get(row, index)?),
        (Kind::Int, "INT2") => Value::Int(i64::from(get::<i16>(row, index)?)),
        (Kind::Int, "INT4") => Value::Int(i64::from(get::<i32>(row, index)?)),
        (Kind::Int, _) => Value::Int(get(row, index)?),
        (Kind::Float, "FLOAT4") => Value::Float(f64::from(get::<f32>(row, index)?)),
        (Kind::Float, _) => Value::Float(get(row, index)?),
        (Kind::Text, _) => Value::Text(get(row, index)?),
        (Kind::Timestamp, "TIMESTAMP") => {
            Value::Timestamp(get::<NaiveDateTime>(row, index)?.and_utc())
        }
        (Kind::Timestamp, _) => Value::Timestamp(get(row, index)?),
        (Kind::Bytes, _) => Value::Bytes(get(row, index)?),
        (Kind::Json, _) => Value::Json(get(row, index)?),
        (Kind::Uuid, _) => Value::Uuid(get(row, index)?),
    };
    Ok(value)
}

fn get<'r, T>(row: &'r PgRow, index: usize) -> Result<T, DataError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(index).map_err(SqlxErrorExt::into_data_error)
}

fn kind_of(type_name: &str) -> Result<Kind, DataError> {
    Ok(match type_name {
        "BOOL" => Kind::Bool,
        "INT2" | "INT4" | "INT8" => Kind::Int,
        "FLOAT4" | "FLOAT8" => Kind::Float,
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => Kind::Text,
        "TIMESTAMPTZ" | "TIMESTAMP" => Kind::Timestamp,
        "BYTEA" => Kind::Bytes,
        "JSON" | "JSONB" => Kind::Json,
        "UUID" => Kind::Uuid,
        other => return Err(DataError::UnsupportedType(other.to_string())),
    })
}
