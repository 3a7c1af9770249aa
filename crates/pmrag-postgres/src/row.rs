//! Decoding `PgRow`s into records
//!
//! Columns are decoded by their Postgres type name. Anything unknown is tried as text and
//! becomes `Null` when that fails too.

use pmrag_core::{Record, Value};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::debug;

use crate::error::PostgresResult;

/// Decode every column of `row`
pub fn decode_row(row: &PgRow) -> PostgresResult<Record> {
    let mut record = Record::with_capacity(row.columns().len());
    for (index, column) in row.columns().iter().enumerate() {
        let value = decode_column(row, index, column.type_info().name())?;
        record.insert(column.name(), value);
    }
    Ok(record)
}

/// Decode every row
pub fn decode_rows(rows: &[PgRow]) -> PostgresResult<Vec<Record>> {
    rows.iter().map(decode_row).collect()
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> PostgresResult<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "BOOL" => Value::Bool(row.try_get::<bool, _>(index)?),
        "INT2" => Value::Int(row.try_get::<i16, _>(index)? as i64),
        "INT4" => Value::Int(row.try_get::<i32, _>(index)? as i64),
        "INT8" => Value::Int(row.try_get::<i64, _>(index)?),
        "FLOAT4" => Value::Float(row.try_get::<f32, _>(index)? as f64),
        "FLOAT8" => Value::Float(row.try_get::<f64, _>(index)?),
        "NUMERIC" => match row.try_get::<Decimal, _>(index) {
            Ok(decimal) => numeric_value(decimal),
            Err(e) => {
                debug!(error = %e, "NUMERIC outside decimal range, using null");
                Value::Null
            }
        },
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" | "CITEXT" => {
            Value::Text(row.try_get::<String, _>(index)?)
        }
        "UUID" => Value::Text(row.try_get::<uuid::Uuid, _>(index)?.to_string()),
        "DATE" => Value::Text(row.try_get::<chrono::NaiveDate, _>(index)?.to_string()),
        "TIMESTAMP" => Value::Text(
            row.try_get::<chrono::NaiveDateTime, _>(index)?
                .format("%Y-%m-%d %H:%M:%S%.f")
                .to_string(),
        ),
        "TIMESTAMPTZ" => Value::Text(
            row.try_get::<chrono::DateTime<chrono::Utc>, _>(index)?
                .to_rfc3339(),
        ),
        "JSON" | "JSONB" => Value::from_json(row.try_get::<serde_json::Value, _>(index)?),
        "FLOAT4[]" => Value::List(
            row.try_get::<Vec<f32>, _>(index)?
                .into_iter()
                .map(|f| Value::Float(f as f64))
                .collect(),
        ),
        "FLOAT8[]" => Value::List(
            row.try_get::<Vec<f64>, _>(index)?
                .into_iter()
                .map(Value::Float)
                .collect(),
        ),
        "INT4[]" => Value::List(
            row.try_get::<Vec<i32>, _>(index)?
                .into_iter()
                .map(|i| Value::Int(i as i64))
                .collect(),
        ),
        "INT8[]" => Value::List(
            row.try_get::<Vec<i64>, _>(index)?
                .into_iter()
                .map(Value::Int)
                .collect(),
        ),
        "TEXT[]" | "VARCHAR[]" | "NAME[]" => Value::List(
            row.try_get::<Vec<String>, _>(index)?
                .into_iter()
                .map(Value::Text)
                .collect(),
        ),
        other => match row.try_get_unchecked::<String, _>(index) {
            Ok(text) => Value::Text(text),
            Err(e) => {
                debug!(column_type = other, error = %e, "undecodable column, using null");
                Value::Null
            }
        },
    };
    Ok(value)
}

/// Integral NUMERICs (scale 0) that fit in `i64` become `Int`, everything else `Float`
pub(crate) fn numeric_value(decimal: Decimal) -> Value {
    if decimal.scale() == 0 {
        if let Some(i) = decimal.to_i64() {
            return Value::Int(i);
        }
    }
    decimal.to_f64().map(Value::Float).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn decimal(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_numeric_integer() {
        assert_eq!(numeric_value(decimal("12345")), Value::Int(12345));
        assert_eq!(numeric_value(decimal("-7")), Value::Int(-7));
        assert_eq!(numeric_value(decimal("0")), Value::Int(0));
    }

    #[test]
    fn test_numeric_large_integer_is_exact() {
        // above 2^53, where an f64 round trip would change the value
        assert_eq!(
            numeric_value(decimal("9007199254740993")),
            Value::Int(9_007_199_254_740_993)
        );
        assert_eq!(numeric_value(decimal("9223372036854775807")), Value::Int(i64::MAX));
    }

    #[test]
    fn test_numeric_fraction() {
        assert_eq!(numeric_value(decimal("3.5")), Value::Float(3.5));
        assert_eq!(numeric_value(decimal("12.50")), Value::Float(12.5));
    }

    #[test]
    fn test_numeric_beyond_i64_is_float() {
        assert_eq!(
            numeric_value(decimal("92233720368547758070")),
            Value::Float(92233720368547758070.0)
        );
    }
}
