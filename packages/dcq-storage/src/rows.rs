//! Decodes dynamically-shaped query results into JSON rows. Generated SQL
//! can project any column of the inventory schema, so decoding dispatches on
//! the Postgres type name instead of a compile-time row type.

use serde_json::{Map, Number, Value};
use sqlx::{Column, Row as _, TypeInfo, postgres::PgRow};
use time::format_description::well_known::Rfc3339;

use crate::Row;

pub fn row_to_json(row: &PgRow) -> Row {
	let mut out = Map::new();

	for column in row.columns() {
		let value = decode(row, column.ordinal(), column.type_info().name());

		out.insert(column.name().to_string(), value);
	}

	out
}

fn decode(row: &PgRow, ordinal: usize, type_name: &str) -> Value {
	match type_name {
		"BOOL" => scalar(row.try_get::<Option<bool>, _>(ordinal).map(|v| v.map(Value::Bool))),
		"INT2" => scalar(
			row.try_get::<Option<i16>, _>(ordinal).map(|v| v.map(|n| Value::Number(n.into()))),
		),
		"INT4" => scalar(
			row.try_get::<Option<i32>, _>(ordinal).map(|v| v.map(|n| Value::Number(n.into()))),
		),
		"INT8" => scalar(
			row.try_get::<Option<i64>, _>(ordinal).map(|v| v.map(|n| Value::Number(n.into()))),
		),
		"FLOAT4" => scalar(
			row.try_get::<Option<f32>, _>(ordinal).map(|v| v.map(|n| float(f64::from(n)))),
		),
		"FLOAT8" =>
			scalar(row.try_get::<Option<f64>, _>(ordinal).map(|v| v.map(float))),
		"TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => scalar(
			row.try_get::<Option<String>, _>(ordinal).map(|v| v.map(Value::String)),
		),
		"DATE" => scalar(
			row.try_get::<Option<time::Date>, _>(ordinal)
				.map(|v| v.map(|d| Value::String(d.to_string()))),
		),
		"TIMESTAMP" => scalar(
			row.try_get::<Option<time::PrimitiveDateTime>, _>(ordinal)
				.map(|v| v.map(|d| Value::String(d.to_string()))),
		),
		"TIMESTAMPTZ" => scalar(
			row.try_get::<Option<time::OffsetDateTime>, _>(ordinal).map(|v| {
				v.map(|d| {
					Value::String(d.format(&Rfc3339).unwrap_or_else(|_| d.to_string()))
				})
			}),
		),
		"JSON" | "JSONB" => scalar(row.try_get::<Option<Value>, _>(ordinal)),
		other => {
			tracing::warn!(r#type = other, "Unsupported column type in query result.");

			Value::Null
		},
	}
}

fn scalar(result: Result<Option<Value>, sqlx::Error>) -> Value {
	match result {
		Ok(Some(value)) => value,
		Ok(None) => Value::Null,
		Err(err) => {
			tracing::warn!(error = %err, "Failed to decode column value.");

			Value::Null
		},
	}
}

fn float(n: f64) -> Value {
	Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}
