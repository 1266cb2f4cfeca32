//! Static value generator and YAML to Value conversion.

use crate::generators::temporal::parse_timestamp;
use chrono::{NaiveDate, NaiveTime};
use relgen_core::{FieldType, Value};
use rust_decimal::Decimal;
use serde_yaml::Value as YamlValue;
use std::str::FromStr;
use uuid::Uuid;

/// Convert a YAML value to a Value.
///
/// With a `field_type` hint, strings are parsed into dates, timestamps,
/// times, UUIDs or decimals and integers widen to floats where the field
/// expects it. Strings that do not parse stay text. Sequences and mappings
/// become JSON documents.
pub fn yaml_to_value(yaml: &YamlValue, field_type: Option<&FieldType>) -> Value {
    match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => match field_type {
            Some(FieldType::Float) => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            Some(FieldType::Decimal { .. }) => Decimal::from_str(&n.to_string())
                .map(Value::Decimal)
                .unwrap_or_else(|_| Value::Text(n.to_string())),
            _ => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Text(n.to_string())
                }
            }
        },
        YamlValue::String(s) => string_to_value(s, field_type),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => serde_json::to_value(yaml)
            .map(Value::Json)
            .unwrap_or(Value::Null),
        YamlValue::Tagged(tagged) => yaml_to_value(&tagged.value, field_type),
    }
}

fn string_to_value(s: &str, field_type: Option<&FieldType>) -> Value {
    let parsed = match field_type {
        Some(FieldType::Date) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Value::Date),
        Some(FieldType::Time) => NaiveTime::parse_from_str(s, "%H:%M:%S")
            .ok()
            .map(Value::Time),
        Some(FieldType::DateTime) => parse_timestamp(s).map(Value::DateTime),
        Some(FieldType::Uuid) => Uuid::parse_str(s).ok().map(Value::Uuid),
        Some(FieldType::Decimal { .. }) => Decimal::from_str(s).ok().map(Value::Decimal),
        _ => None,
    };
    parsed.unwrap_or_else(|| Value::Text(s.to_string()))
}
