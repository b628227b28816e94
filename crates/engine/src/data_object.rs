//! Data-object extraction: declared data objects → initial variables.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Number, Value};

use crate::{definition::Variables, error::DataObjectError, models::DataObject};

/// Turns a process's data objects into its initial variables.
pub trait DataObjectExtractor: Send + Sync {
    fn extract(&self, data_objects: &[DataObject]) -> Result<Variables, DataObjectError>;
}

/// The stock [`DataObjectExtractor`], typed by `itemSubjectRef`.
///
/// | `itemSubjectRef`            | value          |
/// |-----------------------------|----------------|
/// | `xsd:string` / missing      | string         |
/// | `xsd:boolean`               | bool           |
/// | `xsd:int`                   | 32-bit integer |
/// | `xsd:long`                  | 64-bit integer |
/// | `xsd:double`                | float          |
/// | `xsd:datetime`              | RFC 3339 UTC   |
///
/// Unknown types keep the raw string.  A data object without a value
/// becomes `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedDataObjectExtractor;

fn invalid(object: &DataObject, item_type: &str, raw: &str) -> DataObjectError {
    DataObjectError::InvalidValue {
        name: object.name.clone(),
        item_type: item_type.to_owned(),
        value: raw.to_owned(),
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn typed_value(object: &DataObject) -> Result<Value, DataObjectError> {
    let Some(raw) = object.value.as_deref() else {
        return Ok(Value::Null);
    };
    let item_type = object.item_subject_ref.as_deref().unwrap_or("xsd:string");
    let trimmed = raw.trim();

    let value = match item_type.to_ascii_lowercase().as_str() {
        "xsd:boolean" => match trimmed {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(invalid(object, item_type, raw)),
        },
        "xsd:int" => trimmed
            .parse::<i32>()
            .map(Value::from)
            .map_err(|_| invalid(object, item_type, raw))?,
        "xsd:long" => trimmed
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid(object, item_type, raw))?,
        "xsd:double" => trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid(object, item_type, raw))?,
        "xsd:datetime" => parse_datetime(trimmed)
            .map(|dt| Value::String(dt.to_rfc3339()))
            .ok_or_else(|| invalid(object, item_type, raw))?,
        _ => Value::String(raw.to_owned()),
    };
    Ok(value)
}

impl DataObjectExtractor for TypedDataObjectExtractor {
    fn extract(&self, data_objects: &[DataObject]) -> Result<Variables, DataObjectError> {
        let mut variables = Variables::new();
        for object in data_objects {
            variables.insert(object.name.clone(), typed_value(object)?);
        }
        Ok(variables)
    }
}
