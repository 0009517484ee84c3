//! Schema-checked conversion between records and JSON object mappings.
//!
//! Records are persisted as nested JSON objects (inside TIFF descriptions and
//! session files). Field layout comes from the serde derives; on top of that
//! decoding reports absent or `null` required keys by name, and both
//! directions run the record's `validate`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{CoreError, Result};

pub type Mapping = Map<String, Value>;

pub trait MappingRecord: Serialize + DeserializeOwned {
    /// Record name used in errors.
    const RECORD: &'static str;
    /// Keys that must be present and non-null.
    const REQUIRED: &'static [&'static str];

    /// Checks key presence ahead of decoding. Records with nested records
    /// extend this to their children.
    fn check_keys(mapping: &Mapping) -> Result<()> {
        require_keys(mapping, Self::RECORD, Self::REQUIRED)
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn to_value(&self) -> Result<Value> {
        self.validate()?;
        serde_json::to_value(self).map_err(|error| CoreError::Encode {
            record: Self::RECORD,
            reason: error.to_string(),
        })
    }

    fn to_mapping(&self) -> Result<Mapping> {
        match self.to_value()? {
            Value::Object(mapping) => Ok(mapping),
            other => Err(not_a_mapping(Self::RECORD, &other)),
        }
    }

    fn from_mapping(mapping: &Mapping) -> Result<Self> {
        Self::check_keys(mapping)?;
        let record: Self = serde_json::from_value(Value::Object(mapping.clone())).map_err(
            |error| CoreError::Decode {
                record: Self::RECORD,
                reason: error.to_string(),
            },
        )?;
        record.validate()?;
        Ok(record)
    }

    fn from_value(value: &Value) -> Result<Self> {
        let mapping = value
            .as_object()
            .ok_or_else(|| not_a_mapping(Self::RECORD, value))?;
        Self::from_mapping(mapping)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

fn not_a_mapping(record: &'static str, value: &Value) -> CoreError {
    CoreError::invalid(
        record,
        "<root>",
        format!("expected a mapping, found {}", kind_of(value)),
    )
}

pub(crate) fn require_keys(
    mapping: &Mapping,
    record: &'static str,
    keys: &[&'static str],
) -> Result<()> {
    for &key in keys {
        if mapping.get(key).is_none_or(Value::is_null) {
            return Err(CoreError::MissingKey { record, key });
        }
    }
    Ok(())
}

/// Runs `R::check_keys` on `mapping[key]` when it holds a mapping. Anything
/// else is left for the decoder to reject.
pub(crate) fn check_nested<R: MappingRecord>(mapping: &Mapping, key: &str) -> Result<()> {
    match mapping.get(key) {
        Some(Value::Object(inner)) => R::check_keys(inner),
        _ => Ok(()),
    }
}

/// JSON has no encoding for NaN or infinity, so they are refused before
/// they can be written as `null`.
pub(crate) fn ensure_finite(record: &'static str, key: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::invalid(
            record,
            key,
            format!("{value} is not a finite number"),
        ))
    }
}

pub(crate) fn ensure_finite_opt(
    record: &'static str,
    key: &'static str,
    value: Option<f64>,
) -> Result<()> {
    value.map_or(Ok(()), |value| ensure_finite(record, key, value))
}
