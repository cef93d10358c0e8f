//! Generic field extraction and value formatting
//!
//! Every entity the API returns is rendered through the same three
//! operations: [`extract`] walks a dotted field path, [`format_value`] turns a
//! raw value into table text, and [`to_document`] produces the lossless tree
//! used by the JSON and YAML output modes.

use crate::error::DisplayError;
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const MISSING: &str = "-";

/// One column of a table, or one row of a detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    /// Dot-separated path, e.g. `customer.email`.
    pub path: &'static str,
}

impl Column {
    pub const fn new(header: &'static str, path: &'static str) -> Self {
        Self { header, path }
    }
}

/// Something the formatter can read fields from.
///
/// A record answers named-field lookups and offers up to two ways of becoming
/// a document: a canonical serialization, or an enumeration of its fields.
pub trait Record {
    fn field(&self, name: &str) -> Option<Value>;

    /// Canonical serialization, if the record has one.
    fn document(&self) -> Option<Value> {
        None
    }

    /// Names of the fields this record exposes, in display order.
    fn field_names(&self) -> Vec<String> {
        Vec::new()
    }
}

impl Record for Value {
    fn field(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(map) => map.get(name).cloned(),
            _ => None,
        }
    }

    fn document(&self) -> Option<Value> {
        Some(self.clone())
    }
}

/// Implements [`Record`] for a serde model through its canonical serialization.
#[macro_export]
macro_rules! impl_serialized_record {
    ($($model:ty),+ $(,)?) => {
        $(
            impl $crate::display::format::Record for $model {
                fn field(&self, name: &str) -> Option<serde_json::Value> {
                    $crate::display::format::serialized_field(self, name)
                }

                fn document(&self) -> Option<serde_json::Value> {
                    serde_json::to_value(self).ok()
                }
            }
        )+
    };
}

pub fn serialized_field<T: Serialize>(model: &T, name: &str) -> Option<Value> {
    match serde_json::to_value(model).ok()? {
        Value::Object(mut map) => map.remove(name),
        _ => None,
    }
}

/// Loosely-typed record built field by field. Fields whose name starts with
/// `_` are internal: readable through [`Record::field`] but never exported.
#[derive(Debug, Clone, Default)]
pub struct LooseRecord {
    fields: Vec<(String, Value)>,
}

impl LooseRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.fields.push((name.into(), value));
        self
    }
}

impl Record for LooseRecord {
    fn field(&self, name: &str) -> Option<Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.clone())
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// Walk `path` through `item`. Any missing segment or null along the way
/// yields `Value::Null`.
pub fn extract(item: &dyn Record, path: &str) -> Value {
    let mut segments = path.split('.');
    let Some(first) = segments.next() else {
        return Value::Null;
    };

    let mut current = match item.field(first) {
        Some(value) => value,
        None => return Value::Null,
    };

    for segment in segments {
        current = match current {
            Value::Object(mut map) => match map.remove(segment) {
                Some(value) => value,
                None => return Value::Null,
            },
            _ => return Value::Null,
        };
    }

    current
}

/// Human-readable text for a table cell.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => MISSING.to_string(),
        Value::Bool(true) => "Yes".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::String(text) => format_timestamp(text).unwrap_or_else(|| text.clone()),
        Value::Array(items) => items.iter().map(scalar_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Scalar list elements read like cells; nested containers stay JSON text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => value.to_string(),
        scalar => format_value(scalar),
    }
}

/// Shorten an ISO-8601 timestamp to minutes, keeping whatever offset it carries.
pub fn format_timestamp(text: &str) -> Option<String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.format(TIMESTAMP_FORMAT).to_string());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.format(TIMESTAMP_FORMAT).to_string())
}

/// Lossless document for JSON/YAML output.
///
/// Tries the record's canonical serialization first, then enumerates its
/// public fields.
pub fn to_document(item: &dyn Record) -> Result<Value, DisplayError> {
    if let Some(document) = item.document() {
        return Ok(document);
    }

    let names = item.field_names();
    if names.is_empty() {
        return Err(DisplayError::NotSerializable(
            "record exposes neither a document nor fields".to_string(),
        ));
    }

    let map: Map<String, Value> = names
        .into_iter()
        .filter(|name| !name.starts_with('_'))
        .map(|name| {
            let value = item.field(&name).unwrap_or(Value::Null);
            (name, value)
        })
        .collect();
    Ok(Value::Object(map))
}
