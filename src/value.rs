//! Setting values
//!
//! A setting holds whatever type it was registered or overridden with. Values
//! read from the environment are always strings, so comparisons across types
//! go through the canonical string form produced by the `Display` impl.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

/// A tagged setting value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SettingValue {
    /// No environment value and no default
    #[default]
    Null,
    String(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
    /// Arbitrary structured data
    Other(serde_json::Value),
}

impl SettingValue {
    /// Short lowercase name of the value's type
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Null => "null",
            SettingValue::String(_) => "string",
            SettingValue::Bool(_) => "boolean",
            SettingValue::Integer(_) => "integer",
            SettingValue::Float(_) => "float",
            SettingValue::Timestamp(_) => "timestamp",
            SettingValue::Other(_) => "other",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SettingValue::Null)
    }

    /// Compare two values by their canonical string form, ignoring type
    pub fn loose_eq(&self, other: &SettingValue) -> bool {
        self.to_string() == other.to_string()
    }

    /// Convert a TOML value, keeping scalars typed and nesting as `Other`
    pub fn from_toml(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => SettingValue::String(s),
            toml::Value::Integer(i) => SettingValue::Integer(i),
            toml::Value::Float(f) => SettingValue::Float(f),
            toml::Value::Boolean(b) => SettingValue::Bool(b),
            toml::Value::Datetime(dt) => {
                // Only offset datetimes are instants; local dates and times stay textual
                let text = dt.to_string();
                match DateTime::parse_from_rfc3339(&text) {
                    Ok(parsed) => SettingValue::Timestamp(parsed.with_timezone(&Utc)),
                    Err(_) => SettingValue::String(text),
                }
            }
            nested @ (toml::Value::Array(_) | toml::Value::Table(_)) => {
                SettingValue::Other(toml_to_json(nested))
            }
        }
    }

    /// Convert a JSON value, keeping scalars typed and nesting as `Other`
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => SettingValue::Null,
            serde_json::Value::Bool(b) => SettingValue::Bool(b),
            serde_json::Value::String(s) => SettingValue::String(s),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SettingValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    SettingValue::Float(f)
                } else {
                    SettingValue::Other(serde_json::Value::Number(n))
                }
            }
            nested => SettingValue::Other(nested),
        }
    }
}

fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

fn format_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

/// Canonical string form used for loose comparison.
///
/// | type      | form                                              |
/// |-----------|---------------------------------------------------|
/// | null      | empty string                                      |
/// | string    | unchanged                                         |
/// | boolean   | `true` / `false`                                  |
/// | integer   | decimal                                           |
/// | float     | shortest round-trip decimal, `.0` kept for whole numbers |
/// | timestamp | RFC 3339 in UTC with a `Z` suffix                 |
/// | other     | raw text for JSON strings, compact JSON otherwise |
impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Null => Ok(()),
            SettingValue::String(s) => f.write_str(s),
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Integer(i) => write!(f, "{}", i),
            SettingValue::Float(x) => f.write_str(&format_float(*x)),
            SettingValue::Timestamp(dt) => {
                f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            SettingValue::Other(serde_json::Value::String(s)) => f.write_str(s),
            SettingValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for SettingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            SettingValue::Null => serializer.serialize_none(),
            SettingValue::String(s) => serializer.serialize_str(s),
            SettingValue::Bool(b) => serializer.serialize_bool(*b),
            SettingValue::Integer(i) => serializer.serialize_i64(*i),
            SettingValue::Float(x) => serializer.serialize_f64(*x),
            SettingValue::Timestamp(_) => serializer.serialize_str(&self.to_string()),
            SettingValue::Other(v) => v.serialize(serializer),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Integer(i64::from(value))
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        SettingValue::Integer(i64::from(value))
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Float(value)
    }
}

impl From<DateTime<Utc>> for SettingValue {
    fn from(value: DateTime<Utc>) -> Self {
        SettingValue::Timestamp(value)
    }
}

impl From<serde_json::Value> for SettingValue {
    fn from(value: serde_json::Value) -> Self {
        SettingValue::Other(value)
    }
}

impl<T: Into<SettingValue>> From<Option<T>> for SettingValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SettingValue::Null)
    }
}
