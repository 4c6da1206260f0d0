//! Typed values and their tagged string encoding.
//!
//! Values are persisted as `<tag>:<body>` where the tag is `n` (number),
//! `s` (string) or `b` (boolean). The first two characters of a stored value
//! decide how the rest is read.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, StoreError};

const NUMBER_TAG: &str = "n:";
const STRING_TAG: &str = "s:";
const BOOLEAN_TAG: &str = "b:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    Number(f64),
    String(String),
    Boolean(bool),
}

impl TypedValue {
    /// Encode into the tagged wire form.
    pub fn encode(&self) -> String {
        match self {
            TypedValue::Number(n) => format!("{NUMBER_TAG}{n}"),
            TypedValue::String(s) => format!("{STRING_TAG}{s}"),
            TypedValue::Boolean(b) => format!("{BOOLEAN_TAG}{}", if *b { "1" } else { "0" }),
        }
    }

    /// Decode a raw stored value. An empty raw value means "nothing stored".
    pub fn decode(raw: &str) -> Result<Option<Self>> {
        if raw.is_empty() {
            return Ok(None);
        }
        let (head, body) = match (raw.get(..2), raw.get(2..)) {
            (Some(head), Some(body)) => (head, body),
            _ => return Err(StoreError::decode(raw)),
        };

        let value = match head {
            NUMBER_TAG => body
                .trim()
                .parse::<f64>()
                .map(TypedValue::Number)
                .map_err(|_| StoreError::decode(raw))?,
            STRING_TAG => TypedValue::String(body.to_string()),
            BOOLEAN_TAG => match body {
                "1" => TypedValue::Boolean(true),
                "0" => TypedValue::Boolean(false),
                _ => return Err(StoreError::decode(raw)),
            },
            _ => return Err(StoreError::decode(raw)),
        };
        Ok(Some(value))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TypedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Number(_) => "number",
            TypedValue::String(_) => "string",
            TypedValue::Boolean(_) => "boolean",
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Number(n) => write!(f, "{n}"),
            TypedValue::String(s) => f.write_str(s),
            TypedValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self { TypedValue::Number(v) }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self { TypedValue::Number(v as f64) }
}

impl From<i32> for TypedValue {
    fn from(v: i32) -> Self { TypedValue::Number(f64::from(v)) }
}

impl From<bool> for TypedValue {
    fn from(v: bool) -> Self { TypedValue::Boolean(v) }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self { TypedValue::String(v) }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self { TypedValue::String(v.to_string()) }
}

/// Dynamic values coming from scripts or JSON payloads. Composite values are
/// rejected; `null` has no typed form and is handled by callers as "unset".
impl TryFrom<serde_json::Value> for TypedValue {
    type Error = StoreError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        use serde_json::Value;
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(TypedValue::Number)
                .ok_or(StoreError::Encode { kind: "number" }),
            Value::String(s) => Ok(TypedValue::String(s)),
            Value::Bool(b) => Ok(TypedValue::Boolean(b)),
            Value::Null => Err(StoreError::Encode { kind: "null" }),
            Value::Array(_) => Err(StoreError::Encode { kind: "array" }),
            Value::Object(_) => Err(StoreError::Encode { kind: "object" }),
        }
    }
}
