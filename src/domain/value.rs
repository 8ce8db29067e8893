//! Closed value union for loosely typed mapping fields.
//!
//! Several records carry free-form maps (`wallet_address`, `event_data`,
//! catalog `price` blocks). Rather than accepting arbitrary JSON there, values
//! are restricted to a closed union of primitive shapes and validated
//! recursively. This is a deliberate loosening of static typing at the system
//! boundary, not a general escape hatch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::FieldIssue;

/// A value permitted inside a loosely typed mapping field.
///
/// `null` and arrays are not part of the union; payloads carrying them are
/// rejected with a path-qualified issue before a record is ever built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapValue {
    Text(String),
    Number(f64),
    Flag(bool),
    Nested(BTreeMap<String, MapValue>),
}

/// A loosely typed mapping field: string keys, closed-union values.
pub type ValueMap = BTreeMap<String, MapValue>;

impl MapValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MapValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MapValue::Number(number) => Some(*number),
            _ => None,
        }
    }
}

/// Recursively verify that a JSON object holds only closed-union values,
/// appending one issue per offending path.
pub(crate) fn check_map_entries(
    path: &str,
    entries: &serde_json::Map<String, serde_json::Value>,
    issues: &mut Vec<FieldIssue>,
) {
    for (key, value) in entries {
        match value {
            serde_json::Value::String(_)
            | serde_json::Value::Number(_)
            | serde_json::Value::Bool(_) => {}
            serde_json::Value::Object(nested) => {
                check_map_entries(&format!("{path}.{key}"), nested, issues);
            }
            _ => issues.push(FieldIssue::shape(
                format!("{path}.{key}"),
                "expected a string, number, boolean, or nested mapping",
            )),
        }
    }
}
