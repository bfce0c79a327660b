// SPDX-License-Identifier: MIT
//
// Boundary value coercion.
//
// Payloads arriving at the bridge are loosely typed (arbitrary JSON-shaped
// key/value maps). Before forwarding to an SDK instance every value is
// coerced into one of the supported shapes below. Coercion is total: no
// key is ever dropped and no shape ever aborts the enclosing call —
// unsupported shapes fall back to their string rendering.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{profile, PropMap, ProfileRecord};

/// A coerced boundary value, ready to hand to an SDK instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropValue {
    Str(String),
    /// All numeric input is widened to floating point, matching the
    /// dynamically-typed boundary where integers and floats share one tag.
    Num(f64),
    Bool(bool),
    /// Only produced by the DOB profile special case.
    Date(NaiveDateTime),
    /// Ordered list of coerced primitives. Unsupported element shapes
    /// (nested lists, objects, null) are skipped, not stringified.
    List(Vec<PropValue>),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Coerce one boundary value into a [`PropValue`].
///
/// String, number, and boolean pass through. Arrays keep their order and
/// recursively coerce primitive elements. Everything else (objects, null)
/// becomes its JSON text so the key survives with a best-effort value.
pub fn coerce_value(value: &Value) -> PropValue {
    match value {
        Value::String(s) => PropValue::Str(s.clone()),
        Value::Number(n) => PropValue::Num(n.as_f64().unwrap_or(0.0)),
        Value::Bool(b) => PropValue::Bool(*b),
        Value::Array(items) => {
            PropValue::List(items.iter().filter_map(coerce_list_element).collect())
        }
        other => PropValue::Str(other.to_string()),
    }
}

/// Elements inside a list only admit the three primitive cases.
fn coerce_list_element(value: &Value) -> Option<PropValue> {
    match value {
        Value::String(s) => Some(PropValue::Str(s.clone())),
        Value::Number(n) => Some(PropValue::Num(n.as_f64().unwrap_or(0.0))),
        Value::Bool(b) => Some(PropValue::Bool(*b)),
        _ => None,
    }
}

/// Coerce an event property map key by key.
pub fn coerce_props(props: &Map<String, Value>) -> PropMap {
    props
        .iter()
        .map(|(k, v)| (k.clone(), coerce_value(v)))
        .collect()
}

/// Coerce a profile map, applying the DOB special case: a string-valued
/// `DOB` field is parsed into a date; on parse failure the raw string is
/// forwarded unchanged.
pub fn coerce_profile(fields: &Map<String, Value>) -> ProfileRecord {
    let fields: HashMap<String, PropValue> = fields
        .iter()
        .map(|(k, v)| {
            let coerced = match (k.as_str(), v) {
                (profile::DOB, Value::String(s)) => match parse_dob(s) {
                    Some(date) => PropValue::Date(date),
                    None => PropValue::Str(s.clone()),
                },
                _ => coerce_value(v),
            };
            (k.clone(), coerced)
        })
        .collect();
    ProfileRecord { fields }
}

/// Parse a date-of-birth string.
///
/// Accepts the vendor's timestamp shape (`1992-12-22T06:35:31`), RFC 3339,
/// and a bare date (taken as midnight).
pub fn parse_dob(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}
