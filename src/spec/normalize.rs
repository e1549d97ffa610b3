//! Endpoint normalization.
//!
//! Turns raw, possibly partial endpoint records into [`CanonicalEndpoint`]s.
//! Normalization cannot fail: every missing or malformed optional field is
//! absorbed by a default, because the records come straight from an editor
//! that saves half-filled forms.

use super::types::{
    CanonicalEndpoint, ResponseEntry, ResponsePolicy, DEFAULT_METHOD, DEFAULT_PATH,
    DEFAULT_STATUS,
};
use serde_json::{Map, Value};

/// Normalize every record, keeping input order and duplicates.
pub fn normalize_endpoints(raw: &[Value]) -> Vec<CanonicalEndpoint> {
    raw.iter().map(normalize_endpoint).collect()
}

/// Normalize a single record. Non-object records are treated as `{}`.
pub fn normalize_endpoint(raw: &Value) -> CanonicalEndpoint {
    let empty = Map::new();
    let record = raw.as_object().unwrap_or(&empty);

    CanonicalEndpoint {
        id: record.get("id").and_then(normalize_id),
        method: normalize_method(record.get("method")),
        path: normalize_path(record.get("path")),
        description: record
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        headers: record
            .get("headers")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        response: normalize_response(record),
    }
}

fn normalize_id(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Uppercase, trimmed method; `GET` when absent, blank or not a string.
pub fn normalize_method(method: Option<&Value>) -> String {
    match method.and_then(Value::as_str).map(str::trim) {
        Some(m) if !m.is_empty() => m.to_ascii_uppercase(),
        _ => DEFAULT_METHOD.to_string(),
    }
}

/// Trimmed path; `/` when absent, blank or not a string.
///
/// A path without a leading slash is returned as authored. Refusing it is the
/// route table builder's job, so that the refusal is reported in one place.
pub fn normalize_path(path: Option<&Value>) -> String {
    match path.and_then(Value::as_str).map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => DEFAULT_PATH.to_string(),
    }
}

/// Interpret a status value. Integers and integral numeric strings inside the
/// HTTP range are accepted; everything else is `None`.
pub fn parse_status(value: Option<&Value>) -> Option<u16> {
    let n = match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    (100..=999).contains(&n).then_some(n as u16)
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

fn normalize_response(record: &Map<String, Value>) -> ResponsePolicy {
    if let Some(entries) = record.get("responses").and_then(Value::as_array) {
        if !entries.is_empty() {
            return ResponsePolicy::Modern {
                entries: entries.iter().map(normalize_entry).collect(),
            };
        }
    }

    ResponsePolicy::Legacy {
        status: parse_status(record.get("responseStatus")).unwrap_or(DEFAULT_STATUS),
        body: non_null(record.get("responseBody")),
    }
}

fn normalize_entry(raw: &Value) -> ResponseEntry {
    let empty = Map::new();
    let entry = raw.as_object().unwrap_or(&empty);
    ResponseEntry {
        status: parse_status(entry.get("status")).unwrap_or(DEFAULT_STATUS),
        content_type: entry
            .get("contentType")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .map(String::from),
        desc: entry
            .get("desc")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        body: non_null(entry.get("body")),
    }
}
