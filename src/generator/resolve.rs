//! Response resolution.
//!
//! Everything the generated server needs to answer a request is decided here,
//! at synthesis time, so the Go program only has to look values up:
//!
//! | Field          | Source, in order of precedence                                   |
//! |----------------|------------------------------------------------------------------|
//! | `status`       | first `responses[]` entry, else legacy `responseStatus`          |
//! | `content_type` | first entry's `contentType`, else `Content-Type` header, else JSON |
//! | `headers`      | authored headers minus `Content-Type` and `X-Delay`, stringified |
//! | `delay_ms`     | `X-Delay` header when it holds a non-negative number             |
//! | `body`         | first entry's body, else legacy `responseBody`                   |

use crate::spec::{CanonicalEndpoint, RouteGroup, RouteTable};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Content type used when neither the response nor the headers name one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Header that carries the content type.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Header that asks the mock to wait before answering. Never echoed.
pub const DELAY_HEADER: &str = "X-Delay";

/// One endpoint as the generated server serves it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEndpoint {
    pub status: u16,
    pub content_type: String,
    #[serde(serialize_with = "serialize_pairs")]
    pub headers: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// One path of the resolved table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedGroup {
    pub path: String,
    #[serde(serialize_with = "serialize_pairs")]
    pub methods: Vec<(String, ResolvedEndpoint)>,
}

#[allow(clippy::ptr_arg)]
fn serialize_pairs<V, S>(pairs: &Vec<(String, V)>, serializer: S) -> Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    serializer.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}

/// Render a header value as header text.
///
/// Strings are kept verbatim, integral numbers lose any decimal point
/// (`3.0` → `3`), other numbers use the shortest round-trip form, booleans
/// become `true`/`false`, and anything else is written as compact JSON.
pub fn stringify_header_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return n.to_string();
            }
            match n.as_f64() {
                // 2^53: above this not every integer is representable
                Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
                    format!("{}", f as i64)
                }
                _ => n.to_string(),
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Longest delay the generated server can sleep for.
///
/// Go's `time.Duration` is an `int64` count of nanoseconds.
pub const MAX_DELAY_MS: u64 = i64::MAX as u64 / 1_000_000;

/// Interpret an `X-Delay` value as whole milliseconds.
///
/// Numbers and numeric strings are accepted; negative, non-finite,
/// non-numeric or longer than [`MAX_DELAY_MS`] values mean "no delay".
pub fn parse_delay_ms(value: &Value) -> Option<u64> {
    let ms = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !ms.is_finite() || ms < 0.0 {
        return None;
    }
    let whole = ms.trunc();
    if whole > MAX_DELAY_MS as f64 {
        return None;
    }
    Some(whole as u64).filter(|ms| (1..=MAX_DELAY_MS).contains(ms))
}

// Authored header names are matched case-insensitively; the last one wins.
fn find_header<'a>(headers: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    headers
        .iter()
        .rev()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
}

/// Resolve the content type for an endpoint.
pub fn resolve_content_type(endpoint: &CanonicalEndpoint) -> String {
    if let Some(ct) = endpoint.response.served_content_type() {
        return ct.to_string();
    }
    find_header(&endpoint.headers, CONTENT_TYPE_HEADER)
        .map(stringify_header_value)
        .map(|ct| ct.trim().to_string())
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

/// Headers copied verbatim onto every response of the endpoint.
///
/// Names differing only in case are one HTTP header, so a later spelling
/// replaces an earlier one in place.
pub fn passthrough_headers(endpoint: &CanonicalEndpoint) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::with_capacity(endpoint.headers.len());
    for (name, value) in &endpoint.headers {
        if name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER) || name.eq_ignore_ascii_case(DELAY_HEADER)
        {
            continue;
        }
        let entry = (name.clone(), stringify_header_value(value));
        match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(existing) => *existing = entry,
            None => headers.push(entry),
        }
    }
    headers
}

pub fn resolve_endpoint(endpoint: &CanonicalEndpoint) -> ResolvedEndpoint {
    ResolvedEndpoint {
        status: endpoint.response.served_status(),
        content_type: resolve_content_type(endpoint),
        headers: passthrough_headers(endpoint),
        delay_ms: find_header(&endpoint.headers, DELAY_HEADER).and_then(parse_delay_ms),
        body: endpoint.response.served_body().cloned(),
    }
}

pub fn resolve_group(group: &RouteGroup) -> ResolvedGroup {
    ResolvedGroup {
        path: group.path.clone(),
        methods: group
            .methods
            .iter()
            .map(|(method, ep)| (method.clone(), resolve_endpoint(ep)))
            .collect(),
    }
}

pub fn resolve_table(table: &RouteTable) -> Vec<ResolvedGroup> {
    table.groups.iter().map(resolve_group).collect()
}
