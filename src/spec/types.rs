use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Method assigned to records that do not name one.
pub const DEFAULT_METHOD: &str = "GET";

/// Path assigned to records that do not name one.
pub const DEFAULT_PATH: &str = "/";

/// Status served when an authored status is missing or unusable.
pub const DEFAULT_STATUS: u16 = 200;

/// Project name used when the document does not carry one.
pub const DEFAULT_PROJECT_NAME: &str = "mock-server";

/// The authored project document as persisted by the editor.
///
/// Endpoint records are deliberately kept untyped: the normalizer is the only
/// place that interprets them, and it must cope with partially filled records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default = "default_project_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<Value>,
}

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

impl Project {
    /// Create a project from a display name and raw endpoint records.
    pub fn new(name: impl Into<String>, endpoints: Vec<Value>) -> Self {
        Project {
            name: name.into(),
            endpoints,
            ..Default::default()
        }
    }

    /// Display name, falling back to [`DEFAULT_PROJECT_NAME`] when blank.
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            DEFAULT_PROJECT_NAME
        } else {
            trimmed
        }
    }

    /// File-system friendly form of the project name.
    ///
    /// Used as the default executable name offered to the user.
    pub fn slug(&self) -> String {
        let slug = self
            .display_name()
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        if slug.is_empty() {
            DEFAULT_PROJECT_NAME.to_string()
        } else {
            slug
        }
    }
}

/// One authored response in the modern `responses[]` form.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEntry {
    pub status: u16,
    pub content_type: Option<String>,
    pub desc: String,
    pub body: Option<Value>,
}

/// How an endpoint produces its response.
///
/// Decided once during normalization so later stages never inspect the raw
/// record shape again.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePolicy {
    /// Single `responseStatus` / `responseBody` pair.
    Legacy { status: u16, body: Option<Value> },
    /// Non-empty `responses[]`; the first entry is the one served.
    Modern { entries: Vec<ResponseEntry> },
}

impl ResponsePolicy {
    /// Status code the generated server writes.
    pub fn served_status(&self) -> u16 {
        match self {
            ResponsePolicy::Legacy { status, .. } => *status,
            ResponsePolicy::Modern { entries } => entries
                .first()
                .map(|e| e.status)
                .unwrap_or(DEFAULT_STATUS),
        }
    }

    /// Body the generated server writes, if any.
    pub fn served_body(&self) -> Option<&Value> {
        match self {
            ResponsePolicy::Legacy { body, .. } => body.as_ref(),
            ResponsePolicy::Modern { entries } => entries.first().and_then(|e| e.body.as_ref()),
        }
    }

    /// Explicit content type of the served modern entry.
    pub fn served_content_type(&self) -> Option<&str> {
        match self {
            ResponsePolicy::Legacy { .. } => None,
            ResponsePolicy::Modern { entries } => {
                entries.first().and_then(|e| e.content_type.as_deref())
            }
        }
    }
}

/// An endpoint record after defaulting and canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalEndpoint {
    /// Author-assigned identifier, only used to correlate with the editor.
    pub id: Option<String>,
    /// Uppercase HTTP method.
    pub method: String,
    pub path: String,
    pub description: String,
    /// Authored headers in authored order, values untouched.
    pub headers: Map<String, Value>,
    pub response: ResponsePolicy,
}

/// All methods registered under one path.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGroup {
    pub path: String,
    /// Method → endpoint; at most one entry per method.
    pub methods: Vec<(String, CanonicalEndpoint)>,
}

impl RouteGroup {
    pub fn new(path: impl Into<String>) -> Self {
        RouteGroup {
            path: path.into(),
            methods: Vec::new(),
        }
    }

    /// Endpoint registered for `method`, if any.
    pub fn get(&self, method: &str) -> Option<&CanonicalEndpoint> {
        self.methods
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, ep)| ep)
    }

    /// Insert or wholly replace the endpoint for its method.
    ///
    /// Returns the endpoint that was replaced.
    pub fn upsert(&mut self, endpoint: CanonicalEndpoint) -> Option<CanonicalEndpoint> {
        if let Some(slot) = self
            .methods
            .iter_mut()
            .find(|(m, _)| *m == endpoint.method)
        {
            return Some(std::mem::replace(&mut slot.1, endpoint));
        }
        self.methods.push((endpoint.method.clone(), endpoint));
        None
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|(m, _)| m.as_str())
    }
}

/// An endpoint refused before it reached any route group.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEndpoint {
    pub id: Option<String>,
    pub method: String,
    pub path: String,
    pub reason: String,
}

/// The compiled routing table, one group per distinct path in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteTable {
    pub groups: Vec<RouteGroup>,
    pub rejected: Vec<RejectedEndpoint>,
}

impl RouteTable {
    pub fn group(&self, path: &str) -> Option<&RouteGroup> {
        self.groups.iter().find(|g| g.path == path)
    }

    /// Endpoint served for `method` at `path`.
    pub fn lookup(&self, method: &str, path: &str) -> Option<&CanonicalEndpoint> {
        self.group(path).and_then(|g| g.get(method))
    }

    /// Number of servable (method, path) pairs.
    pub fn route_count(&self) -> usize {
        self.groups.iter().map(|g| g.methods.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
