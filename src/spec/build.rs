use super::normalize::normalize_endpoints;
use super::types::{CanonicalEndpoint, RejectedEndpoint, RouteGroup, RouteTable};
use serde_json::Value;
use tracing::{debug, warn};

/// Why a path cannot be registered, or `None` when it can.
pub fn path_rejection(path: &str) -> Option<&'static str> {
    if !path.starts_with('/') {
        Some("path must begin with '/'")
    } else {
        None
    }
}

/// Build the routing table from canonical endpoints.
///
/// Endpoints are applied in order. A later endpoint with the same
/// (method, path) wholly replaces the earlier one; endpoints with different
/// methods on the same path share a group. Groups keep first-seen path order,
/// which keeps the generated program byte-for-byte reproducible.
pub fn build_route_table(endpoints: Vec<CanonicalEndpoint>) -> RouteTable {
    let mut table = RouteTable::default();

    for endpoint in endpoints {
        if let Some(reason) = path_rejection(&endpoint.path) {
            warn!(
                method = %endpoint.method,
                path = %endpoint.path,
                reason,
                "Refusing endpoint"
            );
            table.rejected.push(RejectedEndpoint {
                id: endpoint.id.clone(),
                method: endpoint.method.clone(),
                path: endpoint.path.clone(),
                reason: reason.to_string(),
            });
            continue;
        }

        let index = match table.groups.iter().position(|g| g.path == endpoint.path) {
            Some(index) => index,
            None => {
                table.groups.push(RouteGroup::new(endpoint.path.clone()));
                table.groups.len() - 1
            }
        };
        let method = endpoint.method.clone();
        let path = endpoint.path.clone();
        if table.groups[index].upsert(endpoint).is_some() {
            debug!(%method, %path, "Later definition replaces earlier one");
        }
    }

    table
}

/// Normalize raw endpoint records and build the routing table in one step.
pub fn compile_route_table(raw: &[Value]) -> RouteTable {
    build_route_table(normalize_endpoints(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_last_write_wins_for_same_method_and_path() {
        let table = compile_route_table(&[
            json!({"method": "GET", "path": "/a", "responseBody": "x"}),
            json!({"method": "get", "path": "/a", "responseBody": "y"}),
        ]);
        assert_eq!(table.groups.len(), 1);
        assert_eq!(table.route_count(), 1);
        let ep = table.lookup("GET", "/a").expect("GET /a");
        assert_eq!(ep.response.served_body(), Some(&json!("y")));
    }

    #[test]
    fn test_methods_coexist_on_one_path() {
        let table = compile_route_table(&[
            json!({"method": "GET", "path": "/a"}),
            json!({"method": "POST", "path": "/a"}),
        ]);
        assert_eq!(table.groups.len(), 1);
        let methods: Vec<_> = table.groups[0].method_names().collect();
        assert_eq!(methods, vec!["GET", "POST"]);
    }

    #[test]
    fn test_replacement_is_per_method() {
        let table = compile_route_table(&[
            json!({"method": "GET", "path": "/a", "responseBody": 1}),
            json!({"method": "POST", "path": "/a", "responseBody": 2}),
            json!({"method": "GET", "path": "/a", "responseBody": 3}),
        ]);
        assert_eq!(
            table.lookup("GET", "/a").and_then(|e| e.response.served_body()),
            Some(&json!(3))
        );
        assert_eq!(
            table.lookup("POST", "/a").and_then(|e| e.response.served_body()),
            Some(&json!(2))
        );
    }

    #[test]
    fn test_replacement_is_whole_record() {
        let table = compile_route_table(&[
            json!({"path": "/a", "headers": {"X-Old": "1"}, "description": "old"}),
            json!({"path": "/a"}),
        ]);
        let ep = table.lookup("GET", "/a").expect("GET /a");
        assert!(ep.headers.is_empty());
        assert_eq!(ep.description, "");
    }

    #[test]
    fn test_first_seen_path_order() {
        let table = compile_route_table(&[
            json!({"path": "/z"}),
            json!({"path": "/a"}),
            json!({"path": "/z", "method": "DELETE"}),
            json!({"path": "/m"}),
        ]);
        let paths: Vec<_> = table.groups.iter().map(|g| g.path.as_str()).collect();
        assert_eq!(paths, vec!["/z", "/a", "/m"]);
    }

    #[test]
    fn test_relative_path_is_rejected() {
        let table = compile_route_table(&[
            json!({"id": "bad", "path": "users"}),
            json!({"path": "/users"}),
        ]);
        assert_eq!(table.groups.len(), 1);
        assert!(table.group("users").is_none());
        assert_eq!(table.rejected.len(), 1);
        assert_eq!(table.rejected[0].id.as_deref(), Some("bad"));
        assert_eq!(table.rejected[0].path, "users");
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let table = compile_route_table(&[]);
        assert!(table.is_empty());
        assert!(table.rejected.is_empty());
    }
}
