#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// A small project exercising both response forms, headers and delays.
pub fn pets_project() -> Value {
    json!({
        "id": "p-1",
        "name": "Pets API",
        "version": "v1",
        "endpoints": [
            {"id": "e1", "method": "get", "path": "/health", "responseBody": {"status": "ok"}},
            {"id": "e2", "method": "GET", "path": "/pets",
             "responses": [{"status": 200, "contentType": "application/json", "body": [{"name": "rex"}]}]},
            {"id": "e3", "method": "post", "path": "/pets", "responseStatus": 201,
             "headers": {"Location": "/pets/1", "X-Delay": "5"}},
            {"id": "e4", "method": "GET", "path": "/text",
             "responses": [{"contentType": "text/plain", "body": "hello"}],
             "headers": {"Content-Type": "application/xml"}}
        ]
    })
}

/// Write a project document into `dir` as `<name>`; YAML when the name ends in `.yaml`.
pub fn write_project(dir: &Path, name: &str, doc: &Value) -> PathBuf {
    let path = dir.join(name);
    let text = if name.ends_with(".yaml") || name.ends_with(".yml") {
        serde_yaml::to_string(doc).unwrap()
    } else {
        serde_json::to_string_pretty(doc).unwrap()
    };
    std::fs::write(&path, text).unwrap();
    path
}

#[cfg(unix)]
pub mod toolchain {
    use mocksmith::build::HostPlatform;
    use mocksmith::config::BuilderConfig;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// A `go` stand-in that answers `version` and fakes `build -o <out> .`.
    ///
    /// The fake executable records the target and isolation variables it saw,
    /// and a copy of the generated main.go lands next to it.
    pub const WORKING_GO: &str = r#"case "$1" in
  version)
    echo "go version go1.22.5 darwin/arm64"
    ;;
  build)
    [ -f main.go ] || { echo "main.go missing" >&2; exit 1; }
    [ -f go.mod ] || { echo "go.mod missing" >&2; exit 1; }
    printf '%s|%s|%s|%s|%s\n' "$GOOS" "$GOARCH" "$CGO_ENABLED" "$GOTOOLCHAIN" "$GOPATH" > "$3"
    cp main.go "$3.main.go"
    ;;
  *)
    echo "unexpected arguments: $*" >&2
    exit 2
    ;;
esac"#;

    /// Host the stub bundle is installed for.
    pub fn mac_arm() -> HostPlatform {
        HostPlatform::new("macos", "aarch64")
    }

    /// Install `body` as `<resources>/go/darwin-arm64/bin/go`.
    pub fn install_go(resources: &Path, body: &str) -> PathBuf {
        let bin = resources.join("go").join("darwin-arm64").join("bin");
        fs::create_dir_all(&bin).unwrap();
        let go = bin.join("go");
        fs::write(&go, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = fs::metadata(&go).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&go, perms).unwrap();
        go
    }

    /// Config rooted entirely inside `root`.
    pub fn config_in(root: &Path, probe_toolchain: bool) -> BuilderConfig {
        BuilderConfig {
            resources_dir: root.join("resources"),
            data_dir: root.join("data"),
            probe_toolchain,
            scratch_dir: Some(root.join("scratch")),
        }
    }

    /// Entries currently in the scratch directory; empty when it does not exist.
    pub fn scratch_entries(root: &Path) -> Vec<PathBuf> {
        match fs::read_dir(root.join("scratch")) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}
