use askama::Template;
use std::fs;
use std::path::Path;

/// Module path declared by the generated `go.mod`.
pub const GO_MODULE: &str = "local/generated";

/// Minimum toolchain version declared by the generated `go.mod`.
pub const GO_VERSION: &str = "1.22";

/// Port the generated server listens on when neither `--port` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 8080;

/// Value of `Access-Control-Allow-Methods` on every CORS-enabled response.
pub const CORS_ALLOW_METHODS: &str = "GET,POST,PUT,PATCH,DELETE,OPTIONS";

/// Route listed in the header comment of the generated program
#[derive(Debug, Clone)]
pub struct RouteComment {
    /// HTTP method, quoted if it is not plain printable ASCII
    pub method: String,
    /// Path as a Go string literal
    pub path_literal: String,
}

/// Template data for generating main.go
#[derive(Template)]
#[template(path = "main.go.txt", escape = "none")]
pub struct MainGoTemplateData {
    /// Project name as a Go string literal
    pub project_literal: String,
    /// Routes for the header comment
    pub routes: Vec<RouteComment>,
    pub default_port: u16,
    /// CORS method list as a Go string literal
    pub cors_methods_literal: String,
    /// Serialized route table as a Go string literal
    pub table_literal: String,
}

/// Template data for generating go.mod
#[derive(Template)]
#[template(path = "go.mod.txt", escape = "none")]
pub struct GoModTemplateData {
    pub module: String,
    pub go_version: String,
}

fn with_trailing_newline(mut rendered: String) -> String {
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}

/// Render the main.go source.
///
/// # Errors
///
/// Returns an error if template rendering fails
pub fn render_main_go(data: &MainGoTemplateData) -> anyhow::Result<String> {
    Ok(with_trailing_newline(data.render()?))
}

/// Render the go.mod manifest for [`GO_MODULE`] / [`GO_VERSION`].
///
/// # Errors
///
/// Returns an error if template rendering fails
pub fn render_go_mod() -> anyhow::Result<String> {
    let rendered = GoModTemplateData {
        module: GO_MODULE.to_string(),
        go_version: GO_VERSION.to_string(),
    }
    .render()?;
    Ok(with_trailing_newline(rendered))
}

/// Write a rendered file, refusing to clobber an existing one unless `force` is set.
///
/// # Errors
///
/// Returns an error if the file exists without `force`, or if writing fails
pub fn write_rendered(path: &Path, contents: &str, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    fs::write(path, contents)?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote generated file");
    Ok(())
}
