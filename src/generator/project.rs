use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::generator::literal::go_string_literal;
use crate::generator::resolve::resolve_table;
use crate::generator::templates::{
    render_go_mod, render_main_go, write_rendered, MainGoTemplateData, RouteComment,
    CORS_ALLOW_METHODS, DEFAULT_PORT,
};
use crate::spec::{Project, RouteTable, DEFAULT_PROJECT_NAME};

/// File name of the generated server source.
pub const MAIN_GO: &str = "main.go";

/// File name of the generated module manifest.
pub const GO_MOD: &str = "go.mod";

/// A synthesized Go program, ready to be written into a module directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProgram {
    pub main_go: String,
    pub go_mod: String,
}

impl GeneratedProgram {
    /// Write `main.go` and `go.mod` into `dir`, creating it if needed.
    ///
    /// Existing files are only replaced when `force` is set. Returns the
    /// written paths in the order main.go, go.mod.
    pub fn write_to(&self, dir: &Path, force: bool) -> anyhow::Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        let main_path = dir.join(MAIN_GO);
        let mod_path = dir.join(GO_MOD);
        write_rendered(&main_path, &self.main_go, force)
            .with_context(|| format!("Failed to write {}", main_path.display()))?;
        write_rendered(&mod_path, &self.go_mod, force)
            .with_context(|| format!("Failed to write {}", mod_path.display()))?;
        Ok(vec![main_path, mod_path])
    }
}

fn comment_method(method: &str) -> String {
    if !method.is_empty() && method.chars().all(|c| c.is_ascii_graphic()) {
        method.to_string()
    } else {
        go_string_literal(method)
    }
}

fn route_comments(table: &RouteTable) -> Vec<RouteComment> {
    table
        .groups
        .iter()
        .flat_map(|group| {
            group.method_names().map(move |method| RouteComment {
                method: comment_method(method),
                path_literal: go_string_literal(&group.path),
            })
        })
        .collect()
}

/// Generate the Go mock server for a compiled route table.
///
/// The output depends only on `table` and `project_name`: identical inputs
/// give byte-identical sources.
pub fn synthesize(table: &RouteTable, project_name: &str) -> anyhow::Result<GeneratedProgram> {
    let name = match project_name.trim() {
        "" => DEFAULT_PROJECT_NAME,
        trimmed => trimmed,
    };
    let resolved = resolve_table(table);
    let table_json =
        serde_json::to_string(&resolved).context("Failed to serialize route table")?;

    let data = MainGoTemplateData {
        project_literal: go_string_literal(name),
        routes: route_comments(table),
        default_port: DEFAULT_PORT,
        cors_methods_literal: go_string_literal(CORS_ALLOW_METHODS),
        table_literal: go_string_literal(&table_json),
    };
    let main_go = render_main_go(&data).context("Failed to render main.go")?;
    let go_mod = render_go_mod().context("Failed to render go.mod")?;

    tracing::debug!(
        project = name,
        groups = table.groups.len(),
        routes = table.route_count(),
        bytes = main_go.len(),
        "Synthesized server program"
    );
    Ok(GeneratedProgram { main_go, go_mod })
}

/// Normalize, route and synthesize a whole project document.
pub fn synthesize_project(project: &Project) -> anyhow::Result<(RouteTable, GeneratedProgram)> {
    let table = crate::spec::compile_route_table(&project.endpoints);
    let program = synthesize(&table, project.display_name())?;
    Ok((table, program))
}
