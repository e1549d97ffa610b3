use super::types::Project;
use anyhow::Context;
use serde_json::Value;
use std::path::Path;

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Parse a project document from text. YAML when `yaml` is set, JSON otherwise.
pub fn parse_project(content: &str, yaml: bool) -> anyhow::Result<Project> {
    let value: Value = if yaml {
        serde_yaml::from_str(content).context("Project document is not valid YAML")?
    } else {
        serde_json::from_str(content).context("Project document is not valid JSON")?
    };
    if !value.is_object() {
        anyhow::bail!("Project document must be an object with an `endpoints` list");
    }
    let project: Project =
        serde_json::from_value(value).context("Project document has an unexpected shape")?;
    Ok(project)
}

/// Load a project document from a `.json`, `.yaml` or `.yml` file.
pub fn load_project(path: &Path) -> anyhow::Result<Project> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project document {}", path.display()))?;
    let project = parse_project(&content, is_yaml(path))
        .with_context(|| format!("Failed to load project document {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        endpoints = project.endpoints.len(),
        "Loaded project document"
    );
    Ok(project)
}
