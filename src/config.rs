//! # Builder Configuration
//!
//! Where the cross-build invoker finds its bundled toolchain and keeps its
//! private state. Values are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. a TOML file: `--config <path>`, or `mocksmith.toml` in the working directory
//! 3. environment variables
//!
//! ## Environment Variables
//!
//! | Variable                    | Meaning                                      |
//! |-----------------------------|----------------------------------------------|
//! | `MOCKSMITH_RESOURCES_DIR`   | directory holding `go/<os>-<arch>/` bundles  |
//! | `MOCKSMITH_DATA_DIR`        | private data directory (`gopath` lives here) |
//! | `MOCKSMITH_PROBE_TOOLCHAIN` | run `go version` before building (`true`)    |
//! | `MOCKSMITH_SCRATCH_DIR`     | parent of the per-build scratch workspaces   |
//!
//! ## Example
//!
//! ```toml
//! resources_dir = "dist/resources"
//! data_dir = "/var/lib/mocksmith"
//! probe_toolchain = false
//! ```
//!
//! Relative paths in the file are taken relative to the file's directory.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "mocksmith.toml";

/// Application directory name under the per-user data location.
pub const APP_DIR_NAME: &str = "mocksmith";

pub const ENV_RESOURCES_DIR: &str = "MOCKSMITH_RESOURCES_DIR";
pub const ENV_DATA_DIR: &str = "MOCKSMITH_DATA_DIR";
pub const ENV_PROBE_TOOLCHAIN: &str = "MOCKSMITH_PROBE_TOOLCHAIN";
pub const ENV_SCRATCH_DIR: &str = "MOCKSMITH_SCRATCH_DIR";

/// Contents of a config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub resources_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub probe_toolchain: Option<bool>,
    pub scratch_dir: Option<PathBuf>,
}

/// Resolved settings for the cross-build invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Root containing `go/<bundle key>/`
    pub resources_dir: PathBuf,
    /// Private data directory; `GOPATH` is `<data_dir>/gopath`
    pub data_dir: PathBuf,
    /// Run `go version` before every build
    pub probe_toolchain: bool,
    /// Parent for scratch workspaces; the system temp dir when `None`
    pub scratch_dir: Option<PathBuf>,
}

/// Load a config file.
///
/// Returns `Ok(None)` if the file doesn't exist (not an error), and `Err`
/// if it exists but cannot be read or parsed.
pub fn load_config_file(path: &Path) -> anyhow::Result<Option<FileConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let mut config: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;

    if let Some(base) = path.parent() {
        for dir in [
            &mut config.resources_dir,
            &mut config.data_dir,
            &mut config.scratch_dir,
        ]
        .into_iter()
        .flatten()
        {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
    Ok(Some(config))
}

/// Parse a boolean environment value. `None` when it is not recognizable.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Per-user data location for the current OS, with [`APP_DIR_NAME`] appended.
fn default_data_dir(lookup: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
    let base = if cfg!(windows) {
        non_empty("APPDATA")
    } else if cfg!(target_os = "macos") {
        non_empty("HOME").map(|h| h.join("Library").join("Application Support"))
    } else {
        non_empty("XDG_DATA_HOME").or_else(|| non_empty("HOME").map(|h| h.join(".local").join("share")))
    };
    base.unwrap_or_else(env::temp_dir).join(APP_DIR_NAME)
}

/// `resources/` beside the executable when present, else `resources/` in the working directory.
fn default_resources_dir() -> PathBuf {
    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("resources")));
    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("resources"),
    }
}

impl BuilderConfig {
    /// Combine an optional file layer with environment lookups.
    ///
    /// `lookup` stands in for [`std::env::var`] so callers can resolve
    /// against any environment.
    pub fn resolve(file: Option<FileConfig>, lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let env_path = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        let resources_dir = env_path(ENV_RESOURCES_DIR)
            .or(file.resources_dir)
            .unwrap_or_else(default_resources_dir);
        let data_dir = env_path(ENV_DATA_DIR)
            .or(file.data_dir)
            .unwrap_or_else(|| default_data_dir(lookup));
        let scratch_dir = env_path(ENV_SCRATCH_DIR).or(file.scratch_dir);

        let mut probe_toolchain = file.probe_toolchain.unwrap_or(true);
        if let Some(raw) = lookup(ENV_PROBE_TOOLCHAIN) {
            match parse_bool(&raw) {
                Some(flag) => probe_toolchain = flag,
                None => tracing::warn!(
                    variable = ENV_PROBE_TOOLCHAIN,
                    value = %raw,
                    "Ignoring unrecognized boolean"
                ),
            }
        }

        BuilderConfig {
            resources_dir,
            data_dir,
            probe_toolchain,
            scratch_dir,
        }
    }

    /// Load the file layer (explicit path or [`DEFAULT_CONFIG_FILE`]) and the process environment.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let file = match explicit {
            Some(path) => Some(
                load_config_file(path)?
                    .with_context(|| format!("Config file not found: {}", path.display()))?,
            ),
            None => load_config_file(Path::new(DEFAULT_CONFIG_FILE))?,
        };
        let config = Self::resolve(file, &|key| env::var(key).ok());
        tracing::debug!(
            resources_dir = %config.resources_dir.display(),
            data_dir = %config.data_dir.display(),
            probe_toolchain = config.probe_toolchain,
            "Loaded builder config"
        );
        Ok(config)
    }

    /// `GOPATH` handed to the toolchain.
    pub fn gopath(&self) -> PathBuf {
        self.data_dir.join("gopath")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" on "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_defaults() {
        let config = BuilderConfig::resolve(None, &env_of(&[("HOME", "/home/u"), ("APPDATA", "/appdata")]));
        assert!(config.probe_toolchain);
        assert!(config.scratch_dir.is_none());
        assert!(config.resources_dir.ends_with("resources"));
        assert!(config.data_dir.ends_with(APP_DIR_NAME));
        assert_eq!(config.gopath(), config.data_dir.join("gopath"));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = FileConfig {
            resources_dir: Some(PathBuf::from("/file/res")),
            data_dir: Some(PathBuf::from("/file/data")),
            probe_toolchain: Some(true),
            scratch_dir: None,
        };
        let config = BuilderConfig::resolve(
            Some(file),
            &env_of(&[
                (ENV_DATA_DIR, "/env/data"),
                (ENV_PROBE_TOOLCHAIN, "false"),
                (ENV_SCRATCH_DIR, "/env/scratch"),
            ]),
        );
        assert_eq!(config.resources_dir, PathBuf::from("/file/res"));
        assert_eq!(config.data_dir, PathBuf::from("/env/data"));
        assert!(!config.probe_toolchain);
        assert_eq!(config.scratch_dir, Some(PathBuf::from("/env/scratch")));
    }

    #[test]
    fn test_unrecognized_probe_value_keeps_file_setting() {
        let file = FileConfig {
            probe_toolchain: Some(false),
            ..Default::default()
        };
        let config = BuilderConfig::resolve(Some(file), &env_of(&[(ENV_PROBE_TOOLCHAIN, "perhaps")]));
        assert!(!config.probe_toolchain);
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let file = FileConfig {
            data_dir: Some(PathBuf::from("/file/data")),
            ..Default::default()
        };
        let config = BuilderConfig::resolve(Some(file), &env_of(&[(ENV_DATA_DIR, "  ")]));
        assert_eq!(config.data_dir, PathBuf::from("/file/data"));
    }

    #[test]
    fn test_load_config_file_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_file(&dir.path().join("nope.toml")).unwrap().is_none());
    }

    #[test]
    fn test_load_config_file_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mocksmith.toml");
        std::fs::write(
            &path,
            "resources_dir = \"res\"\ndata_dir = \"/abs/data\"\nprobe_toolchain = false\n",
        )
        .unwrap();
        let config = load_config_file(&path).unwrap().unwrap();
        assert_eq!(config.resources_dir, Some(dir.path().join("res")));
        assert_eq!(config.data_dir, Some(PathBuf::from("/abs/data")));
        assert_eq!(config.probe_toolchain, Some(false));
    }

    #[test]
    fn test_load_config_file_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mocksmith.toml");
        std::fs::write(&path, "resource_dir = \"typo\"\n").unwrap();
        let err = load_config_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BuilderConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
