use super::error::BuildError;
use super::platform::{BuildTarget, HostPlatform, TargetRequest};
use super::process::{go_build_args, run_tool, tool_args, ProcessOutcome};
use super::toolchain::Toolchain;
use crate::config::BuilderConfig;
use crate::generator::{synthesize_project, DEFAULT_PORT};
use crate::spec::Project;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Prefix of the per-build scratch workspace directories.
pub const WORKSPACE_PREFIX: &str = "mockbuild-";

/// Where the last successful build went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastBuild {
    pub path: PathBuf,
    pub port: u16,
}

/// State shared between the editing side and the builder.
///
/// Passed explicitly into every build; the builder updates `last_build`.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub project: Project,
    pub last_build: Option<LastBuild>,
}

impl Session {
    pub fn new(project: Project) -> Self {
        Session {
            project,
            last_build: None,
        }
    }
}

/// Result of one build request, shaped for the caller that started it.
///
/// Serializes to `{"ok":true,"path":...,"port":...}` or `{"ok":false,"err":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    #[serde(skip)]
    pub error: Option<BuildError>,
}

impl BuildReport {
    pub fn succeeded(path: PathBuf, port: u16) -> Self {
        BuildReport {
            ok: true,
            path: Some(path),
            port: Some(port),
            err: None,
            error: None,
        }
    }

    pub fn failed(error: BuildError) -> Self {
        BuildReport {
            ok: false,
            path: None,
            port: None,
            err: Some(error.to_string()),
            error: Some(error),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.error, Some(BuildError::Cancelled))
    }
}

/// Asks the user where the executable should go.
///
/// `None` means the user cancelled.
pub trait DestinationPrompt: Send + Sync {
    fn choose_destination(&self, default_name: &str) -> Option<PathBuf>;
}

/// Always answers with the same path.
#[derive(Debug, Clone)]
pub struct FixedDestination(pub PathBuf);

impl DestinationPrompt for FixedDestination {
    fn choose_destination(&self, _default_name: &str) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

impl<F> DestinationPrompt for F
where
    F: Fn(&str) -> Option<PathBuf> + Send + Sync,
{
    fn choose_destination(&self, default_name: &str) -> Option<PathBuf> {
        self(default_name)
    }
}

/// Compiles a session's project into a native executable with the bundled toolchain.
#[derive(Debug, Clone)]
pub struct CrossBuilder {
    config: BuilderConfig,
    host: HostPlatform,
}

impl CrossBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self::with_host(config, HostPlatform::current())
    }

    /// Builder that believes it runs on `host`.
    pub fn with_host(config: BuilderConfig, host: HostPlatform) -> Self {
        CrossBuilder { config, host }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Run one build. Never fails: every error is folded into the report.
    pub async fn build(
        &self,
        session: &mut Session,
        request: TargetRequest,
        prompt: &dyn DestinationPrompt,
    ) -> BuildReport {
        match self.try_build(&session.project, request, prompt).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), port = DEFAULT_PORT, "Build finished");
                session.last_build = Some(LastBuild {
                    path: path.clone(),
                    port: DEFAULT_PORT,
                });
                BuildReport::succeeded(path, DEFAULT_PORT)
            }
            Err(BuildError::Cancelled) => {
                tracing::info!("Build cancelled");
                BuildReport::failed(BuildError::Cancelled)
            }
            Err(err) => {
                tracing::error!(error = %err, "Build failed");
                BuildReport::failed(err)
            }
        }
    }

    async fn try_build(
        &self,
        project: &Project,
        request: TargetRequest,
        prompt: &dyn DestinationPrompt,
    ) -> Result<PathBuf, BuildError> {
        let host = self.host.supported()?;

        let target_os = request.os.unwrap_or(host.os);
        let default_name = format!("{}{}", project.slug(), target_os.exe_suffix());
        let output = prompt
            .choose_destination(&default_name)
            .ok_or(BuildError::Cancelled)?;
        let output = std::path::absolute(&output).map_err(|err| BuildError::Workspace {
            detail: format!("invalid output path {}: {err}", output.display()),
        })?;
        let target = BuildTarget::new(request, &host, output);

        let toolchain = Toolchain::locate(&self.config.resources_dir, &host)?;
        toolchain.ensure_executable();
        let env = toolchain.environment(&target, &self.config.data_dir);

        if self.config.probe_toolchain {
            probe(&toolchain, &env).await?;
        }

        let workspace = self.create_workspace()?;
        let work_dir = workspace.path();

        let (table, program) = synthesize_project(project).map_err(|err| BuildError::Synthesis {
            detail: format!("{err:#}"),
        })?;
        program
            .write_to(work_dir, false)
            .map_err(|err| BuildError::Workspace {
                detail: format!("{err:#}"),
            })?;

        tracing::info!(
            project = project.display_name(),
            routes = table.route_count(),
            os = %target.os,
            arch = %target.arch,
            output = %target.output_path.display(),
            "Cross-building mock server"
        );

        match run_tool(
            toolchain.go_binary(),
            &go_build_args(&target.output_path),
            work_dir,
            &env,
        )
        .await
        {
            ProcessOutcome::Succeeded { .. } => {}
            ProcessOutcome::Exited { code, stderr } => {
                return Err(BuildError::BuildFailed { code, stderr })
            }
            ProcessOutcome::LaunchFailed { error } => {
                return Err(BuildError::LaunchFailed {
                    program: toolchain.go_binary().to_path_buf(),
                    detail: error,
                })
            }
        }

        if !target.output_path.is_file() {
            return Err(BuildError::BuildFailed {
                code: Some(0),
                stderr: format!(
                    "toolchain reported success but {} was not produced",
                    target.output_path.display()
                ),
            });
        }
        mark_executable(&target.output_path);
        Ok(target.output_path)
    }

    fn create_workspace(&self) -> Result<tempfile::TempDir, BuildError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let created = match &self.config.scratch_dir {
            Some(dir) => std::fs::create_dir_all(dir).and_then(|()| builder.tempdir_in(dir)),
            None => builder.tempdir(),
        };
        let workspace = created.map_err(|err| BuildError::Workspace {
            detail: err.to_string(),
        })?;
        tracing::debug!(workspace = %workspace.path().display(), "Created scratch workspace");
        Ok(workspace)
    }
}

async fn probe(toolchain: &Toolchain, env: &[(String, OsString)]) -> Result<(), BuildError> {
    match run_tool(toolchain.go_binary(), &tool_args(["version"]), toolchain.root(), env).await {
        ProcessOutcome::Succeeded { stdout } => {
            tracing::debug!(version = stdout.trim(), "Toolchain probe");
            Ok(())
        }
        ProcessOutcome::Exited { code, stderr } => Err(BuildError::ToolchainProbe {
            detail: BuildError::BuildFailed { code, stderr }.to_string(),
        }),
        ProcessOutcome::LaunchFailed { error } => Err(BuildError::ToolchainProbe { detail: error }),
    }
}

fn mark_executable(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let result = std::fs::metadata(path).and_then(|meta| {
            let mut perms = meta.permissions();
            perms.set_mode(perms.mode() | 0o755);
            std::fs::set_permissions(path, perms)
        });
        if let Err(err) = result {
            tracing::warn!(path = %path.display(), error = %err, "Could not mark output executable");
        }
    }
    #[cfg(not(unix))]
    let _ = path;
}
