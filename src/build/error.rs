use std::fmt;
use std::path::PathBuf;

/// Failure of a cross-build.
///
/// Every variant ends up as the `err` text of a failed
/// [`BuildReport`](super::BuildReport); the variants keep the causes apart
/// for callers and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No toolchain is bundled for the machine we are running on
    UnsupportedPlatform {
        /// `std::env::consts::OS` of the host
        os: String,
        /// `std::env::consts::ARCH` of the host
        arch: String,
    },
    /// The bundled `go` binary is not where it should be
    ToolchainMissing {
        /// Absolute path that was checked
        expected: PathBuf,
    },
    /// `go version` did not succeed
    ToolchainProbe { detail: String },
    /// The configuration or project document could not be loaded
    Setup { detail: String },
    /// The user declined to pick an output location
    Cancelled,
    /// The scratch workspace could not be prepared
    Workspace { detail: String },
    /// The server program could not be generated
    Synthesis { detail: String },
    /// The toolchain process could not be started
    LaunchFailed { program: PathBuf, detail: String },
    /// The toolchain ran and exited unsuccessfully
    BuildFailed {
        /// Exit code; `None` when the process was killed by a signal
        code: Option<i32>,
        stderr: String,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::UnsupportedPlatform { os, arch } => {
                write!(
                    f,
                    "unsupported platform: {os}/{arch} (bundled toolchains cover windows and macOS on amd64/arm64)"
                )
            }
            BuildError::ToolchainMissing { expected } => {
                write!(
                    f,
                    "bundled Go toolchain not found; looked for {}",
                    expected.display()
                )
            }
            BuildError::ToolchainProbe { detail } => {
                write!(f, "bundled Go toolchain is not usable: {detail}")
            }
            BuildError::Setup { detail } => write!(f, "{detail}"),
            BuildError::Cancelled => write!(f, "build cancelled by user"),
            BuildError::Workspace { detail } => {
                write!(f, "failed to prepare build workspace: {detail}")
            }
            BuildError::Synthesis { detail } => {
                write!(f, "failed to generate server program: {detail}")
            }
            BuildError::LaunchFailed { program, detail } => {
                write!(f, "failed to start {}: {detail}", program.display())
            }
            BuildError::BuildFailed { code, stderr } => {
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, "{stderr}")
                } else {
                    match code {
                        Some(code) => write!(f, "go exit {code}"),
                        None => write!(f, "go exit (terminated by signal)"),
                    }
                }
            }
        }
    }
}

impl std::error::Error for BuildError {}
