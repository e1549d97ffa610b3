use super::error::BuildError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Operating system a binary is built for (`GOOS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Windows,
    Darwin,
    Linux,
}

impl TargetOs {
    pub fn goos(self) -> &'static str {
        match self {
            TargetOs::Windows => "windows",
            TargetOs::Darwin => "darwin",
            TargetOs::Linux => "linux",
        }
    }

    /// File suffix of executables for this OS.
    pub fn exe_suffix(self) -> &'static str {
        match self {
            TargetOs::Windows => ".exe",
            TargetOs::Darwin | TargetOs::Linux => "",
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.goos())
    }
}

/// CPU architecture a binary is built for (`GOARCH`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetArch {
    Amd64,
    Arm64,
}

impl TargetArch {
    pub fn goarch(self) -> &'static str {
        match self {
            TargetArch::Amd64 => "amd64",
            TargetArch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.goarch())
    }
}

/// The machine the builder runs on, as reported by the Rust runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    /// `std::env::consts::OS` spelling, e.g. `macos`
    pub os: String,
    /// `std::env::consts::ARCH` spelling, e.g. `aarch64`
    pub arch: String,
}

/// A host for which a toolchain bundle exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedHost {
    pub os: TargetOs,
    pub arch: TargetArch,
}

impl HostPlatform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        HostPlatform {
            os: os.into(),
            arch: arch.into(),
        }
    }

    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map the host onto a bundled toolchain, or refuse it.
    ///
    /// Only Windows and macOS hosts on x86_64/aarch64 ship with a toolchain.
    pub fn supported(&self) -> Result<SupportedHost, BuildError> {
        let os = match self.os.as_str() {
            "windows" => Some(TargetOs::Windows),
            "macos" => Some(TargetOs::Darwin),
            _ => None,
        };
        let arch = match self.arch.as_str() {
            "x86_64" => Some(TargetArch::Amd64),
            "aarch64" => Some(TargetArch::Arm64),
            _ => None,
        };
        match (os, arch) {
            (Some(os), Some(arch)) => Ok(SupportedHost { os, arch }),
            _ => Err(BuildError::UnsupportedPlatform {
                os: self.os.clone(),
                arch: self.arch.clone(),
            }),
        }
    }
}

impl SupportedHost {
    /// Directory name of the host's toolchain bundle, e.g. `darwin-arm64`.
    pub fn bundle_key(&self) -> String {
        format!("{}-{}", self.os.goos(), self.arch.goarch())
    }
}

/// Target OS/arch requested by the caller. Unset fields default to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetRequest {
    pub os: Option<TargetOs>,
    pub arch: Option<TargetArch>,
}

/// A fully decided build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub os: TargetOs,
    pub arch: TargetArch,
    pub output_path: PathBuf,
}

impl BuildTarget {
    pub fn new(request: TargetRequest, host: &SupportedHost, output_path: PathBuf) -> Self {
        BuildTarget {
            os: request.os.unwrap_or(host.os),
            arch: request.arch.unwrap_or(host.arch),
            output_path,
        }
    }
}
