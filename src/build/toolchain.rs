use super::error::BuildError;
use super::platform::{BuildTarget, SupportedHost};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A bundled Go toolchain for the current host.
///
/// Bundles live at `<resources>/go/<bundle key>/` with the `go` command in
/// `bin/`. The toolchain on `PATH` is never used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    root: PathBuf,
    go: PathBuf,
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

impl Toolchain {
    /// Expected `GOROOT` of the host's bundle.
    pub fn bundle_root(resources_dir: &Path, host: &SupportedHost) -> PathBuf {
        absolute(&resources_dir.join("go").join(host.bundle_key()))
    }

    /// Find the host's bundled toolchain under `resources_dir`.
    pub fn locate(resources_dir: &Path, host: &SupportedHost) -> Result<Self, BuildError> {
        let root = Self::bundle_root(resources_dir, host);
        let go = root
            .join("bin")
            .join(format!("go{}", host.os.exe_suffix()));
        if !go.is_file() {
            return Err(BuildError::ToolchainMissing { expected: go });
        }
        tracing::debug!(go = %go.display(), "Located bundled toolchain");
        Ok(Toolchain { root, go })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn go_binary(&self) -> &Path {
        &self.go
    }

    /// Make sure the `go` binary carries the execute bit.
    ///
    /// Archive extraction can drop permission bits. Failure only warns: the
    /// launch itself reports the real error.
    pub fn ensure_executable(&self) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let result = std::fs::metadata(&self.go).and_then(|meta| {
                let mut perms = meta.permissions();
                if perms.mode() & 0o111 == 0o111 {
                    return Ok(());
                }
                perms.set_mode(0o755);
                std::fs::set_permissions(&self.go, perms)
            });
            if let Err(err) = result {
                tracing::warn!(
                    go = %self.go.display(),
                    error = %err,
                    "Could not mark toolchain executable"
                );
            }
        }
    }

    /// Variables overriding the inherited environment of every `go` invocation.
    ///
    /// `PATH` is the inherited one with `GOROOT/bin` in front; cgo is off and
    /// `GOTOOLCHAIN=local` stops the command from fetching another toolchain.
    pub fn environment(&self, target: &BuildTarget, data_dir: &Path) -> Vec<(String, OsString)> {
        let gopath = absolute(&data_dir.join("gopath"));
        let bin = self.root.join("bin");
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let path = std::env::join_paths(
            std::iter::once(bin.clone()).chain(std::env::split_paths(&inherited)),
        )
        .unwrap_or_else(|_| bin.into_os_string());

        vec![
            ("GOROOT".to_string(), self.root.clone().into_os_string()),
            ("GOPATH".to_string(), gopath.clone().into_os_string()),
            (
                "GOMODCACHE".to_string(),
                gopath.join("pkg").join("mod").into_os_string(),
            ),
            ("PATH".to_string(), path),
            ("CGO_ENABLED".to_string(), OsString::from("0")),
            ("GOOS".to_string(), OsString::from(target.os.goos())),
            ("GOARCH".to_string(), OsString::from(target.arch.goarch())),
            ("GOTOOLCHAIN".to_string(), OsString::from("local")),
        ]
    }
}
