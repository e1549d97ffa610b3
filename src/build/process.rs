use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// How a tool invocation ended. Exactly one of these per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Exit status 0
    Succeeded { stdout: String },
    /// Non-zero exit, or killed by a signal (`code` is `None`)
    Exited { code: Option<i32>, stderr: String },
    /// The process never started
    LaunchFailed { error: String },
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Succeeded { .. })
    }
}

async fn read_stream<R>(stream: Option<R>, name: &'static str) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut collected = Vec::new();
    let Some(mut stream) = stream else {
        return collected;
    };
    let mut chunk = [0u8; 4096];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                collected.extend_from_slice(&chunk[..n]);
                tracing::trace!(stream = name, bytes = n, "Tool output");
            }
            Err(err) => {
                tracing::debug!(stream = name, error = %err, "Stopped reading tool output");
                break;
            }
        }
    }
    collected
}

/// Run `program` once in `cwd` with `env` layered over the inherited environment.
///
/// stdout and stderr are drained concurrently while the child runs, so a
/// chatty tool cannot block on a full pipe. No timeout is applied.
pub async fn run_tool(
    program: &Path,
    args: &[OsString],
    cwd: &Path,
    env: &[(String, OsString)],
) -> ProcessOutcome {
    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(cwd)
        .envs(env.iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!(program = %program.display(), ?args, cwd = %cwd.display(), "Starting tool");
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            return ProcessOutcome::LaunchFailed {
                error: err.to_string(),
            }
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (stdout, stderr, status) = tokio::join!(
        read_stream(stdout, "stdout"),
        read_stream(stderr, "stderr"),
        child.wait()
    );

    match status {
        Ok(status) if status.success() => ProcessOutcome::Succeeded {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
        },
        Ok(status) => ProcessOutcome::Exited {
            code: status.code(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        },
        Err(err) => ProcessOutcome::LaunchFailed {
            error: err.to_string(),
        },
    }
}

/// Convenience for building argument lists from mixed strings and paths.
pub fn tool_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    args.into_iter().map(Into::into).collect()
}

/// Arguments of `go build -o <output> .`
pub fn go_build_args(output: &Path) -> Vec<OsString> {
    tool_args([
        OsString::from("build"),
        OsString::from("-o"),
        output.as_os_str().to_os_string(),
        OsString::from("."),
    ])
}

#[cfg(all(test, unix))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("tool");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[tokio::test]
    async fn test_success_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let tool = script(dir.path(), "echo \"go version go1.22.5 $GOOS\"");
        let env = vec![("GOOS".to_string(), OsString::from("darwin"))];
        let outcome = run_tool(&tool, &tool_args(["version"]), dir.path(), &env).await;
        assert_eq!(
            outcome,
            ProcessOutcome::Succeeded {
                stdout: "go version go1.22.5 darwin\n".to_string()
            }
        );
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_non_zero_exit_captures_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let tool = script(dir.path(), "echo boom >&2\necho noise\nexit 3");
        let outcome = run_tool(&tool, &[], dir.path(), &[]).await;
        assert_eq!(
            outcome,
            ProcessOutcome::Exited {
                code: Some(3),
                stderr: "boom\n".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_large_stderr_does_not_deadlock() {
        let dir = tempfile::tempdir().unwrap();
        let tool = script(
            dir.path(),
            "i=0\nwhile [ $i -lt 2000 ]; do echo 'error line padding padding padding padding' >&2; i=$((i+1)); done\nexit 1",
        );
        let outcome = run_tool(&tool, &[], dir.path(), &[]).await;
        match outcome {
            ProcessOutcome::Exited { code, stderr } => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr.lines().count(), 2000);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = run_tool(&dir.path().join("absent"), &[], dir.path(), &[]).await;
        assert!(matches!(outcome, ProcessOutcome::LaunchFailed { .. }));
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let work = dir.path().join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(work.join("marker"), "").unwrap();
        let tool = script(dir.path(), "test -f marker");
        let outcome = run_tool(&tool, &[], &work, &[]).await;
        assert!(outcome.is_success());
    }

    #[test]
    fn test_go_build_args() {
        let args = go_build_args(Path::new("/out/app"));
        assert_eq!(args, tool_args(["build", "-o", "/out/app", "."]));
    }
}
