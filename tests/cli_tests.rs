#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::fs;
use std::process::Command;

fn mocksmith() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mocksmith"));
    cmd.env("MOCKSMITH_LOG_LEVEL", "warn").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_compile_writes_go_module() {
    let dir = tempfile::tempdir().unwrap();
    let project = common::write_project(dir.path(), "pets.yaml", &common::pets_project());
    let out = dir.path().join("server");

    let output = mocksmith()
        .current_dir(dir.path())
        .arg("compile")
        .arg("--project")
        .arg(&project)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("run cli");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let main_go = fs::read_to_string(out.join("main.go")).unwrap();
    assert!(main_go.contains("const projectName = \"Pets API\""));
    assert!(out.join("go.mod").is_file());

    // refuses to overwrite without --force
    let again = mocksmith()
        .current_dir(dir.path())
        .args(["compile", "--project"])
        .arg(&project)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("run cli");
    assert!(!again.status.success());
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));

    let forced = mocksmith()
        .current_dir(dir.path())
        .args(["compile", "--force", "--project"])
        .arg(&project)
        .arg("--out")
        .arg(&out)
        .status()
        .expect("run cli");
    assert!(forced.success());
}

#[test]
fn test_cli_inspect_lists_routes() {
    let dir = tempfile::tempdir().unwrap();
    let project = common::write_project(dir.path(), "pets.json", &common::pets_project());
    let output = mocksmith()
        .current_dir(dir.path())
        .arg("inspect")
        .arg("-p")
        .arg(&project)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("📋 Pets API: 4 routes in 3 paths"));
    assert!(stdout.contains("/text\n  GET     200 text/plain"));
}

#[test]
fn test_cli_rejects_bad_document() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("broken.json");
    fs::write(&project, "[1, 2, 3]").unwrap();
    let output = mocksmith()
        .current_dir(dir.path())
        .arg("inspect")
        .arg("-p")
        .arg(&project)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_cli_build_fails_on_unsupported_host() {
    let dir = tempfile::tempdir().unwrap();
    let project = common::write_project(dir.path(), "pets.json", &common::pets_project());
    let output = mocksmith()
        .current_dir(dir.path())
        .env("MOCKSMITH_SCRATCH_DIR", dir.path().join("scratch"))
        .arg("build")
        .arg("-p")
        .arg(&project)
        .arg("-o")
        .arg(dir.path().join("pets"))
        .arg("--json")
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["ok"], false);
    assert!(!dir.path().join("scratch").exists());
    assert!(!dir.path().join("pets").exists());
}

#[test]
fn test_cli_build_json_always_prints_report() {
    let dir = tempfile::tempdir().unwrap();
    let output = mocksmith()
        .current_dir(dir.path())
        .arg("build")
        .arg("-p")
        .arg(dir.path().join("absent.json"))
        .arg("-o")
        .arg(dir.path().join("pets"))
        .arg("--json")
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["ok"], false);
    assert!(report["err"].as_str().unwrap().contains("absent.json"));
}
