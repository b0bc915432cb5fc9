//! Black-box CLI checks: flag plumbing, exit codes, and the artifacts a
//! run leaves behind.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

fn histbench() -> Command {
    Command::cargo_bin("histbench").unwrap()
}

fn write_stub_checker(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("checker.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn write_corpus(root: &Path, ids: &[&str]) {
    for id in ids {
        let instance = root.join(id).join("hist-00000");
        fs::create_dir_all(&instance).unwrap();
        fs::write(instance.join("history.bincode"), b"\x00").unwrap();
    }
}

#[test]
fn list_prints_sorted_task_ids() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path(), &["h2", "h1"]);

    histbench()
        .args(["list", "--history-type", "dbcop"])
        .arg("--history-root")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout("h1\nh2\n");
}

#[test]
fn list_missing_root_exits_with_config_error() {
    histbench()
        .args([
            "list",
            "--history-root",
            "/definitely/not/here",
            "--history-type",
            "dbcop",
        ])
        .assert()
        .code(2);
}

#[test]
fn run_without_config_requires_checker() {
    histbench()
        .args(["run", "--history-type", "dbcop", "--solver", "monosat"])
        .arg("--history-root")
        .arg("somewhere")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--checker"));
}

#[test]
fn accepting_run_writes_report_and_exits_zero() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path(), &["h1", "h2"]);
    let checker = write_stub_checker(
        tmp.path(),
        "echo '[00:00:01] solve time: 10ms'\necho 'accept: true'",
    );
    let output = tmp.path().join("out/report.json");

    histbench()
        .arg("run")
        .arg("--checker")
        .arg(&checker)
        .arg("--history-root")
        .arg(tmp.path())
        .args(["--history-type", "dbcop", "--solver", "acyclic-minisat"])
        .args(["--workers", "2", "--timeout", "30s", "--no-progress"])
        .arg("--output")
        .arg(&output)
        .assert()
        .code(0)
        .stderr(predicate::str::contains("2 histories checked"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["h1"]["accept"], serde_json::Value::Bool(true));
    assert_eq!(report["h2"]["total time"], "10ms");
}

#[test]
fn rejecting_run_exits_with_task_failures() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path(), &["bad"]);
    let checker = write_stub_checker(tmp.path(), "echo 'accept: false'");
    let output = tmp.path().join("report.json");

    histbench()
        .arg("run")
        .arg("--checker")
        .arg(&checker)
        .arg("--history-root")
        .arg(tmp.path())
        .args(["--history-type", "dbcop", "--solver", "monosat", "--no-progress"])
        .arg("--output")
        .arg(&output)
        .assert()
        .code(1);
}

#[test]
fn yaml_config_drives_a_run_with_flag_overrides() {
    let tmp = tempfile::tempdir().unwrap();
    write_corpus(tmp.path(), &["h1"]);
    let checker = write_stub_checker(tmp.path(), "echo 'accept: true'");
    let output = tmp.path().join("report.json");

    let config = tmp.path().join("bench.yaml");
    fs::write(
        &config,
        format!(
            "checker: {}\nhistory_root: {}\nhistory_type: dbcop\nsolver: z3\nworkers: 1\n",
            checker.display(),
            tmp.path().display()
        ),
    )
    .unwrap();

    histbench()
        .arg("run")
        .arg("--config")
        .arg(&config)
        .args(["--solver", "acyclic-minisat", "--no-progress"])
        .arg("--output")
        .arg(&output)
        .assert()
        .code(0);
    assert!(output.is_file());
}

#[test]
fn bad_enum_value_is_a_config_error() {
    histbench()
        .args([
            "run",
            "--checker",
            "checker",
            "--history-root",
            ".",
            "--history-type",
            "dbcop",
            "--solver",
            "imaginary-solver",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("imaginary-solver"));
}
