//! Tests of the standalone `hotmount` binary.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn project(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::write(temp.path().join("src/app.rs"), "// app").unwrap();
    fs::write(temp.path().join("hotmount.toml"), config).unwrap();
    temp
}

#[test]
fn test_schema_lists_mount_fields() {
    cargo_bin_cmd!("hotmount")
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"entry\""))
        .stdout(predicate::str::contains("\"adapter\""))
        .stdout(predicate::str::contains("\"init_on_boot\""));
}

#[test]
fn test_dev_without_modules_explains_setup() {
    cargo_bin_cmd!("hotmount")
        .args(["dev", "--no-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No entry modules are registered"))
        .stderr(predicate::str::contains("hotmount_cli::run"));
}

#[test]
fn test_check_prints_build_settings() {
    let temp = project("entry = \"src/app.rs\"\nadapter = \"axum\"\ncompiler = \"swc\"\n");

    cargo_bin_cmd!("hotmount")
        .arg("check")
        .arg("--cwd")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ssr_entry\": \"src/app.rs\""))
        .stdout(predicate::str::contains("\"disable_default_transform\": true"));
}

#[test]
fn test_check_rejects_unknown_adapter() {
    let temp = project("entry = \"src/app.rs\"\nadapter = \"koa\"\n");

    cargo_bin_cmd!("hotmount")
        .args(["--no-color", "check", "--cwd"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("`koa`"))
        .stderr(predicate::str::contains("managed"));
}

#[test]
fn test_check_without_config_fails() {
    let temp = TempDir::new().unwrap();

    cargo_bin_cmd!("hotmount")
        .arg("check")
        .arg("--cwd")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("hotmount.toml"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    cargo_bin_cmd!("hotmount")
        .args(["--verbose", "--quiet", "schema"])
        .assert()
        .failure();
}
