//! CLI integration tests.
//!
//! Drives the `bashc` binary end to end through `assert_cmd` instead of
//! calling library functions directly.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn transpiles_echo_to_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("script.sh");
    fs::write(&input, "echo hello\n").expect("write script");

    Command::cargo_bin("bashc")
        .expect("binary builds")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"$.echo("hello")"#));
}

#[test]
fn writes_to_output_file_with_dash_o() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("script.sh");
    let output = dir.path().join("out.ts");
    fs::write(&input, "cd /tmp\n").expect("write script");

    Command::cargo_bin("bashc")
        .expect("binary builds")
        .args(["-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success();

    let written = fs::read_to_string(&output).expect("read output");
    assert!(written.contains(r#"$.cd("/tmp")"#));
}

#[test]
fn reads_from_stdin_with_dash() {
    Command::cargo_bin("bashc")
        .expect("binary builds")
        .arg("-")
        .write_stdin("echo from stdin\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("from stdin"));
}

#[test]
fn recovery_mode_still_emits_output_for_unsupported_constructs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("script.sh");
    fs::write(&input, "echo \"${arr[0]}\"\n").expect("write script");

    Command::cargo_bin("bashc")
        .expect("binary builds")
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("warning"));
}

#[test]
fn no_imports_flag_omits_preamble() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("script.sh");
    fs::write(&input, "echo hi\n").expect("write script");

    Command::cargo_bin("bashc")
        .expect("binary builds")
        .arg("--no-imports")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("import").not());
}
