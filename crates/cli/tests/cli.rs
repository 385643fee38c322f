use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

fn unformatted() -> &'static str {
  "for i=1:3\n  y=a+b\nend\n"
}

fn formatted() -> &'static str {
  "for i in 1:3\n  y = a + b\nend\n"
}

fn write_fixture(contents: &str) -> NamedTempFile {
  let mut file = NamedTempFile::with_suffix(".jl").unwrap();
  file.write_all(contents.as_bytes()).unwrap();
  file
}

#[test]
fn formats_file_in_place() {
  let file = write_fixture(unformatted());

  Command::cargo_bin("runestone")
    .unwrap()
    .arg(file.path())
    .assert()
    .success()
    .stdout(contains("reformatted"));

  let result = fs::read_to_string(file.path()).unwrap();
  assert_eq!(result, formatted());
}

#[test]
fn check_mode_reports_failure_without_writing() {
  let file = write_fixture(unformatted());

  Command::cargo_bin("runestone")
    .unwrap()
    .arg("--check")
    .arg(file.path())
    .assert()
    .failure()
    .stdout(contains("would reformat"));

  let result = fs::read_to_string(file.path()).unwrap();
  assert_eq!(result, unformatted(), "check mode must not write");
}

#[test]
fn check_mode_succeeds_on_already_formatted_file() {
  let file = write_fixture(formatted());

  Command::cargo_bin("runestone")
    .unwrap()
    .arg("--check")
    .arg(file.path())
    .assert()
    .success();
}

#[test]
fn diff_mode_prints_changes_without_writing() {
  let file = write_fixture(unformatted());

  Command::cargo_bin("runestone")
    .unwrap()
    .arg("--diff")
    .arg(file.path())
    .assert()
    .success()
    .stdout(contains("for i in 1:3"))
    .stdout(contains("for i=1:3"));

  let result = fs::read_to_string(file.path()).unwrap();
  assert_eq!(result, unformatted(), "diff mode must not write");
}

#[test]
fn quiet_suppresses_per_file_output() {
  let file = write_fixture(unformatted());

  Command::cargo_bin("runestone")
    .unwrap()
    .arg("--quiet")
    .arg(file.path())
    .assert()
    .success()
    .stdout(contains("reformatted").not());
}

#[test]
fn reports_syntax_error_with_nonzero_exit() {
  let file = write_fixture("for i=1:3\n");

  Command::cargo_bin("runestone")
    .unwrap()
    .arg(file.path())
    .assert()
    .failure()
    .stderr(contains("Cannot parse"));
}

#[test]
fn missing_file_reports_read_error() {
  Command::cargo_bin("runestone")
    .unwrap()
    .arg("/nonexistent/path/does-not-exist.jl")
    .assert()
    .failure()
    .stderr(contains("Cannot read"));
}

#[test]
fn no_paths_is_an_error() {
  Command::cargo_bin("runestone")
    .unwrap()
    .assert()
    .failure();
}
