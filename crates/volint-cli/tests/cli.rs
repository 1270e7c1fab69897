use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write as _;

#[allow(deprecated)]
fn volint_cmd() -> Command {
    Command::cargo_bin("volint").unwrap()
}

#[test]
fn explain_known_code_prints_entry() {
    volint_cmd()
        .args(["explain", "E-GONM"])
        .assert()
        .success()
        .stdout(predicate::str::contains("E-GONM"))
        .stdout(predicate::str::contains("Mandatory document is absent"));
}

#[test]
fn explain_accepts_bare_label() {
    volint_cmd()
        .args(["explain", "noct"])
        .assert()
        .success()
        .stdout(predicate::str::contains("W-NOCT"));
}

#[test]
fn explain_unknown_code_lists_catalogue() {
    volint_cmd()
        .args(["explain", "ZZZZ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown message code: ZZZZ"))
        .stderr(predicate::str::contains("E-GONM"));
}

#[test]
fn schema_prints_config_schema() {
    volint_cmd()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("max_repeat"))
        .stdout(predicate::str::contains("allowed_types"));
}

#[test]
fn check_rejects_malformed_service_url() {
    volint_cmd()
        .args(["check", "not a url"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("bad service URL"));
}

#[test]
fn check_rejects_unknown_stage_override() {
    volint_cmd()
        .args(["--stages", "telescope", "check", "http://example.org/tap"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown stage: telescope"));
}

#[test]
fn check_rejects_invalid_config_file() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "max_repeat = 0").unwrap();
    volint_cmd()
        .arg("--config")
        .arg(config.path())
        .args(["check", "http://example.org/tap"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("max_repeat must be at least 1"));
}
