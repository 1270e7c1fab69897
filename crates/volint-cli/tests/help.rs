use assert_cmd::Command;

/// Helper to get a Command for the volint binary.
#[allow(deprecated)]
fn volint_cmd() -> Command {
    Command::cargo_bin("volint").unwrap()
}

#[test]
fn help_works() {
    volint_cmd().arg("--help").assert().success();
}
