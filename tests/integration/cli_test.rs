use assert_cmd::Command;
use predicates::prelude::*;

fn deplens() -> Command {
    Command::cargo_bin("deplens").unwrap()
}

#[test]
fn no_arguments_shows_general_help() {
    deplens()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: deplens"))
        .stdout(predicate::str::contains("self-test"));
}

#[test]
fn help_flag_is_rewritten_to_command_help() {
    // The source does not exist: analysis must not run.
    deplens()
        .args(["dot", "-h", "does/not/exist"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--keep-source"))
        .stdout(predicate::str::contains("--exclude-regex"));
}

#[test]
fn help_command_shows_options() {
    deplens()
        .args(["help", "metrics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--weights").not());
}

#[test]
fn list_shows_every_command() {
    let output = deplens().arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for name in ["uml", "dot", "dsm", "text", "metrics", "help", "list", "self-test"] {
        assert!(stdout.contains(name), "missing {name}");
    }
}

#[test]
fn list_ignores_trailing_analysis_options() {
    deplens()
        .args(["list", "does/not/exist", "--depth", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("metrics"));
}

#[test]
fn version_flag() {
    deplens()
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("deplens {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn self_test_passes() {
    deplens()
        .arg("self-test")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ grouped use"))
        .stdout(predicate::str::contains("✓ syntax errors"))
        .stdout(predicate::str::contains("✗").not());
}

#[test]
fn unknown_command_suggests_and_exits_with_two() {
    deplens()
        .args(["dto", "src"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Command \"dto\" is not defined."))
        .stderr(predicate::str::contains("Did you mean \"dot\"?"))
        .stderr(predicate::str::contains("metrics"));
}

#[test]
fn unknown_help_topic_exits_with_two() {
    deplens()
        .args(["help", "frobnicate"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Command \"frobnicate\" is not defined."));
}

#[test]
fn missing_source_is_a_usage_error() {
    deplens()
        .arg("text")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<SOURCE>"));
}

#[test]
fn option_of_another_command_is_rejected() {
    deplens()
        .args(["text", "src", "--keep-source"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--keep-source"));
}
