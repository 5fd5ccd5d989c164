use crate::{fixture_arg, fixture_path};
use assert_cmd::Command;
use predicates::prelude::*;

fn deplens() -> Command {
    Command::cargo_bin("deplens").unwrap()
}

#[test]
fn syntax_error_exits_with_one_and_no_output() {
    deplens()
        .args(["text", &fixture_arg("broken"), "--quiet"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("error: Syntax error"))
        .stderr(predicate::str::contains("lib.rs"));
}

#[test]
fn syntax_error_fails_the_whole_batch() {
    deplens()
        .args([
            "dot",
            &fixture_arg("shop"),
            &fixture_arg("broken"),
            "--quiet",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_source_path_is_fatal() {
    deplens()
        .args(["text", "does/not/exist", "--quiet"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No analyzable files"));
}

#[test]
fn invalid_exclude_regex_is_fatal() {
    deplens()
        .args(["text", &fixture_arg("shop"), "--exclude-regex", "("])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid exclude pattern"));
}

#[test]
fn invalid_trace_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let trace = tmp.path().join("trace.json");
    std::fs::write(&trace, "{\"calls\": 3}").unwrap();

    deplens()
        .args(["text", &fixture_arg("shop"), "--quiet", "--dynamic"])
        .arg(&trace)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid trace file"));
}

#[test]
fn missing_external_tool_exits_with_three() {
    let tmp = tempfile::tempdir().unwrap();
    let image = tmp.path().join("deps.png");

    deplens()
        .args(["dot", &fixture_arg("shop"), "--quiet", "--output"])
        .arg(&image)
        .env("DEPLENS_DOT", "deplens-no-such-dot")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("deplens-no-such-dot"));
    assert!(!image.exists());
}

#[test]
fn markup_output_never_needs_the_tool() {
    let tmp = tempfile::tempdir().unwrap();
    let markup = tmp.path().join("deps.puml");

    deplens()
        .args(["uml", &fixture_arg("shop"), "--quiet", "--output"])
        .arg(&markup)
        .env("DEPLENS_PLANTUML", "deplens-no-such-plantuml")
        .assert()
        .success();
    assert!(markup.exists());
    assert!(fixture_path("shop").exists());
}
