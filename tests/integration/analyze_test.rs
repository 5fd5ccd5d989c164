use crate::fixture_arg;
use assert_cmd::Command;
use predicates::prelude::*;

fn deplens() -> Command {
    Command::cargo_bin("deplens").unwrap()
}

#[test]
fn text_lists_module_dependencies() {
    deplens()
        .args(["text", &fixture_arg("shop"), "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "crate::billing --> crate::orders::model::Order\n",
        ))
        .stdout(predicate::str::contains("crate::billing --> crate::util\n"))
        .stdout(predicate::str::contains(
            "crate::orders --> crate::orders::model::OrderLine\n",
        ))
        .stdout(predicate::str::contains(
            "crate::orders::model --> crate::util::round_cents\n",
        ))
        .stdout(predicate::str::contains("std::").not());
}

#[test]
fn internals_flag_keeps_standard_library() {
    deplens()
        .args(["text", &fixture_arg("shop"), "--quiet", "--internals"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "crate::billing --> std::collections::HashMap",
        ));
}

#[test]
fn text_with_weights() {
    deplens()
        .args(["text", &fixture_arg("shop"), "--quiet", "--weights"])
        .assert()
        .success()
        .stdout(predicate::str::contains("crate::billing --> crate::util (1)"));
}

#[test]
fn dot_prints_markup() {
    deplens()
        .args(["dot", &fixture_arg("shop"), "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph dependencies"))
        .stdout(predicate::str::contains(
            "\"crate::billing\" -> \"crate::util\";",
        ));
}

#[test]
fn dot_writes_markup_file() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("graphs").join("deps.dot");

    deplens()
        .args(["dot", &fixture_arg("shop"), "--quiet", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let markup = std::fs::read_to_string(&output).unwrap();
    assert!(markup.starts_with("digraph dependencies"));
}

#[test]
fn uml_declares_classes_and_interfaces() {
    deplens()
        .args(["uml", &fixture_arg("shop"), "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("@startuml"))
        .stdout(predicate::str::contains(
            "class \"crate::orders::model::Order\" as e",
        ))
        .stdout(predicate::str::contains(
            "interface \"crate::orders::Repository\" as e",
        ))
        .stdout(predicate::str::contains("@enduml"));
}

#[test]
fn dsm_text_and_html() {
    deplens()
        .args(["dsm", &fixture_arg("shop"), "--quiet", "--depth", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1: crate "))
        .stdout(predicate::str::contains(" - |"));

    deplens()
        .args(["dsm", &fixture_arg("shop"), "--quiet", "--format", "html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<table>"))
        .stdout(predicate::str::contains("crate::orders::model"));
}

#[test]
fn metrics_json_counts_declared_items() {
    let output = deplens()
        .args(["metrics", &fixture_arg("shop"), "--quiet", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["modules"], 5);
    assert_eq!(report["classes"], 4);
    assert_eq!(report["interfaces"], 1);
    assert_eq!(report["functions"], 3);
    assert_eq!(report["abstractness"], 0.2);
}

#[test]
fn metrics_report_cycles_after_collapsing() {
    let output = deplens()
        .args([
            "metrics",
            &fixture_arg("shop"),
            "--quiet",
            "--depth",
            "2",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let cycles = report["cycles"].as_array().unwrap();
    assert_eq!(cycles.len(), 1);
    assert_eq!(
        cycles[0]["members"],
        serde_json::json!(["crate::billing", "crate::orders"])
    );
}

#[test]
fn metrics_text_report() {
    deplens()
        .args(["metrics", &fixture_arg("shop"), "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dependency Metrics"))
        .stdout(predicate::str::contains("Instability"));
}

#[test]
fn dynamic_trace_is_merged() {
    deplens()
        .args([
            "text",
            &fixture_arg("shop"),
            "--quiet",
            "--weights",
            "--dynamic",
            &fixture_arg("traces/shop.json"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "crate::billing --> crate::orders::model::Order (3)",
        ))
        .stdout(predicate::str::contains("crate::util --> crate::billing (1)"));
}

#[test]
fn single_file_source() {
    deplens()
        .args(["text", &fixture_arg("shop/src/billing.rs"), "--quiet"])
        .assert()
        .success()
        .stdout("crate::billing --> crate::orders::model::Order\ncrate::billing --> crate::util\n");
}
