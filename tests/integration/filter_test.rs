use crate::fixture_arg;
use assert_cmd::Command;
use predicates::prelude::*;

fn text(extra: &[&str]) -> assert_cmd::assert::Assert {
    Command::cargo_bin("deplens")
        .unwrap()
        .args(["text", &fixture_arg("shop"), "--quiet"])
        .args(extra)
        .assert()
}

#[test]
fn exclude_regex_drops_matching_entities() {
    text(&["--exclude-regex", "model"])
        .success()
        .stdout(predicate::str::contains("model").not())
        .stdout(predicate::str::contains("crate::billing --> crate::util"));
}

#[test]
fn depth_collapses_names() {
    text(&["--depth", "1"])
        .success()
        .stdout("crate --> serde\n");
}

#[test]
fn depth_applies_before_exclude_regex() {
    text(&["--depth", "2", "--exclude-regex", "::orders$"])
        .success()
        .stdout(predicate::str::contains("crate::orders").not())
        .stdout(predicate::str::contains("crate::billing --> crate::util"));
}

#[test]
fn filter_namespace_keeps_inner_edges() {
    text(&["--filter-namespace", "crate::orders"])
        .success()
        .stdout(
            "crate::orders --> crate::orders::model::Order\n\
             crate::orders --> crate::orders::model::OrderLine\n",
        );
}

#[test]
fn filter_from_keeps_outgoing_edges() {
    text(&["--filter-from", "crate::orders::model"])
        .success()
        .stdout(
            "crate::orders::model --> crate::util::round_cents\n\
             crate::orders::model --> serde::Serialize\n",
        );
}

#[test]
fn no_external_drops_unowned_targets() {
    text(&["--no-external"])
        .success()
        .stdout(predicate::str::contains("serde::Serialize").not())
        .stdout(predicate::str::contains("crate::orders::Order\n").not())
        .stdout(predicate::str::contains("crate::billing --> crate::util"));
}

#[test]
fn no_classes_collapses_into_namespaces() {
    text(&["--no-classes"])
        .success()
        .stdout(predicate::str::contains("crate --> crate::billing"))
        .stdout(predicate::str::contains("Invoice").not());
}
