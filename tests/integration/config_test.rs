use crate::fixture_arg;
use assert_cmd::Command;
use predicates::prelude::*;

fn deplens_in(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("deplens").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn project_config_sets_merge_policy() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".deplens.toml"), "[merge]\nweights = \"max\"\n").unwrap();

    deplens_in(tmp.path())
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
            "crate::billing --> crate::orders::model::Order (2)",
        ));
}

#[test]
fn project_config_filters_apply() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join(".deplens.toml"),
        "[filters]\nexclude_regex = \"^serde\"\n",
    )
    .unwrap();

    deplens_in(tmp.path())
        .args(["text", &fixture_arg("shop"), "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("serde").not())
        .stdout(predicate::str::contains("crate::billing --> crate::util"));
}

#[test]
fn cli_overrides_project_config() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".deplens.toml"), "[filters]\ndepth = 2\n").unwrap();

    deplens_in(tmp.path())
        .args(["text", &fixture_arg("shop"), "--quiet", "--depth", "1"])
        .assert()
        .success()
        .stdout("crate --> serde\n");
}

#[test]
fn env_var_overrides_project_config() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".deplens.toml"), "[filters]\ndepth = 2\n").unwrap();

    deplens_in(tmp.path())
        .args(["text", &fixture_arg("shop"), "--quiet"])
        .env("DEPLENS_DEPTH", "1")
        .assert()
        .success()
        .stdout("crate --> serde\n");
}

#[test]
fn invalid_config_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".deplens.toml"), "[filters]\ndepth = \"deep\"\n").unwrap();

    deplens_in(tmp.path())
        .args(["text", &fixture_arg("shop"), "--quiet"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid project config"));
}

#[test]
fn include_glob_restricts_files() {
    let tmp = tempfile::tempdir().unwrap();

    deplens_in(tmp.path())
        .args([
            "text",
            &fixture_arg("shop"),
            "--quiet",
            "--include",
            "**/billing.rs",
        ])
        .assert()
        .success()
        .stdout("crate::billing --> crate::orders::model::Order\ncrate::billing --> crate::util\n");
}
