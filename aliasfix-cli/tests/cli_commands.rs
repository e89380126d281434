//! End-to-end tests of the `aliasfix` binary.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn aliasfix() -> Command {
    Command::cargo_bin("aliasfix").expect("aliasfix binary")
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A project with one repairable and one unrepairable import.
fn create_temp_project() -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    let root = td.path();
    write(root, "src/shared/helpers/formatCurrency.ts", "export {};\n");
    write(root, "src/types/onboarding.ts", "export {};\n");
    write(
        root,
        "src/pages/Cart.tsx",
        "import { formatCurrency } from \"@/formatCurrency\";\n",
    );
    write(
        root,
        "src/pages/Welcome.tsx",
        "import type { Step } from \"@/types/onboardingTypes\";\n",
    );
    td
}

/// A project whose only broken import can be repaired.
fn create_fixable_project() -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    let root = td.path();
    write(root, "src/shared/helpers/formatCurrency.ts", "export {};\n");
    write(
        root,
        "src/pages/Cart.tsx",
        "import { formatCurrency } from \"@/formatCurrency\";\n",
    );
    td
}

#[test]
fn test_help_lists_subcommands() {
    aliasfix()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("fix"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_check_reports_and_does_not_write() {
    let temp = create_temp_project();

    aliasfix()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "broken found @/formatCurrency in src/pages/Cart.tsx\n  fixed -> @/shared/helpers/formatCurrency\n",
        ))
        .stdout(predicate::str::contains(
            "broken found @/types/onboardingTypes in src/pages/Welcome.tsx\n  could not fix automatically\n",
        ))
        .stdout(predicate::str::contains("diff --git a/pages/Cart.tsx b/pages/Cart.tsx"));

    let cart = fs::read_to_string(temp.path().join("src/pages/Cart.tsx")).unwrap();
    assert!(cart.contains("\"@/formatCurrency\""));
}

#[test]
fn test_check_no_diff() {
    let temp = create_temp_project();

    aliasfix()
        .current_dir(temp.path())
        .args(["check", "--no-diff"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("diff --git").not());
}

#[test]
fn test_fix_with_unresolved_exits_2() {
    let temp = create_temp_project();

    aliasfix()
        .current_dir(temp.path())
        .arg("fix")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("could not fix automatically"))
        .stdout(predicate::str::contains("1 files modified"));

    let cart = fs::read_to_string(temp.path().join("src/pages/Cart.tsx")).unwrap();
    assert_eq!(
        cart,
        "import { formatCurrency } from \"@/shared/helpers/formatCurrency\";\n"
    );
}

#[test]
fn test_fix_then_check_is_clean() {
    let temp = create_fixable_project();

    aliasfix()
        .current_dir(temp.path())
        .arg("fix")
        .assert()
        .success()
        .stdout(predicate::str::contains("fixed -> @/shared/helpers/formatCurrency"));

    aliasfix()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("broken found").not())
        .stdout(predicate::str::contains("0 broken"));
}

#[test]
fn test_project_root_flag() {
    let temp = create_fixable_project();

    aliasfix()
        .arg("check")
        .arg("--project-root")
        .arg(temp.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("fixed -> @/shared/helpers/formatCurrency"));
}

#[test]
fn test_config_file_sets_root_and_marker() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    write(
        root,
        "aliasfix.toml",
        "source_root = \"app\"\n[alias]\nmarker = \"~/\"\n",
    );
    write(root, "app/lib/format.ts", "export {};\n");
    write(root, "app/main.ts", "import { f } from \"~/format\";\n");

    aliasfix()
        .current_dir(root)
        .arg("fix")
        .assert()
        .success()
        .stdout(predicate::str::contains("broken found ~/format in app/main.ts"))
        .stdout(predicate::str::contains("fixed -> ~/lib/format"));

    let main = fs::read_to_string(root.join("app/main.ts")).unwrap();
    assert_eq!(main, "import { f } from \"~/lib/format\";\n");
}

#[test]
fn test_cli_marker_overrides_config() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    write(root, "aliasfix.toml", "[alias]\nmarker = \"~/\"\n");
    write(root, "src/lib/format.ts", "export {};\n");
    write(root, "src/main.ts", "import { f } from \"@/format\";\n");

    aliasfix()
        .current_dir(root)
        .args(["check", "--marker", "@/"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("fixed -> @/lib/format"));
}

#[test]
fn test_exclude_flag_extends_defaults() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    write(root, "src/a/utils.ts", "export {};\n");
    write(root, "src/generated/utils.ts", "export {};\n");
    write(root, "src/main.ts", "import { u } from \"@/utils\";\n");

    aliasfix()
        .current_dir(root)
        .arg("check")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("could not fix automatically"));

    aliasfix()
        .current_dir(root)
        .args(["check", "--exclude", "generated"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("fixed -> @/a/utils"));
}

#[test]
fn test_report_and_markdown_artifacts() {
    let temp = create_temp_project();

    aliasfix()
        .current_dir(temp.path())
        .args([
            "check",
            "--report",
            "out/report.json",
            "--markdown",
            "out/report.md",
        ])
        .assert()
        .code(2);

    let json = fs::read_to_string(temp.path().join("out/report.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(report["schema"], "aliasfix.report.v1");
    assert_eq!(report["mode"], "check");
    assert_eq!(report["summary"]["broken"], 2);
    assert_eq!(report["summary"]["fixed"], 1);

    let md = fs::read_to_string(temp.path().join("out/report.md")).unwrap();
    assert!(md.contains("# aliasfix report"));
}

#[test]
fn test_resolve_command() {
    let temp = create_temp_project();

    aliasfix()
        .current_dir(temp.path())
        .args(["resolve", "@/types/onboarding"])
        .assert()
        .success()
        .stdout("@/types/onboarding resolves\n");

    aliasfix()
        .current_dir(temp.path())
        .args(["resolve", "@/formatCurrency"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("fixed -> @/shared/helpers/formatCurrency"));

    aliasfix()
        .current_dir(temp.path())
        .args(["resolve", "@/types/onboardingTypes"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("no candidate found"));
}

#[test]
fn test_missing_source_root_is_tool_error() {
    let td = tempfile::tempdir().unwrap();

    aliasfix()
        .current_dir(td.path())
        .arg("check")
        .assert()
        .code(1);

    aliasfix()
        .current_dir(td.path())
        .args(["resolve", "@/x"])
        .assert()
        .code(1);
}

#[test]
fn test_invalid_config_is_tool_error() {
    let temp = create_fixable_project();
    write(temp.path(), "aliasfix.toml", "[alias\n");

    aliasfix()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("aliasfix.toml"));
}

#[test]
fn test_unknown_subcommand_fails() {
    aliasfix().arg("explode").assert().failure();
}
