//! End-to-end passes over temporary source trees.

use aliasfix_core::adapters::FsWritePort;
use aliasfix_core::pipeline::{ToolError, run_fs, write_report_artifacts};
use aliasfix_core::settings::RunSettings;
use aliasfix_types::ToolInfo;
use aliasfix_types::reference::{RepairOutcome, UnresolvedReason};
use aliasfix_types::report::{AliasfixReport, FailureStage, PassMode};
use camino::Utf8PathBuf;
use fs_err as fs;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn tool() -> ToolInfo {
    ToolInfo {
        name: "aliasfix".to_string(),
        version: Some("test".to_string()),
        commit: None,
    }
}

struct Project {
    _temp: TempDir,
    src: Utf8PathBuf,
}

impl Project {
    fn new(files: &[(&str, &[u8])]) -> Self {
        let temp = TempDir::new().expect("temp dir");
        let src = Utf8PathBuf::from_path_buf(temp.path().join("src")).expect("utf8 path");
        fs::create_dir_all(&src).expect("create src");
        for (rel, contents) in files {
            let path = src.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create parent");
            }
            fs::write(&path, contents).expect("write file");
        }
        Self { _temp: temp, src }
    }

    fn settings(&self, mode: PassMode) -> RunSettings {
        RunSettings {
            source_root: self.src.clone(),
            mode,
            ..RunSettings::default()
        }
    }

    fn read(&self, rel: &str) -> Vec<u8> {
        fs::read(self.src.join(rel)).expect("read file")
    }
}

#[test]
fn fix_preserves_line_endings_and_other_bytes() {
    let before = b"// header\r\nimport { f } from '@/formatCurrency';\r\n\tconst  x = 1;  \nexport {}";
    let project = Project::new(&[
        ("shared/helpers/formatCurrency.ts", b"export {};\n"),
        ("pages/Cart.tsx", before),
    ]);

    let outcome = run_fs(&project.settings(PassMode::Fix), tool()).expect("fix pass");
    assert_eq!(outcome.report.summary.files_modified, 1);
    assert_eq!(
        project.read("pages/Cart.tsx"),
        b"// header\r\nimport { f } from '@/shared/helpers/formatCurrency';\r\n\tconst  x = 1;  \nexport {}"
            .to_vec()
    );
    assert_eq!(outcome.report.references[0].line, 2);
}

#[test]
fn check_leaves_files_untouched() {
    let before: &[u8] = b"import { f } from \"@/formatCurrency\";\n";
    let project = Project::new(&[
        ("shared/helpers/formatCurrency.ts", b""),
        ("pages/Cart.tsx", before),
    ]);

    let outcome = run_fs(&project.settings(PassMode::Check), tool()).expect("check pass");
    assert!(outcome.policy_block);
    assert_eq!(outcome.report.summary.fixed, 1);
    assert_eq!(outcome.report.summary.files_modified, 0);
    assert_eq!(project.read("pages/Cart.tsx"), before.to_vec());
    assert!(outcome.patch.starts_with("diff --git a/pages/Cart.tsx b/pages/Cart.tsx\n"));
}

#[test]
fn second_fix_pass_is_clean() {
    let project = Project::new(&[
        ("lib/api.ts", b""),
        ("features/cart/index.tsx", b""),
        ("a.ts", b"import { get } from \"@/api\";\nimport Cart from \"@/cart\";\n"),
    ]);
    let settings = project.settings(PassMode::Fix);

    let first = run_fs(&settings, tool()).expect("first pass");
    assert_eq!(first.report.summary.fixed, 2);
    assert!(!first.policy_block);
    let after_first = project.read("a.ts");
    assert_eq!(
        after_first,
        b"import { get } from \"@/lib/api\";\nimport Cart from \"@/features/cart\";\n".to_vec()
    );

    let second = run_fs(&settings, tool()).expect("second pass");
    assert_eq!(second.report.summary.broken, 0);
    assert_eq!(second.report.summary.references_checked, 2);
    assert!(second.rewrites.is_empty());
    assert_eq!(project.read("a.ts"), after_first);
}

#[test]
fn ambiguous_reference_is_left_alone() {
    let before: &[u8] = b"import { u } from \"@/utils\";\n";
    let project = Project::new(&[
        ("a/utils.ts", b""),
        ("b/utils.js", b""),
        ("main.ts", before),
    ]);

    let outcome = run_fs(&project.settings(PassMode::Fix), tool()).expect("fix pass");
    assert!(outcome.policy_block);
    assert_eq!(
        outcome.report.references[0].outcome,
        RepairOutcome::Unresolved {
            reason: UnresolvedReason::Ambiguous {
                candidates: vec!["a/utils.ts".into(), "b/utils.js".into()],
            },
        }
    );
    assert_eq!(project.read("main.ts"), before.to_vec());
}

#[test]
fn stylesheet_sharing_the_base_name_blocks_the_repair() {
    let before: &[u8] = b"import Modal from \"@/old/modal\";\nimport \"./modal.css\";\n";
    let project = Project::new(&[
        ("components/modal.tsx", b""),
        ("styles/modal.css", b""),
        ("pages/Home.tsx", before),
    ]);

    let outcome = run_fs(&project.settings(PassMode::Fix), tool()).expect("fix pass");
    assert!(outcome.policy_block);
    assert_eq!(outcome.report.summary.unresolved, 1);
    assert!(outcome.rewrites.is_empty());
    assert_eq!(project.read("pages/Home.tsx"), before.to_vec());
}

#[test]
fn unreadable_file_does_not_stop_the_pass() {
    let project = Project::new(&[
        ("lib/x.ts", b""),
        ("bad.ts", &[0xc3, 0x28, b'\n']),
        ("good.ts", b"import x from \"@/x\";\n"),
    ]);

    let outcome = run_fs(&project.settings(PassMode::Fix), tool()).expect("fix pass");
    assert_eq!(outcome.report.failures.len(), 1);
    assert_eq!(outcome.report.failures[0].stage, FailureStage::Read);
    assert_eq!(project.read("good.ts"), b"import x from \"@/lib/x\";\n".to_vec());
    assert!(outcome.policy_block);
}

#[test]
fn missing_source_root_is_a_tool_error() {
    let temp = TempDir::new().expect("temp dir");
    let settings = RunSettings {
        source_root: Utf8PathBuf::from_path_buf(temp.path().join("nope")).expect("utf8 path"),
        ..RunSettings::default()
    };
    let err = run_fs(&settings, tool()).unwrap_err();
    assert!(matches!(err, ToolError::Internal(_)));
    assert!(err.to_string().contains("nope"));
}

#[test]
fn report_artifacts_are_written() {
    let project = Project::new(&[
        ("types/onboarding.ts", b""),
        ("pages/Welcome.tsx", b"import type { S } from \"@/types/onboardingTypes\";\n"),
    ]);
    let outcome = run_fs(&project.settings(PassMode::Check), tool()).expect("check pass");

    let out = project.src.parent().expect("project root").join("out");
    let json_path = out.join("aliasfix.report.json");
    let md_path = out.join("aliasfix.report.md");
    write_report_artifacts(
        &outcome,
        Some(json_path.as_path()),
        Some(md_path.as_path()),
        &FsWritePort,
    )
    .expect("write artifacts");

    let report: AliasfixReport =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("read json"))
            .expect("parse report");
    assert_eq!(report.schema, "aliasfix.report.v1");
    assert_eq!(report.summary.unresolved, 1);
    assert_eq!(report.references[0].alias, "@/types/onboardingTypes");

    let md = fs::read_to_string(&md_path).expect("read md");
    assert!(md.contains("- Unresolved: `no_candidate`"));
}
