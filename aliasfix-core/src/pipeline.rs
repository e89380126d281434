//! The check/fix pass and single-alias lookup.
//!
//! Entry points are I/O-agnostic: the tree is queried through [`TreeView`] and file contents go
//! through [`SourcePort`]. [`run_fs`] wires up the filesystem adapters.

use crate::adapters::FsSourcePort;
use crate::ports::{SourcePort, WritePort};
use crate::settings::RunSettings;
use aliasfix_domain::{
    AliasConfig, FsTreeView, ImportScanner, Repair, TreeSnapshot, TreeView, find_replacement,
    is_resolved, walk,
};
use aliasfix_edit::{FileRewrite, SourceEdit, apply_edits, render_patch, split_lines};
use aliasfix_render::render_report_md;
use aliasfix_types::ToolInfo;
use aliasfix_types::reference::{AliasLookup, BrokenReference, RepairOutcome};
use aliasfix_types::report::{AliasfixReport, FailureStage, FileFailure, PassMode};
use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use tracing::{debug, info, warn};

/// Error type for pipeline results. Exit code 2 = policy block, 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("policy block")]
    PolicyBlock,
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Outcome of [`run`].
#[derive(Debug)]
pub struct RunOutcome {
    pub report: AliasfixReport,
    /// Every file with at least one repaired reference, in walk order.
    pub rewrites: Vec<FileRewrite>,
    pub patch: String,
    /// `check` found broken references, `fix` left some unresolved, or a file failed.
    pub policy_block: bool,
}

/// Run one pass against the filesystem under `settings.source_root`.
pub fn run_fs(settings: &RunSettings, tool: ToolInfo) -> Result<RunOutcome, ToolError> {
    let meta = fs::metadata(&settings.source_root)
        .with_context(|| format!("source root {}", settings.source_root))?;
    if !meta.is_dir() {
        return Err(
            anyhow::anyhow!("source root {} is not a directory", settings.source_root).into(),
        );
    }

    let tree = FsTreeView::new(settings.source_root.clone());
    let sources = FsSourcePort::new(settings.source_root.clone());
    run(settings, &tree, &sources, tool)
}

/// Run one pass: scan every source file, resolve each alias reference, and repair the broken
/// ones whose candidate is unambiguous.
///
/// In [`PassMode::Fix`] each changed file is written through `sources` as soon as it has been
/// scanned. Unreadable and unwritable files are recorded in the report and skipped.
pub fn run(
    settings: &RunSettings,
    tree: &dyn TreeView,
    sources: &dyn SourcePort,
    tool: ToolInfo,
) -> Result<RunOutcome, ToolError> {
    let config = settings
        .config
        .clone()
        .normalized()
        .context("invalid alias configuration")?;
    let scanner = ImportScanner::new(&config).context("compile import pattern")?;
    let snapshot = walk(tree, &config)
        .with_context(|| format!("walk source root {}", settings.source_root))?;

    let mut report = AliasfixReport::new(tool, settings.mode, settings.source_root.as_str());
    for (dir, message) in snapshot.unreadable_dirs() {
        report.failures.push(FileFailure {
            path: dir.to_string(),
            stage: FailureStage::Read,
            message: message.clone(),
            after_references: 0,
        });
    }

    let mut rewrites = Vec::new();
    for rel in snapshot.source_files(&config) {
        report.summary.files_scanned += 1;

        let text = match read_text(sources, rel) {
            Ok(text) => text,
            Err(message) => {
                warn!(path = %rel, error = %message, "skipping unreadable file");
                report.failures.push(FileFailure {
                    path: rel.to_string(),
                    stage: FailureStage::Read,
                    message,
                    after_references: report.references.len(),
                });
                continue;
            }
        };

        let edits = scan_file(rel, &text, &scanner, &snapshot, tree, &config, &mut report);
        if edits.is_empty() {
            continue;
        }

        let rewrite = FileRewrite {
            path: rel.clone(),
            after: apply_edits(&text, &edits),
            before: text,
            references_fixed: edits.len() as u64,
        };
        if rewrite.is_noop() {
            continue;
        }

        let written = match settings.mode {
            PassMode::Check => false,
            PassMode::Fix => match sources.write_source(&rewrite) {
                Ok(()) => {
                    info!(path = %rel, fixed = rewrite.references_fixed, "rewrote file");
                    true
                }
                Err(err) => {
                    warn!(path = %rel, error = %err, "could not write file");
                    report.failures.push(FileFailure {
                        path: rel.to_string(),
                        stage: FailureStage::Write,
                        message: err.to_string(),
                        after_references: report.references.len(),
                    });
                    false
                }
            },
        };
        report.files.push(rewrite.file_change(written));
        rewrites.push(rewrite);
    }

    report.finish();
    let patch = render_patch(&rewrites);
    let s = &report.summary;
    let policy_block = s.files_failed > 0
        || match settings.mode {
            PassMode::Check => s.broken > 0,
            PassMode::Fix => s.unresolved > 0,
        };

    info!(
        files = s.files_scanned,
        broken = s.broken,
        fixed = s.fixed,
        unresolved = s.unresolved,
        modified = s.files_modified,
        failed = s.files_failed,
        "pass complete"
    );

    Ok(RunOutcome {
        report,
        rewrites,
        patch,
        policy_block,
    })
}

fn read_text(sources: &dyn SourcePort, rel: &Utf8Path) -> Result<String, String> {
    let bytes = sources.read_source(rel).map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| format!("not valid UTF-8: {e}"))
}

/// Check every line of one file, recording broken references in `report`. Returns the edits
/// for the repairable ones.
fn scan_file(
    rel: &Utf8Path,
    text: &str,
    scanner: &ImportScanner,
    snapshot: &TreeSnapshot,
    tree: &dyn TreeView,
    config: &AliasConfig,
    report: &mut AliasfixReport,
) -> Vec<SourceEdit> {
    let mut edits = Vec::new();

    for (idx, line) in split_lines(text).into_iter().enumerate() {
        let Some(m) = scanner.find(line) else {
            continue;
        };
        report.summary.references_checked += 1;

        if is_resolved(m.alias, tree, config) {
            continue;
        }

        let outcome = match find_replacement(m.alias, snapshot, tree, config) {
            Repair::Found(replacement) => {
                debug!(
                    path = %rel,
                    line = idx + 1,
                    alias = m.alias,
                    replacement = %replacement,
                    "repairable"
                );
                edits.push(SourceEdit {
                    line: idx,
                    span: m.span.clone(),
                    replacement: replacement.clone(),
                });
                RepairOutcome::Fixed { replacement }
            }
            Repair::NotFound(reason) => {
                debug!(
                    path = %rel,
                    line = idx + 1,
                    alias = m.alias,
                    reason = reason.token(),
                    "unresolved"
                );
                RepairOutcome::Unresolved { reason }
            }
        };

        report.references.push(BrokenReference {
            file: rel.to_path_buf(),
            line: idx as u64 + 1,
            alias: m.alias.to_string(),
            outcome,
        });
    }

    edits
}

/// Resolve a single alias and, when broken, decide its repair without touching any file.
pub fn lookup(
    alias: &str,
    tree: &dyn TreeView,
    config: &AliasConfig,
) -> anyhow::Result<AliasLookup> {
    let config = config
        .clone()
        .normalized()
        .context("invalid alias configuration")?;
    if is_resolved(alias, tree, &config) {
        return Ok(AliasLookup::Resolved);
    }

    let snapshot = walk(tree, &config).context("walk source root")?;
    let outcome = match find_replacement(alias, &snapshot, tree, &config) {
        Repair::Found(replacement) => RepairOutcome::Fixed { replacement },
        Repair::NotFound(reason) => RepairOutcome::Unresolved { reason },
    };
    Ok(AliasLookup::Broken { outcome })
}

/// Write the JSON report and/or markdown summary.
pub fn write_report_artifacts(
    outcome: &RunOutcome,
    report_path: Option<&Utf8Path>,
    markdown_path: Option<&Utf8Path>,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
        writer.write_file(path, json.as_bytes())?;
        debug!(path = %path, "wrote report");
    }

    if let Some(path) = markdown_path {
        let md = render_report_md(&outcome.report);
        writer.write_file(path, md.as_bytes())?;
        debug!(path = %path, "wrote markdown report");
    }

    Ok(())
}
