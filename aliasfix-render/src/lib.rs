//! Rendering helpers for human-readable output: the console trail and a markdown report.

use aliasfix_types::reference::{AliasLookup, BrokenReference, RepairOutcome, UnresolvedReason};
use aliasfix_types::report::{
    AliasfixReport, FailureStage, FileFailure, PassMode, ReportStatus,
};
use camino::Utf8Path;

/// The line-oriented diagnostic trail, in the order references were found.
///
/// ```text
/// broken found @/formatCurrency in src/pages/Cart.tsx
///   fixed -> @/shared/helpers/formatCurrency
/// broken found @/types/onboardingTypes in src/pages/Welcome.tsx
///   could not fix automatically
/// ```
///
/// Read and write failures appear where they happened, so an `error writing` line follows the
/// `fixed ->` lines that never reached disk.
pub fn render_trail(report: &AliasfixReport) -> String {
    let mut out = String::new();
    let root = Utf8Path::new(&report.source_root);
    let mut failures = report.failures.iter().peekable();

    for (i, r) in report.references.iter().enumerate() {
        while let Some(f) = failures.next_if(|f| f.after_references <= i) {
            push_failure(&mut out, root, f);
        }
        out.push_str(&format!("broken found {} in {}\n", r.alias, root.join(&r.file)));
        match &r.outcome {
            RepairOutcome::Fixed { replacement } => {
                out.push_str(&format!("  fixed -> {}\n", replacement));
            }
            RepairOutcome::Unresolved { .. } => {
                out.push_str("  could not fix automatically\n");
            }
        }
    }

    for f in failures {
        push_failure(&mut out, root, f);
    }

    out
}

fn push_failure(out: &mut String, root: &Utf8Path, f: &FileFailure) {
    out.push_str(&format!(
        "error {} {}: {}\n",
        stage_label(f.stage),
        root.join(&f.path),
        f.message
    ));
}

/// One-line tally for the end of a run.
pub fn render_summary_line(report: &AliasfixReport) -> String {
    let s = &report.summary;
    let modified = match report.mode {
        PassMode::Fix => format!("{} files modified", s.files_modified),
        PassMode::Check => format!("{} files would change", report.files.len()),
    };
    format!(
        "{} files scanned, {} broken, {} fixed, {} unresolved, {}, {} failed",
        s.files_scanned, s.broken, s.fixed, s.unresolved, modified, s.files_failed
    )
}

/// Text answer for `aliasfix resolve <alias>`.
pub fn render_lookup(alias: &str, lookup: &AliasLookup) -> String {
    match lookup {
        AliasLookup::Resolved => format!("{} resolves\n", alias),
        AliasLookup::Broken {
            outcome: RepairOutcome::Fixed { replacement },
        } => format!("{} is broken\n  fixed -> {}\n", alias, replacement),
        AliasLookup::Broken {
            outcome: RepairOutcome::Unresolved { reason },
        } => {
            let mut out = format!("{} is broken\n  could not fix automatically\n", alias);
            match reason {
                UnresolvedReason::NoCandidate => out.push_str("  no candidate found\n"),
                UnresolvedReason::MalformedAlias => out.push_str("  alias has no base name\n"),
                UnresolvedReason::Ambiguous { candidates } => {
                    out.push_str("  ambiguous between:\n");
                    for c in candidates {
                        out.push_str(&format!("    {}\n", c));
                    }
                }
            }
            out
        }
    }
}

pub fn render_report_md(report: &AliasfixReport) -> String {
    let s = &report.summary;
    let mut out = String::new();
    out.push_str("# aliasfix report\n\n");
    out.push_str(&format!("- Mode: `{}`\n", mode_label(report.mode)));
    out.push_str(&format!("- Status: `{}`\n", status_label(report.status())));
    out.push_str(&format!("- Source root: `{}`\n", report.source_root));
    out.push_str(&format!(
        "- Files scanned: {}\n- References checked: {}\n- Broken: {}\n- Fixed: {}\n- Unresolved: {}\n- Files modified: {}\n- Files failed: {}\n\n",
        s.files_scanned,
        s.references_checked,
        s.broken,
        s.fixed,
        s.unresolved,
        s.files_modified,
        s.files_failed
    ));

    out.push_str("## Broken references\n\n");
    if report.references.is_empty() {
        out.push_str("_No broken references._\n");
    } else {
        for (i, r) in report.references.iter().enumerate() {
            render_reference_md(&mut out, i + 1, r);
        }
    }

    if !report.files.is_empty() {
        out.push_str("\n## Files\n\n");
        for fc in &report.files {
            out.push_str(&format!(
                "- `{}` {} → {} ({} fixed{})\n",
                fc.path,
                short_sha(&fc.sha256_before),
                short_sha(&fc.sha256_after),
                fc.references_fixed,
                if fc.written { "" } else { ", not written" }
            ));
        }
    }

    if !report.failures.is_empty() {
        out.push_str("\n## Failures\n\n");
        for f in &report.failures {
            out.push_str(&format!(
                "- `{}` ({}): {}\n",
                f.path,
                stage_label(f.stage),
                f.message
            ));
        }
    }

    out
}

fn render_reference_md(out: &mut String, n: usize, r: &BrokenReference) {
    out.push_str(&format!("### {}. `{}`\n\n", n, r.alias));
    out.push_str(&format!("- Location: `{}:{}`\n", r.file, r.line));
    match &r.outcome {
        RepairOutcome::Fixed { replacement } => {
            out.push_str(&format!("- Fixed: `{}`\n", replacement));
        }
        RepairOutcome::Unresolved { reason } => {
            out.push_str(&format!("- Unresolved: `{}`\n", reason.token()));
            if let UnresolvedReason::Ambiguous { candidates } = reason {
                out.push_str("\n**Candidates**\n\n");
                for c in candidates {
                    out.push_str(&format!("- `{}`\n", c));
                }
            }
        }
    }
    out.push('\n');
}

fn short_sha(sha: &str) -> &str {
    sha.get(..12).unwrap_or(sha)
}

fn mode_label(m: PassMode) -> &'static str {
    match m {
        PassMode::Check => "check",
        PassMode::Fix => "fix",
    }
}

fn status_label(s: ReportStatus) -> &'static str {
    match s {
        ReportStatus::Pass => "pass",
        ReportStatus::Warn => "warn",
        ReportStatus::Fail => "fail",
    }
}

fn stage_label(s: FailureStage) -> &'static str {
    match s {
        FailureStage::Read => "reading",
        FailureStage::Write => "writing",
    }
}
