use crate::ToolInfo;
use crate::reference::BrokenReference;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasfixReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub mode: PassMode,
    pub source_root: String,
    pub summary: ReportSummary,

    #[serde(default)]
    pub references: Vec<BrokenReference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileChange>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FileFailure>,
}

impl AliasfixReport {
    pub fn new(tool: ToolInfo, mode: PassMode, source_root: impl Into<String>) -> Self {
        Self {
            schema: crate::schema::ALIASFIX_REPORT_V1.to_string(),
            tool,
            run: RunInfo {
                started_at: Utc::now(),
                ended_at: None,
            },
            mode,
            source_root: source_root.into(),
            summary: ReportSummary::default(),
            references: vec![],
            files: vec![],
            failures: vec![],
        }
    }

    /// Recompute the summary counters from the collected entries.
    ///
    /// `files_scanned` and `references_checked` are tallied by the caller during the walk.
    pub fn finish(&mut self) {
        self.summary.broken = self.references.len() as u64;
        self.summary.fixed = self.references.iter().filter(|r| r.is_fixed()).count() as u64;
        self.summary.unresolved = self.summary.broken - self.summary.fixed;
        self.summary.files_modified = self.files.iter().filter(|f| f.written).count() as u64;
        self.summary.files_failed = self.failures.len() as u64;
        self.run.ended_at = Some(Utc::now());
    }

    pub fn status(&self) -> ReportStatus {
        let s = &self.summary;
        if s.unresolved > 0 || s.files_failed > 0 {
            ReportStatus::Fail
        } else if s.broken > 0 {
            ReportStatus::Warn
        } else {
            ReportStatus::Pass
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Whether repaired content is written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassMode {
    /// Detect and plan repairs without touching the tree.
    #[default]
    Check,
    /// Detect and write repairs back to disk.
    Fix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub files_scanned: u64,
    pub references_checked: u64,
    pub broken: u64,
    pub fixed: u64,
    pub unresolved: u64,
    pub files_modified: u64,
    pub files_failed: u64,
}

/// A source file whose content the repair pass changed (or would change in check mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub sha256_before: String,
    pub sha256_after: String,
    pub references_fixed: u64,

    /// False in check mode.
    pub written: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: String,
    pub stage: FailureStage,
    pub message: String,
    /// How many broken references had been recorded when the failure happened.
    #[serde(default)]
    pub after_references: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Read,
    Write,
}
