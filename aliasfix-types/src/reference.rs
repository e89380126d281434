use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// An alias reference that did not resolve, plus what the repair pass did about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenReference {
    /// Source file containing the reference, relative to the source root.
    pub file: Utf8PathBuf,

    /// 1-based line number.
    pub line: u64,

    pub alias: String,

    pub outcome: RepairOutcome,
}

impl BrokenReference {
    pub fn is_fixed(&self) -> bool {
        matches!(self.outcome, RepairOutcome::Fixed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RepairOutcome {
    Fixed { replacement: String },
    Unresolved { reason: UnresolvedReason },
}

/// Why a broken reference was left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No file or directory in the tree carries the alias base name.
    NoCandidate,

    /// More than one entry carries the base name; a human has to choose. Holds the
    /// root-relative paths of those entries.
    Ambiguous { candidates: Vec<String> },

    /// The alias has an empty base name (e.g. ends with `/`).
    MalformedAlias,
}

impl UnresolvedReason {
    pub fn token(&self) -> &'static str {
        match self {
            UnresolvedReason::NoCandidate => "no_candidate",
            UnresolvedReason::Ambiguous { .. } => "ambiguous",
            UnresolvedReason::MalformedAlias => "malformed_alias",
        }
    }
}

/// Answer to a single alias lookup outside a full pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AliasLookup {
    Resolved,
    Broken { outcome: RepairOutcome },
}
