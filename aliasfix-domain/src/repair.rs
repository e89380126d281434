use crate::config::AliasConfig;
use crate::ports::TreeView;
use crate::resolve::{has_index_file, is_resolved};
use crate::walk::{TreeSnapshot, split_extension};
use aliasfix_types::reference::UnresolvedReason;
use camino::Utf8Path;
use tracing::debug;

/// Result of a repair lookup for one unresolved alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    /// The single candidate; it passes the same resolver check as the alias it replaces.
    Found(String),
    NotFound(UnresolvedReason),
}

/// Propose a replacement for an alias that failed to resolve.
///
/// Candidates are looked up by base name in `snapshot`:
/// 1. every file whose name without its final extension is `<base>`, whatever the extension;
/// 2. only if there are none, directories named `<base>` that contain an index file.
///
/// Exactly one candidate in the active tier is a repair, and only if it resolves. Zero or
/// several is not. `lib/api.ts` next to `lib/api.tsx` counts as two.
pub fn find_replacement(
    alias: &str,
    snapshot: &TreeSnapshot,
    view: &dyn TreeView,
    config: &AliasConfig,
) -> Repair {
    let Some(base) = base_name(alias, config) else {
        return Repair::NotFound(UnresolvedReason::MalformedAlias);
    };

    let mut tier = file_candidates(base, snapshot);
    if tier.is_empty() {
        tier = dir_candidates(base, snapshot, config);
    }

    match tier.as_slice() {
        [] => Repair::NotFound(UnresolvedReason::NoCandidate),
        [only] => {
            let candidate = config.to_alias(&only.alias_path);
            if is_resolved(&candidate, view, config) {
                debug!(alias, candidate = %candidate, "unique candidate");
                Repair::Found(candidate)
            } else {
                debug!(alias, candidate = %candidate, "candidate does not resolve; dropped");
                Repair::NotFound(UnresolvedReason::NoCandidate)
            }
        }
        _ => {
            let mut candidates: Vec<String> = tier.iter().map(|c| c.found_at.clone()).collect();
            candidates.sort();
            debug!(alias, count = candidates.len(), "ambiguous candidates");
            Repair::NotFound(UnresolvedReason::Ambiguous { candidates })
        }
    }
}

/// A tree entry carrying the base name.
struct Candidate {
    /// Root-relative path the alias would name (no extension for files).
    alias_path: String,
    /// Root-relative path of the entry itself.
    found_at: String,
}

/// Final `/` segment after the marker; `None` when empty.
fn base_name<'a>(alias: &'a str, config: &AliasConfig) -> Option<&'a str> {
    let relative = config.strip_marker(alias)?;
    let base = relative.rsplit('/').next().unwrap_or(relative);
    (!base.is_empty()).then_some(base)
}

fn file_candidates(base: &str, snapshot: &TreeSnapshot) -> Vec<Candidate> {
    snapshot
        .files()
        .iter()
        .filter_map(|file| {
            let (stem, _) = split_extension(file.file_name()?);
            (stem == base).then(|| Candidate {
                alias_path: join_parent(file.parent(), stem),
                found_at: file.as_str().to_string(),
            })
        })
        .collect()
}

fn dir_candidates(base: &str, snapshot: &TreeSnapshot, config: &AliasConfig) -> Vec<Candidate> {
    snapshot
        .dirs()
        .iter()
        .filter(|dir| dir.file_name() == Some(base))
        .filter(|dir| has_index_file(&SnapshotFiles(snapshot), dir, config))
        .map(|dir| Candidate {
            alias_path: dir.as_str().to_string(),
            found_at: dir.as_str().to_string(),
        })
        .collect()
}

fn join_parent(parent: Option<&Utf8Path>, stem: &str) -> String {
    match parent {
        Some(p) if !p.as_str().is_empty() => format!("{}/{}", p, stem),
        _ => stem.to_string(),
    }
}

/// Index checks against the snapshot rather than the live tree.
struct SnapshotFiles<'a>(&'a TreeSnapshot);

impl TreeView for SnapshotFiles<'_> {
    fn root(&self) -> &Utf8Path {
        Utf8Path::new("")
    }

    fn is_file(&self, rel: &Utf8Path) -> bool {
        self.0.has_file(rel)
    }

    fn is_dir(&self, rel: &Utf8Path) -> bool {
        self.0.dirs().iter().any(|d| d.as_path() == rel)
    }

    fn read_dir(&self, rel: &Utf8Path) -> anyhow::Result<Vec<crate::TreeEntry>> {
        anyhow::bail!("snapshot view cannot list {}", rel)
    }
}
