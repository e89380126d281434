use crate::config::AliasConfig;
use crate::ports::{EntryKind, TreeView};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Every file and directory under the source root, captured once per pass.
///
/// Repair lookups read only from the snapshot, so rewrites made later in the pass never change
/// which candidates exist.
#[derive(Debug, Clone, Default)]
pub struct TreeSnapshot {
    /// Files in walk order: lexical within a directory, parents before children.
    files: Vec<Utf8PathBuf>,
    file_set: BTreeSet<Utf8PathBuf>,
    dirs: Vec<Utf8PathBuf>,
    /// Directories that could not be listed; the walk went on without them.
    unreadable: Vec<(Utf8PathBuf, String)>,
}

impl TreeSnapshot {
    pub fn files(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    pub fn dirs(&self) -> &[Utf8PathBuf] {
        &self.dirs
    }

    pub fn has_file(&self, rel: &Utf8Path) -> bool {
        self.file_set.contains(rel)
    }

    pub fn unreadable_dirs(&self) -> &[(Utf8PathBuf, String)] {
        &self.unreadable
    }

    /// Files whose extension is a configured source extension, in walk order.
    pub fn source_files<'a>(
        &'a self,
        config: &'a AliasConfig,
    ) -> impl Iterator<Item = &'a Utf8PathBuf> + 'a {
        self.files
            .iter()
            .filter(|p| p.file_name().is_some_and(|n| config.is_source_file(n)))
    }
}

/// Walk the tree with an explicit stack (no recursion), skipping excluded directory names.
///
/// Fails only if the root itself cannot be listed.
pub fn walk(view: &dyn TreeView, config: &AliasConfig) -> anyhow::Result<TreeSnapshot> {
    let mut snapshot = TreeSnapshot::default();
    let mut stack: Vec<Utf8PathBuf> = vec![Utf8PathBuf::new()];

    while let Some(dir) = stack.pop() {
        let mut entries = match view.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir.as_str().is_empty() => return Err(err),
            Err(err) => {
                warn!(dir = %dir, error = %err, "skipping unreadable directory");
                snapshot.unreadable.push((dir, format!("{err:#}")));
                continue;
            }
        };
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let mut subdirs = Vec::new();
        for entry in entries {
            let rel = join_rel(&dir, &entry.name);
            match entry.kind {
                EntryKind::File => {
                    snapshot.file_set.insert(rel.clone());
                    snapshot.files.push(rel);
                }
                EntryKind::Dir if config.is_excluded_dir(&entry.name) => {
                    debug!(dir = %rel, "excluded directory");
                }
                EntryKind::Dir => {
                    snapshot.dirs.push(rel.clone());
                    subdirs.push(rel);
                }
            }
        }
        // Reversed so the lexically first subdirectory is visited next.
        stack.extend(subdirs.into_iter().rev());
    }

    debug!(
        files = snapshot.files.len(),
        dirs = snapshot.dirs.len(),
        "tree snapshot taken"
    );
    Ok(snapshot)
}

/// Join with `/` regardless of host conventions.
fn join_rel(dir: &Utf8Path, name: &str) -> Utf8PathBuf {
    if dir.as_str().is_empty() {
        Utf8PathBuf::from(name)
    } else {
        Utf8PathBuf::from(format!("{}/{}", dir, name))
    }
}

/// Split a file name into stem and final extension (with the dot).
///
/// Leading dots belong to the stem: `.eslintrc` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(i) => name.split_at(leading + i),
        None => (name, ""),
    }
}
