use anyhow::Context;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Read-only view of a source tree. All paths are relative to [`TreeView::root`].
///
/// aliasfix-domain only talks to the tree through this trait so the resolver and repairer can be
/// exercised against [`MemoryTreeView`] as well as the filesystem.
pub trait TreeView {
    fn root(&self) -> &Utf8Path;

    fn is_file(&self, rel: &Utf8Path) -> bool;

    fn is_dir(&self, rel: &Utf8Path) -> bool;

    /// Immediate children of a directory, in no particular order.
    fn read_dir(&self, rel: &Utf8Path) -> anyhow::Result<Vec<TreeEntry>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// File-system backed `TreeView`.
#[derive(Debug, Clone)]
pub struct FsTreeView {
    root: Utf8PathBuf,
}

impl FsTreeView {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    /// `rel` joined under the root; `None` if it could reach outside it.
    fn abs(&self, rel: &Utf8Path) -> Option<Utf8PathBuf> {
        if !stays_under_root(rel) {
            debug!(path = %rel, "path leaves the source root");
            return None;
        }
        Some(self.root.join(rel))
    }
}

/// True for relative paths made only of normal segments (and `.`).
pub fn stays_under_root(rel: &Utf8Path) -> bool {
    rel.components()
        .all(|c| matches!(c, Utf8Component::Normal(_) | Utf8Component::CurDir))
}

impl TreeView for FsTreeView {
    fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn is_file(&self, rel: &Utf8Path) -> bool {
        self.abs(rel).is_some_and(|p| p.is_file())
    }

    fn is_dir(&self, rel: &Utf8Path) -> bool {
        self.abs(rel).is_some_and(|p| p.is_dir())
    }

    fn read_dir(&self, rel: &Utf8Path) -> anyhow::Result<Vec<TreeEntry>> {
        let Some(abs) = self.abs(rel) else {
            anyhow::bail!("{} is outside the source root", rel);
        };
        let mut out = Vec::new();
        for entry in fs::read_dir(&abs).with_context(|| format!("read dir {}", abs))? {
            let entry = entry.with_context(|| format!("read entry in {}", abs))?;
            let Ok(name) = entry.file_name().into_string() else {
                debug!(dir = %abs, "skipping non-UTF-8 entry");
                continue;
            };
            let file_type = entry
                .file_type()
                .with_context(|| format!("file type of {}/{}", abs, name))?;

            // Symlinked directories are not followed so the walk cannot cycle.
            let kind = if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
                EntryKind::File
            } else {
                debug!(dir = %abs, name = %name, "skipping special entry");
                continue;
            };
            out.push(TreeEntry { name, kind });
        }
        Ok(out)
    }
}

/// In-memory `TreeView` for embedding and testing.
///
/// Directories are implied by the file paths; empty directories can be added explicitly.
#[derive(Debug, Clone, Default)]
pub struct MemoryTreeView {
    root: Utf8PathBuf,
    files: BTreeSet<Utf8PathBuf>,
    dirs: BTreeSet<Utf8PathBuf>,
}

impl MemoryTreeView {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut view = Self {
            root: Utf8PathBuf::from("<memory>"),
            ..Self::default()
        };
        view.dirs.insert(Utf8PathBuf::new());
        for f in files {
            view.add_file(f.as_ref());
        }
        view
    }

    pub fn add_file(&mut self, rel: &str) {
        let path = Utf8PathBuf::from(rel.trim_matches('/'));
        let mut parent = path.parent();
        while let Some(p) = parent {
            self.dirs.insert(p.to_path_buf());
            parent = p.parent();
        }
        self.files.insert(path);
    }

    pub fn add_dir(&mut self, rel: &str) {
        let path = Utf8PathBuf::from(rel.trim_matches('/'));
        let mut cur = Some(path.as_path());
        while let Some(p) = cur {
            self.dirs.insert(p.to_path_buf());
            cur = p.parent();
        }
    }
}

impl TreeView for MemoryTreeView {
    fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn is_file(&self, rel: &Utf8Path) -> bool {
        self.files.contains(rel)
    }

    fn is_dir(&self, rel: &Utf8Path) -> bool {
        self.dirs.contains(rel)
    }

    fn read_dir(&self, rel: &Utf8Path) -> anyhow::Result<Vec<TreeEntry>> {
        if !self.is_dir(rel) {
            anyhow::bail!("not a directory: {}", rel);
        }

        let mut children: BTreeMap<String, EntryKind> = BTreeMap::new();
        let direct_child = |p: &Utf8Path| -> Option<String> {
            (p.parent() == Some(rel) && p != rel)
                .then(|| p.file_name().map(str::to_string))
                .flatten()
        };
        for f in &self.files {
            if let Some(name) = direct_child(f) {
                children.insert(name, EntryKind::File);
            }
        }
        for d in &self.dirs {
            if let Some(name) = direct_child(d) {
                children.insert(name, EntryKind::Dir);
            }
        }

        Ok(children
            .into_iter()
            .map(|(name, kind)| TreeEntry { name, kind })
            .collect())
    }
}
