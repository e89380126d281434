//! Default filesystem-backed port implementations, plus an in-memory source store for embedding
//! and tests.

use crate::ports::{SourcePort, WritePort};
use aliasfix_domain::MemoryTreeView;
use aliasfix_edit::{EditError, EditResult, FileRewrite, apply_rewrite, sha256_hex};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// Sources read from and atomically written under `root`.
#[derive(Debug, Clone)]
pub struct FsSourcePort {
    pub root: Utf8PathBuf,
}

impl FsSourcePort {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }
}

impl SourcePort for FsSourcePort {
    fn read_source(&self, rel: &Utf8Path) -> std::io::Result<Vec<u8>> {
        fs::read(self.root.join(rel))
    }

    fn write_source(&self, rewrite: &FileRewrite) -> EditResult<()> {
        apply_rewrite(&self.root, rewrite)
    }
}

/// Source files held in memory.
///
/// Writes honour the same before-content precondition as [`FsSourcePort`]. Paths registered with
/// [`fail_writes_to`](Self::fail_writes_to) reject every write, which lets callers exercise the
/// per-file failure path.
#[derive(Debug, Default)]
pub struct MemorySourcePort {
    files: RefCell<BTreeMap<Utf8PathBuf, Vec<u8>>>,
    failing: BTreeSet<Utf8PathBuf>,
}

impl MemorySourcePort {
    pub fn new<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<Utf8PathBuf>,
        C: Into<Vec<u8>>,
    {
        Self {
            files: RefCell::new(
                files
                    .into_iter()
                    .map(|(p, c)| (p.into(), c.into()))
                    .collect(),
            ),
            failing: BTreeSet::new(),
        }
    }

    pub fn fail_writes_to(mut self, rel: impl Into<Utf8PathBuf>) -> Self {
        self.failing.insert(rel.into());
        self
    }

    /// A tree view over the paths currently held.
    pub fn tree_view(&self) -> MemoryTreeView {
        MemoryTreeView::new(self.files.borrow().keys().map(|p| p.as_str().to_string()))
    }

    pub fn contents(&self, rel: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(Utf8Path::new(rel)).cloned()
    }
}

impl SourcePort for MemorySourcePort {
    fn read_source(&self, rel: &Utf8Path) -> std::io::Result<Vec<u8>> {
        self.files.borrow().get(rel).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, format!("no such file: {rel}"))
        })
    }

    fn write_source(&self, rewrite: &FileRewrite) -> EditResult<()> {
        if self.failing.contains(&rewrite.path) {
            return Err(EditError::Persist {
                path: rewrite.path.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "write rejected",
                ),
            });
        }

        let mut files = self.files.borrow_mut();
        let Some(current) = files.get_mut(&rewrite.path) else {
            return Err(EditError::Io {
                path: rewrite.path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        };
        let expected = sha256_hex(rewrite.before.as_bytes());
        let actual = sha256_hex(current);
        if actual != expected {
            return Err(EditError::PreconditionMismatch {
                path: rewrite.path.clone(),
                expected,
                actual,
            });
        }
        *current = rewrite.after.clone().into_bytes();
        Ok(())
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }
}
