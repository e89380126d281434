//! Edit engine for aliasfix repairs.
//!
//! Responsibilities:
//! - Replace alias spans inside lines while keeping every other byte (line endings included).
//! - Replace files atomically (temp file in the same directory, then rename), guarded by a
//!   sha256 precondition on the content that was read.
//! - Generate a unified diff preview.

mod error;

pub use error::{EditError, EditResult};

use aliasfix_types::report::FileChange;
use camino::{Utf8Path, Utf8PathBuf};
use diffy::PatchFormatter;
use fs_err as fs;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::ops::Range;
use tracing::debug;

/// Replace `span` of line `line` (0-based) with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEdit {
    pub line: usize,
    pub span: Range<usize>,
    pub replacement: String,
}

/// Split into lines, each keeping its own terminator.
pub fn split_lines(contents: &str) -> Vec<&str> {
    contents.split_inclusive('\n').collect()
}

/// Apply edits to `contents`. Lines without an edit are copied byte for byte.
///
/// Edits on the same line are applied right to left so earlier spans stay valid. Edits whose
/// span falls outside its line, or off a char boundary, are ignored.
pub fn apply_edits(contents: &str, edits: &[SourceEdit]) -> String {
    if edits.is_empty() {
        return contents.to_string();
    }

    let mut sorted: Vec<&SourceEdit> = edits.iter().collect();
    sorted.sort_by(|a, b| (a.line, a.span.start).cmp(&(b.line, b.span.start)));

    let mut out = String::with_capacity(contents.len());
    for (idx, line) in split_lines(contents).into_iter().enumerate() {
        let mut new_line = line.to_string();
        for edit in sorted.iter().rev().filter(|e| e.line == idx) {
            if new_line.get(edit.span.clone()).is_none() {
                debug!(line = idx + 1, span = ?edit.span, "edit span out of range; skipped");
                continue;
            }
            new_line.replace_range(edit.span.clone(), &edit.replacement);
        }
        out.push_str(&new_line);
    }
    out
}

/// Old and new content of one file. `path` is relative to the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRewrite {
    pub path: Utf8PathBuf,
    pub before: String,
    pub after: String,
    pub references_fixed: u64,
}

impl FileRewrite {
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }

    pub fn file_change(&self, written: bool) -> FileChange {
        FileChange {
            path: self.path.to_string(),
            sha256_before: sha256_hex(self.before.as_bytes()),
            sha256_after: sha256_hex(self.after.as_bytes()),
            references_fixed: self.references_fixed,
            written,
        }
    }
}

/// Write `rewrite.after` over `<root>/<rewrite.path>` if the file still holds `rewrite.before`.
pub fn apply_rewrite(root: &Utf8Path, rewrite: &FileRewrite) -> EditResult<()> {
    let abs = abs_path(root, &rewrite.path);
    let expected = sha256_hex(rewrite.before.as_bytes());
    replace_file(&abs, rewrite.after.as_bytes(), Some(&expected))
}

/// Atomically replace `path` with `contents`.
///
/// The new content goes to a temporary file next to `path`, is synced, then renamed over it.
/// On any error the original file is left as it was. When `expected_sha256` is given, the
/// current content must hash to it or nothing is written.
pub fn replace_file(
    path: &Utf8Path,
    contents: &[u8],
    expected_sha256: Option<&str>,
) -> EditResult<()> {
    if let Some(expected) = expected_sha256 {
        let current = fs::read(path).map_err(|source| io_error(path, source))?;
        let actual = sha256_hex(&current);
        if actual != expected {
            return Err(EditError::PreconditionMismatch {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                actual,
            });
        }
    }

    let dir = match path.parent() {
        Some(p) if !p.as_str().is_empty() => p,
        _ => Utf8Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".aliasfix-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| io_error(dir, source))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|source| io_error(path, source))?;

    // Keep the original mode bits on the replacement.
    if let Ok(meta) = fs::metadata(path)
        && let Err(err) = fs::set_permissions(tmp.path(), meta.permissions())
    {
        debug!(path = %path, error = %err, "could not copy permissions");
    }

    tmp.persist(path).map_err(|e| EditError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    debug!(path = %path, bytes = contents.len(), "replaced file");
    Ok(())
}

fn io_error(path: &Utf8Path, source: std::io::Error) -> EditError {
    EditError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn abs_path(root: &Utf8Path, rel: &Utf8Path) -> Utf8PathBuf {
    if rel.is_absolute() {
        rel.to_path_buf()
    } else {
        root.join(rel)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Unified diff of every rewrite that changes content, in the given order.
pub fn render_patch(rewrites: &[FileRewrite]) -> String {
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    for rewrite in rewrites {
        if rewrite.is_noop() {
            continue;
        }

        out.push_str(&format!("diff --git a/{0} b/{0}\n", rewrite.path));
        out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", rewrite.path));

        let patch = diffy::create_patch(&rewrite.before, &rewrite.after);
        let body = formatter.fmt_patch(&patch).to_string();
        // diffy repeats its own ---/+++ header; the git-style header above replaces it.
        let hunks = body
            .split_once("\n@@")
            .map(|(_, rest)| format!("@@{rest}"))
            .unwrap_or(body);
        out.push_str(&hunks);
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}
