//! Port traits abstracting file I/O away from the pipeline.

use aliasfix_edit::{EditResult, FileRewrite};
use camino::Utf8Path;

/// Source file contents, addressed relative to the source root.
pub trait SourcePort {
    fn read_source(&self, rel: &Utf8Path) -> std::io::Result<Vec<u8>>;

    /// Replace a file with `rewrite.after`, provided it still holds `rewrite.before`.
    fn write_source(&self, rewrite: &FileRewrite) -> EditResult<()>;
}

/// Report artifact output. Implementations create missing parent directories.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
}
