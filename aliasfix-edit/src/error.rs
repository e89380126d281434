//! Error types for aliasfix-edit.
//!
//! Every variant is scoped to a single file; callers record it and move on to the next file.

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("io error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file changed between being read and being rewritten.
    #[error("precondition mismatch on {path}: expected sha256 {expected}, found {actual}")]
    PreconditionMismatch {
        path: Utf8PathBuf,
        expected: String,
        actual: String,
    },

    /// The temporary file could not be moved over the target; the target is untouched.
    #[error("could not replace {path}: {source}")]
    Persist {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EditError {
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            EditError::Io { path, .. }
            | EditError::PreconditionMismatch { path, .. }
            | EditError::Persist { path, .. } => path,
        }
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, EditError::PreconditionMismatch { .. })
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;
