//! Domain logic: decide whether alias references resolve and what they should be repaired to.
//!
//! This crate owns *what* is broken and *what* it should become. It does not own *how* files are
//! rewritten; that's the `aliasfix-edit` crate.

mod config;
mod ports;
mod repair;
mod resolve;
mod scan;
mod walk;

pub use config::{AliasConfig, ConfigError};
pub use ports::{EntryKind, FsTreeView, MemoryTreeView, TreeEntry, TreeView};
pub use repair::{Repair, find_replacement};
pub use resolve::{Resolution, is_resolved, resolve};
pub use scan::{AliasMatch, ImportScanner};
pub use walk::{TreeSnapshot, split_extension, walk};
