//! Embeddable core library for aliasfix.
//!
//! Provides a clap-free entry point for running a check or fix pass over a source tree.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits:
//! - [`TreeView`] (from aliasfix-domain): list and query the source tree
//! - [`SourcePort`](ports::SourcePort): read source files and write rewrites back
//! - [`WritePort`](ports::WritePort): write report artifacts
//!
//! The [`adapters`] module provides filesystem-backed and in-memory implementations.
//!
//! # Entry points
//!
//! - [`run`](pipeline::run) / [`run_fs`](pipeline::run_fs): one full pass, returning the report
//! - [`lookup`](pipeline::lookup): resolve or repair a single alias

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-exported so embedders don't need aliasfix-domain directly.
pub use aliasfix_domain::{AliasConfig, FsTreeView, MemoryTreeView, TreeView};
