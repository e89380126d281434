//! Shared DTOs (schemas-as-code) for the aliasfix workspace.
//!
//! # Design constraints
//! - These types are serialized to disk as report artifacts.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod reference;
pub mod report;

use serde::{Deserialize, Serialize};

/// Schema identifiers.
pub mod schema {
    pub const ALIASFIX_REPORT_V1: &str = "aliasfix.report.v1";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}
