use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error taxonomy for one analysis run.
///
/// Only `FatalConfig` aborts a run, and even that is converted into a report
/// with the `error` field populated — `analyze` never returns `Err`. Every
/// other variant is contained at the scope of one file or one registry entry
/// and surfaced through the report's `skipped_items` list.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("cannot access {path}: {reason}")]
    FileAccess { path: PathBuf, reason: String },

    #[error("cannot parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("invalid registry entry '{id}': {reason}")]
    Registry { id: String, reason: String },

    #[error("enhancement call failed: {0}")]
    Enhancement(String),

    #[error("invalid project root {path}: {reason}")]
    FatalConfig { path: PathBuf, reason: String },
}

impl AnalyzerError {
    /// Convert a contained error into a report metadata record.
    pub fn to_skipped(&self) -> SkippedItem {
        let kind = match self {
            AnalyzerError::FileAccess { .. } => "file_access",
            AnalyzerError::Parse { .. } => "parse_failure",
            AnalyzerError::Registry { .. } => "registry",
            AnalyzerError::Enhancement(_) => "enhancement",
            AnalyzerError::FatalConfig { .. } => "fatal_config",
        };
        SkippedItem {
            kind: kind.to_string(),
            reason: self.to_string(),
        }
    }
}

/// One item the run skipped instead of failing on, kept in report metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub kind: String,
    pub reason: String,
}
