//! Configuration errors raised while discovering and loading goal files.
//!
//! Container run failures are not errors: they are reported as
//! [`ExecutionResult`](crate::core::types::ExecutionResult) values.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// More than one candidate goal file exists at the project root.
    #[error("ambiguous configuration: multiple goal files present")]
    Ambiguous { files: Vec<PathBuf> },

    /// A goal record failed validation. `offender` is the record as JSON.
    #[error(
        "invalid container goal supplied (entry {index}: {}). Offender => {offender}",
        .problems.join("; ")
    )]
    InvalidRecord {
        index: usize,
        offender: String,
        problems: Vec<String>,
    },

    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("parse {}: {source}", .path.display())]
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The document parsed but is not a sequence of goal records.
    #[error("{}: expected a sequence of goal definitions, found {found}", .path.display())]
    NotASequence { path: PathBuf, found: &'static str },

    /// The embedded goal schema could not be compiled.
    #[error("goal schema: {0}")]
    Schema(String),
}
