//! Fatal error types for a tloc run.
//!
//! Per-file read failures are not represented here: they degrade to an
//! "Unsupported File" row and the run continues.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TlocError {
    #[error("no files found in {0}")]
    NoFilesFound(PathBuf),

    #[error("invalid language table: {0}")]
    LanguageTable(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Map an error to its process exit code.
pub fn exit_code(error: &TlocError) -> i32 {
    match error {
        TlocError::Io(_) => 1,
        TlocError::NoFilesFound(_) => 2,
        TlocError::LanguageTable(_) => 3,
    }
}
