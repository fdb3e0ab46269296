//! Error types for the savit storage engine
//!
//! The core reports typed errors and leaves presentation to the caller. The
//! CLI wraps them in `anyhow` with additional context.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SavitError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("I/O failure at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt data in {what}: {reason}")]
    CorruptData { what: String, reason: String },

    #[error("hash mismatch for {path:?}: tracked {expected}, found {actual}")]
    ValidationFailure {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("nothing to commit, working snapshot matches the parent commit")]
    NothingToCommit,

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid content hash: {0}")]
    InvalidHash(String),

    #[error("not a savit repository (missing {0:?})")]
    NotInitialized(PathBuf),

    #[error("path {0:?} is outside of the working directory")]
    OutsideWorkspace(PathBuf),

    #[error("path {0:?} is not valid UTF-8")]
    InvalidPath(PathBuf),
}

impl SavitError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SavitError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(what: impl Into<String>, reason: impl ToString) -> Self {
        SavitError::CorruptData {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            SavitError::NotFound(_) => true,
            SavitError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SavitError>;

/// Attach a path to a raw `std::io::Result`
pub trait IoContext<T> {
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| SavitError::io(path, source))
    }
}
