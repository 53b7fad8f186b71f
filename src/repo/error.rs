use std::path::PathBuf;

use thiserror::Error;

use crate::object::{self, Id, Kind};

/// Describes the potential error conditions that might arise from repository operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    ObjectError(#[from] object::Error),

    /// A stored object file could not be inflated.
    #[error("object {id} is corrupt: {source}")]
    Undecompressable {
        id: Id,
        #[source]
        source: std::io::Error,
    },

    /// A stored object file inflated to something that isn't a valid object.
    #[error("object {id} is corrupt: {source}")]
    CorruptObject {
        id: Id,
        #[source]
        source: object::Error,
    },

    #[error("object {0} not found")]
    ObjectNotFound(Id),

    #[error("object {id} is a {actual}, not a {expected}")]
    KindMismatch { id: Id, expected: Kind, actual: Kind },

    /// No repository was found in the given directory or any of its parents.
    #[error("not a git repository (or any of the parent directories): {0}")]
    NotFound(PathBuf),

    #[error("work dir doesn't exist: {0}")]
    WorkDirDoesntExist(PathBuf),

    #[error("git dir doesn't exist: {0}")]
    GitDirDoesntExist(PathBuf),

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("{0} is not empty")]
    GitDirNotEmpty(PathBuf),

    #[error("configuration file missing: {0}")]
    MissingConfig(PathBuf),

    #[error("unsupported repositoryformatversion {0}")]
    UnsupportedFormatVersion(String),

    #[error("config line {line}: {reason}")]
    ConfigError { line: usize, reason: &'static str },
}

impl Error {
    /// Returns true if this error means stored data is damaged.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::Undecompressable { .. } | Error::CorruptObject { .. }
        )
    }

    /// Returns true if `init` refused to touch an existing path.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::NotADirectory(_) | Error::GitDirNotEmpty(_))
    }
}

/// A specialized `Result` type for repository operations.
pub type Result<T> = std::result::Result<T, Error>;
