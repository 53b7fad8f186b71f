use std::io;

use thiserror::Error;

use super::Kind;

/// Describes the ways in which an object's canonical encoding can be
/// rejected.
///
/// Use [`Error::is_format_error`] and [`Error::is_unsupported`] to tell
/// corrupt data apart from object types this crate doesn't implement.
#[derive(Debug, Error)]
pub enum Error {
    /// No space separates the type tag from the size field.
    #[error("object header has no space after the type")]
    MissingSpace,

    /// No NUL terminates the size field.
    #[error("object header has no NUL after the size")]
    MissingNul,

    /// The size field is not a canonical non-negative decimal integer.
    #[error("object size `{0}` is not a decimal integer")]
    InvalidSize(String),

    /// The size field disagrees with the number of payload bytes.
    #[error("object declares {declared} bytes of content but has {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    /// The type tag is not one of `blob`, `tree`, `commit`, or `tag`.
    #[error("unknown object type `{0}`")]
    UnknownKind(String),

    /// The type tag is recognized but can't be decoded by this crate.
    #[error("{0} objects are not supported")]
    UnsupportedKind(Kind),

    /// A tree entry ends before its 20-byte object ID.
    #[error("tree entry at offset {offset} is truncated")]
    TruncatedTreeEntry { offset: usize },

    /// A tree entry's mode is not a recognized 5- or 6-digit octal mode.
    #[error("tree entry at offset {offset} has invalid mode `{mode}`")]
    InvalidMode { offset: usize, mode: String },

    /// A tree entry could not be parsed for some other reason.
    #[error("tree entry at offset {offset} is malformed: {reason}")]
    MalformedTreeEntry { offset: usize, reason: &'static str },

    /// A tree entry was constructed with a name that isn't a single path segment.
    #[error("`{0}` is not a valid tree entry name")]
    InvalidFilename(String),

    #[error(transparent)]
    IoError(#[from] io::Error),
}

impl Error {
    /// Returns true if this error indicates corrupt or malformed object data.
    pub fn is_format_error(&self) -> bool {
        !matches!(
            self,
            Error::UnknownKind(_)
                | Error::UnsupportedKind(_)
                | Error::InvalidFilename(_)
                | Error::IoError(_)
        )
    }

    /// Returns true if the data was well-formed but names an object type
    /// this crate can't construct.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::UnknownKind(_) | Error::UnsupportedKind(_))
    }
}

/// A specialized `Result` type for object encoding and decoding.
pub type Result<T> = std::result::Result<T, Error>;
