//! A content-addressable object store using git's loose object format.
//!
//! Objects are stored as zlib-compressed `"<type> <size>\0<payload>"` byte
//! sequences under a path derived from the SHA-1 digest of those bytes.
//! The [`object`] module owns the canonical encoding; the [`repo`] module
//! locates repositories on disk and reads and writes objects there.

pub mod object;
pub mod repo;
