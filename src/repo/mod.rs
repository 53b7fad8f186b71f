//! Represents a git repository stored on the local file system.
//!
//! A repository is a working directory with a `.git` metadata directory
//! beneath it. The metadata directory holds the loose object store
//! (`objects/`), refs, and a `config` file.

mod config;
pub use config::Config;

mod error;
pub use error::{Error, Result};

pub mod on_disk;
pub use on_disk::{LsTreeOptions, OnDisk};
