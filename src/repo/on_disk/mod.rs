//! A repository that stores content on the local file system.
//!
//! **IMPORTANT NOTE:** This is intended as a reference implementation largely
//! for testing purposes and may not necessarily handle all of the edge cases that
//! the traditional `git` command-line interface will handle.
//!
//! That said, it does intentionally use the same `.git` folder format as
//! command-line git so that results may be compared for similar operations.
//!
//! Writers are not coordinated: callers that share a repository across
//! threads or processes must serialize writes themselves.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use super::{Config, Error, Result};
use crate::object::{codec, Id, Kind, Object, ObjectBytes};

/// Name of the metadata directory found directly beneath the working directory.
pub const GIT_DIR_NAME: &str = ".git";

/// Branch that `HEAD` refers to in a new repository.
pub const DEFAULT_BRANCH: &str = "master";

/// Implementation of a git repository that stores content on the local file system.
///
/// _IMPORTANT NOTE:_ This is intended as a reference implementation largely
/// for testing purposes and may not necessarily handle all of the edge cases that
/// the traditional `git` command-line interface will handle.
#[derive(Debug)]
pub struct OnDisk {
    work_dir: PathBuf,
    git_dir: PathBuf,
    config: Config,
}

/// Options for [`OnDisk::ls_tree`], mirroring `git ls-tree`'s flags.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LsTreeOptions {
    /// Recurse into subtrees (`-r`).
    pub recursive: bool,

    /// Show tree entries even when recursing into them (`-t`).
    pub show_trees: bool,

    /// List only paths (`--name-only`).
    pub name_only: bool,
}

impl OnDisk {
    /// Open an existing on-disk git repository.
    ///
    /// `work_dir` should be the top-level working directory. A `.git` directory should
    /// exist at this path, containing a `config` file whose
    /// `core.repositoryformatversion` is `0`. Use `init` function to create an empty
    /// on-disk repository if necessary.
    pub fn new<P: AsRef<Path>>(work_dir: P) -> Result<Self> {
        let work_dir = work_dir.as_ref();
        if !work_dir.is_dir() {
            return Err(Error::WorkDirDoesntExist(work_dir.to_path_buf()));
        }

        let work_dir = fs::canonicalize(work_dir)?;
        let git_dir = work_dir.join(GIT_DIR_NAME);
        if !git_dir.is_dir() {
            return Err(Error::GitDirDoesntExist(git_dir));
        }

        let config_path = git_dir.join("config");
        if !config_path.is_file() {
            return Err(Error::MissingConfig(config_path));
        }

        let config = Config::parse(&fs::read_to_string(&config_path)?)?;
        config.check_format_version()?;

        Ok(OnDisk {
            work_dir,
            git_dir,
            config,
        })
    }

    /// Creates a new, empty git repository on the local file system.
    ///
    /// `work_dir` must either not exist or be a directory whose `.git`
    /// subdirectory is missing or empty. Nothing is written until those
    /// checks pass.
    ///
    /// Analogous to [`git init`](https://git-scm.com/docs/git-init).
    pub fn init<P: AsRef<Path>>(work_dir: P) -> Result<Self> {
        let work_dir = work_dir.as_ref();
        let git_dir = work_dir.join(GIT_DIR_NAME);

        if work_dir.exists() {
            if !work_dir.is_dir() {
                return Err(Error::NotADirectory(work_dir.to_path_buf()));
            }
            if git_dir.exists() {
                if !git_dir.is_dir() {
                    return Err(Error::NotADirectory(git_dir));
                }
                if fs::read_dir(&git_dir)?.next().is_some() {
                    return Err(Error::GitDirNotEmpty(git_dir));
                }
            }
        } else {
            fs::create_dir_all(work_dir)?;
        }

        let work_dir = fs::canonicalize(work_dir)?;
        let git_dir = work_dir.join(GIT_DIR_NAME);

        create_dirs(&git_dir)?;
        create_description(&git_dir)?;
        create_head(&git_dir)?;

        let config = Config::default();
        fs::write(git_dir.join("config"), config.to_string())?;

        debug!(path = %work_dir.display(), "initialized empty repository");

        Ok(OnDisk {
            work_dir,
            git_dir,
            config,
        })
    }

    /// Discover a git repo starting from the given path.
    ///
    /// Starting with the canonical form of `path`, looks for a `.git`
    /// directory in it and then in each parent directory in turn. Stops at
    /// the first match or at the file system root.
    ///
    /// If no repository is found, returns `Ok(None)` unless `required` is
    /// set, in which case it returns `Error::NotFound`.
    pub fn find<P: AsRef<Path>>(path: P, required: bool) -> Result<Option<Self>> {
        let start = fs::canonicalize(path.as_ref())?;
        let mut dir = start.clone();

        loop {
            trace!(dir = %dir.display(), "looking for repository");

            if dir.join(GIT_DIR_NAME).is_dir() {
                debug!(work_dir = %dir.display(), "found repository");
                return OnDisk::new(&dir).map(Some);
            }

            let parent = dir.parent().unwrap_or_else(|| dir.as_path()).to_path_buf();
            if parent == dir {
                break;
            }
            dir = parent;
        }

        if required {
            Err(Error::NotFound(start))
        } else {
            Ok(None)
        }
    }

    /// Discover a git repo starting from the current working directory.
    pub fn find_from_current_dir(required: bool) -> Result<Option<Self>> {
        let path = env::current_dir()?;
        OnDisk::find(path, required)
    }

    /// Return the working directory for this repo.
    pub fn work_dir(&self) -> &Path {
        self.work_dir.as_path()
    }

    /// Return the path to the `.git` directory.
    pub fn git_dir(&self) -> &Path {
        self.git_dir.as_path()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the repository configuration and write it to `.git/config`.
    pub fn write_config(&mut self, config: Config) -> Result<()> {
        config.check_format_version()?;
        fs::write(self.git_dir.join("config"), config.to_string())?;
        self.config = config;
        Ok(())
    }

    /// Return the path at which the loose object `id` is (or would be) stored.
    pub fn object_path(&self, id: &Id) -> PathBuf {
        let (dir, file) = id.shard();
        self.git_dir.join("objects").join(dir).join(file)
    }

    /// Read the loose object `id`.
    ///
    /// Returns `Ok(None)` if no such object is stored. An object file that
    /// can't be inflated or whose header is invalid is reported as corrupt.
    pub fn retrieve(&self, id: &Id) -> Result<Option<ObjectBytes>> {
        let path = self.object_path(id);
        if !path.is_file() {
            debug!(%id, "object not stored");
            return Ok(None);
        }

        let compressed = fs::read(&path)?;
        let bytes = ObjectBytes::from_compressed(&compressed)
            .map_err(|source| Error::Undecompressable { id: *id, source })?;

        codec::decode(&bytes).map_err(|source| Error::CorruptObject { id: *id, source })?;

        debug!(%id, len = bytes.len(), "retrieved object");
        Ok(Some(bytes))
    }

    /// Write `bytes` as a loose object and return its ID.
    ///
    /// Does nothing if an object file for that ID already exists; an
    /// existing file is never overwritten. The file is written to a
    /// temporary name in the shard directory and then moved into place.
    pub fn store(&mut self, bytes: &ObjectBytes) -> Result<Id> {
        let id = bytes.id();
        let path = self.object_path(&id);

        if path.exists() {
            debug!(%id, "object already stored");
            return Ok(id);
        }

        let shard_dir = path.parent().unwrap_or_else(|| self.git_dir.as_path());
        fs::create_dir_all(shard_dir)?;

        let temp = NamedTempFile::new_in(shard_dir)?;
        let temp = bytes.write_compressed(temp)?;

        // Stored objects are immutable.
        let mut perms = temp.as_file().metadata()?.permissions();
        perms.set_readonly(true);
        temp.as_file().set_permissions(perms)?;

        match temp.persist_noclobber(&path) {
            Ok(_) => {
                debug!(%id, len = bytes.len(), "stored object");
                Ok(id)
            }
            // Another writer stored the same object first.
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => Ok(id),
            Err(err) => Err(err.error.into()),
        }
    }

    /// Read and decode the object `id`.
    ///
    /// Returns `Ok(None)` if no such object is stored.
    pub fn read_object(&self, id: &Id) -> Result<Option<Object>> {
        match self.retrieve(id)? {
            Some(bytes) => match Object::from_bytes(&bytes) {
                Ok(object) => Ok(Some(object)),
                Err(source) if source.is_format_error() => {
                    Err(Error::CorruptObject { id: *id, source })
                }
                Err(err) => Err(err.into()),
            },
            None => Ok(None),
        }
    }

    /// Encode and store an object, returning its ID.
    ///
    /// Analogous to [`git hash-object -w`](https://git-scm.com/docs/git-hash-object).
    pub fn write_object(&mut self, object: &Object) -> Result<Id> {
        self.store(&object.to_bytes())
    }

    /// Return the payload of object `id`, which may be of any kind
    /// including commits and tags.
    ///
    /// If `expected` is given, the object must be of that kind.
    ///
    /// Analogous to [`git cat-file`](https://git-scm.com/docs/git-cat-file).
    pub fn cat_payload(&self, id: &Id, expected: Option<Kind>) -> Result<Vec<u8>> {
        let bytes = self.retrieve(id)?.ok_or(Error::ObjectNotFound(*id))?;

        // `retrieve` has already checked the framing.
        let frame = codec::decode(&bytes)?;
        let actual = frame.kind()?;

        match expected {
            Some(expected) if expected != actual => Err(Error::KindMismatch {
                id: *id,
                expected,
                actual,
            }),
            _ => Ok(frame.payload.to_vec()),
        }
    }

    /// List the contents of tree `id`.
    ///
    /// Each line is `<mode> <kind> <id>\t<path>`, or just `<path>` with
    /// `name_only`. When recursing, paths of nested entries are joined with `/`.
    ///
    /// Analogous to [`git ls-tree`](https://git-scm.com/docs/git-ls-tree).
    pub fn ls_tree(&self, id: &Id, options: LsTreeOptions) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        self.ls_tree_into(id, None, options, &mut lines)?;
        Ok(lines)
    }

    fn ls_tree_into(
        &self,
        id: &Id,
        prefix: Option<&str>,
        options: LsTreeOptions,
        lines: &mut Vec<String>,
    ) -> Result<()> {
        let tree = match self.read_object(id)? {
            Some(Object::Tree(tree)) => tree,
            Some(other) => {
                return Err(Error::KindMismatch {
                    id: *id,
                    expected: Kind::Tree,
                    actual: other.kind(),
                })
            }
            None => return Err(Error::ObjectNotFound(*id)),
        };

        for entry in tree.entries() {
            let path = match prefix {
                Some(prefix) => format!("{}/{}", prefix, entry.name()),
                None => entry.name().to_owned(),
            };

            let is_tree = entry.kind() == Kind::Tree;
            if !is_tree || !options.recursive || options.show_trees {
                lines.push(if options.name_only {
                    path.clone()
                } else {
                    format!("{} {} {}\t{}", entry.mode(), entry.kind(), entry.id(), path)
                });
            }

            if is_tree && options.recursive {
                self.ls_tree_into(entry.id(), Some(path.as_str()), options, lines)?;
            }
        }

        Ok(())
    }
}

fn create_dirs(git_dir: &Path) -> Result<()> {
    for dir in &["branches", "objects", "refs/tags", "refs/heads"] {
        fs::create_dir_all(git_dir.join(dir))?;
    }
    Ok(())
}

fn create_description(git_dir: &Path) -> Result<()> {
    let desc_path = git_dir.join("description");
    let desc_txt = "Unnamed repository; edit this file 'description' to name the repository.\n";

    fs::write(desc_path, desc_txt).map_err(|e| e.into())
}

fn create_head(git_dir: &Path) -> Result<()> {
    let head_path = git_dir.join("HEAD");
    let head_txt = format!("ref: refs/heads/{}\n", DEFAULT_BRANCH);

    fs::write(head_path, head_txt).map_err(|e| e.into())
}

#[cfg(test)]
mod tests;
