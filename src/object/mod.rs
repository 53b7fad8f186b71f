//! Represents the git concept of an "object": a type tag and a payload,
//! identified by the hash of its canonical encoding.
//!
//! [`ObjectBytes`] holds the canonical `"<type> <size>\0<payload>"` encoding,
//! [`codec`] frames and unframes it, and [`Object`] is the typed view of
//! the payload.

use std::fs;
use std::path::Path;

mod blob;
pub use blob::Blob;

mod bytes;
pub use bytes::ObjectBytes;

pub mod codec;

mod error;
pub use error::{Error, Result};

mod file_mode;
pub use file_mode::FileMode;

mod id;
pub use id::{Id, ParseIdError};

mod kind;
pub use kind::Kind;

mod tree;
pub use tree::{Tree, TreeEntry};

/// A decoded object.
///
/// Only blobs and trees are supported. Trees refer to their children by
/// [`Id`], never directly, so an object graph can't contain cycles.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
}

impl Object {
    /// Build an object of type `kind` from its payload.
    ///
    /// Fails if the payload isn't valid for `kind`, or if `kind` isn't
    /// supported.
    pub fn from_payload(kind: Kind, payload: &[u8]) -> Result<Object> {
        codec::dispatch(kind.as_str().as_bytes(), payload)
    }

    /// Build an object of type `kind` from the contents of a file.
    ///
    /// This is the parsing half of
    /// [`git hash-object`](https://git-scm.com/docs/git-hash-object).
    pub fn from_file<P: AsRef<Path>>(kind: Kind, path: P) -> Result<Object> {
        let payload = fs::read(path)?;
        Object::from_payload(kind, &payload)
    }

    /// Decode canonical object bytes.
    pub fn from_bytes(bytes: &ObjectBytes) -> Result<Object> {
        let frame = codec::decode(bytes)?;
        codec::dispatch(frame.tag, frame.payload)
    }

    /// Return the kind of the object.
    pub fn kind(&self) -> Kind {
        match self {
            Object::Blob(_) => Kind::Blob,
            Object::Tree(_) => Kind::Tree,
        }
    }

    /// Encode the payload, without the header.
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Object::Blob(blob) => blob.data().to_vec(),
            Object::Tree(tree) => tree.serialize(),
        }
    }

    /// Encode the object in canonical form.
    pub fn to_bytes(&self) -> ObjectBytes {
        match self {
            Object::Blob(blob) => codec::encode(Kind::Blob, blob.data()),
            Object::Tree(tree) => codec::encode(Kind::Tree, &tree.serialize()),
        }
    }

    /// Computes the object's ID from its canonical encoding.
    ///
    /// This is functionally equivalent to the
    /// [`git hash-object`](https://git-scm.com/docs/git-hash-object) command
    /// without the `-w` option that would write the object to the repo.
    pub fn id(&self) -> Id {
        self.to_bytes().id()
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Object::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Object::Tree(tree) => Some(tree),
            _ => None,
        }
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Object {
        Object::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Object {
        Object::Tree(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::NamedTempFile;

    #[test]
    fn blob_id() {
        // $ echo 'test content' | git hash-object --stdin
        // d670460b4b4aece5915caf5c68d12f560a9fe3e4

        let o = Object::from(Blob::from("test content\n"));
        assert_eq!(o.kind(), Kind::Blob);
        assert_eq!(o.id().to_string(), "d670460b4b4aece5915caf5c68d12f560a9fe3e4");
    }

    #[test]
    fn blob_round_trip() {
        let o = Object::from(Blob::new(vec![0, 1, 2, 0, 32, 255]));
        let b = o.to_bytes();
        assert_eq!(&b.as_slice()[..7], b"blob 6\0");
        assert_eq!(Object::from_bytes(&b).unwrap(), o);
    }

    #[test]
    fn tree_round_trip() {
        let blob = Object::from(Blob::from("hello\n")).id();
        let sub = Object::from(Tree::default()).id();

        let o = Object::from(Tree::new(vec![
            TreeEntry::new(FileMode::TREE, "foo", sub).unwrap(),
            TreeEntry::new(FileMode::NORMAL, "foo", blob).unwrap(),
            TreeEntry::new(FileMode::EXECUTABLE, "build.sh", blob).unwrap(),
        ]));

        let b = o.to_bytes();
        assert_eq!(Object::from_bytes(&b).unwrap(), o);
        assert_eq!(Object::from_bytes(&b).unwrap().to_bytes(), b);
        assert_eq!(o.payload().len() + b"tree 97\0".len(), b.len());
    }

    #[test]
    fn unsorted_tree_round_trip() {
        let blob = Object::from(Blob::from("hello\n")).id();

        let mut payload = b"100644 b\0".to_vec();
        payload.extend_from_slice(blob.as_bytes());
        payload.extend_from_slice(b"100644 a\0");
        payload.extend_from_slice(blob.as_bytes());

        let o = Object::from_payload(Kind::Tree, &payload).unwrap();
        assert_eq!(Object::from_bytes(&o.to_bytes()).unwrap(), o);
    }

    #[test]
    fn from_payload() {
        let o = Object::from_payload(Kind::Blob, b"abc").unwrap();
        assert_eq!(o.as_blob().unwrap().data(), b"abc");
        assert!(o.as_tree().is_none());

        let err = Object::from_payload(Kind::Tree, b"not a tree").unwrap_err();
        assert!(err.is_format_error());

        let err = Object::from_payload(Kind::Commit, b"").unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn from_file() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all("foobar".repeat(1000).as_bytes()).unwrap();

        let o = Object::from_file(Kind::Blob, f.path()).unwrap();
        assert_eq!(o.payload().len(), 6000);
        assert_eq!(o.id(), codec::encode(Kind::Blob, o.payload().as_slice()).id());
    }

    #[test]
    fn from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Object::from_file(Kind::Blob, dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn from_bytes_rejects_unsupported() {
        let b = codec::encode(Kind::Tag, b"object 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n");
        let err = Object::from_bytes(&b).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind(Kind::Tag)));
    }
}
