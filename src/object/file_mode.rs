use std::fmt::{self, Display, Formatter, Write};

use super::Kind;

/// Describes the file type of a tree entry.
///
/// Git uses a variation on the Unix file permissions flags to denote a file's
/// intended type on disk. The first two digits select the type of the object
/// the entry refers to:
///
/// * `10xxxx` - regular file (`100644` normal, `100755` executable); a blob
/// * `120000` - symbolic link; a blob holding the link target
/// * `040000` - tree (subdirectory)
/// * `160000` - submodule (aka gitlink); a commit in another repository
///
/// The in-memory form is always six digits. Trees are written to disk
/// with five (`40000`), which is how git writes them.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct FileMode([u8; 6]);

impl FileMode {
    pub const NORMAL: FileMode = FileMode(*b"100644");
    pub const EXECUTABLE: FileMode = FileMode(*b"100755");
    pub const SYMBOLIC_LINK: FileMode = FileMode(*b"120000");
    pub const TREE: FileMode = FileMode(*b"040000");
    pub const SUBMODULE: FileMode = FileMode(*b"160000");

    /// Parse a mode as found in a tree entry.
    ///
    /// Accepts five or six octal digits; a five-digit mode is left-padded
    /// with `0`. Returns `None` if the value is malformed or its type prefix
    /// isn't recognized.
    pub fn from_octal_slice(s: &[u8]) -> Option<FileMode> {
        if !s.iter().all(|c| (b'0'..=b'7').contains(c)) {
            return None;
        }

        let mut mode = [b'0'; 6];
        match s.len() {
            6 => mode.copy_from_slice(s),
            5 => mode[1..].copy_from_slice(s),
            _ => return None,
        }

        match &mode[..2] {
            b"04" | b"10" | b"12" | b"16" => Some(FileMode(mode)),
            _ => None,
        }
    }

    /// Return the type of object an entry with this mode refers to.
    pub fn kind(self) -> Kind {
        match &self.0[..2] {
            b"04" => Kind::Tree,
            b"16" => Kind::Commit,
            _ => Kind::Blob,
        }
    }

    /// Returns true for regular (possibly executable) files.
    ///
    /// Only these sort by their bare name within a tree; every other entry
    /// sorts as if its name ended with `/`.
    pub fn is_regular_file(self) -> bool {
        self.0.starts_with(b"10")
    }

    /// The normalized six-digit form.
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// The form written into tree objects, without a leading `0`.
    pub(crate) fn wire_bytes(&self) -> &[u8] {
        if self.0[0] == b'0' {
            &self.0[1..]
        } else {
            &self.0
        }
    }
}

impl Display for FileMode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for &c in self.0.iter() {
            f.write_char(c.into())?;
        }
        Ok(())
    }
}
