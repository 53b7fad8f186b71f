use std::cmp::Ordering;

use super::{Error, FileMode, Id, Kind, Result};

/// One child of a tree: a mode, a single path segment, and the ID of the
/// object the child refers to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeEntry {
    mode: FileMode,
    name: String,
    id: Id,
}

impl TreeEntry {
    /// Create a tree entry.
    ///
    /// It is an error if `name` is empty, is `.` or `..`, or contains `/`
    /// or a NUL byte.
    pub fn new<S: Into<String>>(mode: FileMode, name: S, id: Id) -> Result<TreeEntry> {
        let name = name.into();
        if check_name(name.as_bytes()).is_err() {
            return Err(Error::InvalidFilename(name));
        }
        Ok(TreeEntry { mode, name, id })
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    /// Return the type of object this entry refers to.
    pub fn kind(&self) -> Kind {
        self.mode.kind()
    }

    // Anything that isn't a regular file sorts as though its name
    // ended with `/`.
    fn cmp_sort_key(&self, other: &TreeEntry) -> Ordering {
        let l = self.name.as_bytes().iter().chain(slash_unless_file(self.mode));
        let r = other.name.as_bytes().iter().chain(slash_unless_file(other.mode));
        l.cmp(r)
    }
}

fn slash_unless_file(mode: FileMode) -> &'static [u8] {
    if mode.is_regular_file() {
        b""
    } else {
        b"/"
    }
}

/// A directory listing: an ordered sequence of entries.
///
/// Entries are always kept in git's canonical order, however the tree was
/// built.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(mut entries: Vec<TreeEntry>) -> Tree {
        entries.sort_by(TreeEntry::cmp_sort_key);
        Tree { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry with the given name.
    ///
    /// If a file and a directory share the name, the file is returned.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Add an entry at its sorted position.
    ///
    /// An existing entry that sorts identically (same name, and both or
    /// neither regular files) is replaced and returned.
    pub fn insert(&mut self, entry: TreeEntry) -> Option<TreeEntry> {
        match self
            .entries
            .binary_search_by(|probe| probe.cmp_sort_key(&entry))
        {
            Ok(index) => Some(std::mem::replace(&mut self.entries[index], entry)),
            Err(index) => {
                self.entries.insert(index, entry);
                None
            }
        }
    }

    /// Remove every entry with the given name, returning how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        before - self.entries.len()
    }

    /// Decode a tree payload: a sequence of `<mode> <name>\0<20-byte id>`
    /// records with no separator between them.
    ///
    /// Records that are out of order in the payload are sorted.
    pub fn parse(payload: &[u8]) -> Result<Tree> {
        let mut entries = Vec::new();
        let mut offset = 0;

        while offset < payload.len() {
            let (entry, len) = parse_entry(&payload[offset..], offset)?;
            entries.push(entry);
            offset += len;
        }

        Ok(Tree::new(entries))
    }

    /// Encode the tree payload.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(entry.mode.wire_bytes());
            out.push(b' ');
            out.extend_from_slice(entry.name.as_bytes());
            out.push(0);
            out.extend_from_slice(entry.id.as_bytes());
        }
        out
    }
}

// Returns the entry found at the start of `record` and the number of
// bytes it occupies. `offset` is only used for error reporting.
fn parse_entry(record: &[u8], offset: usize) -> Result<(TreeEntry, usize)> {
    let nul = record
        .iter()
        .position(|b| *b == 0)
        .ok_or(Error::TruncatedTreeEntry { offset })?;

    let space = record[..nul]
        .iter()
        .position(|b| *b == b' ')
        .ok_or(Error::MalformedTreeEntry {
            offset,
            reason: "no space after mode",
        })?;

    let mode_bytes = &record[..space];
    let mode = FileMode::from_octal_slice(mode_bytes).ok_or_else(|| Error::InvalidMode {
        offset,
        mode: String::from_utf8_lossy(mode_bytes).into_owned(),
    })?;

    let name_bytes = &record[space + 1..nul];
    check_name(name_bytes).map_err(|reason| Error::MalformedTreeEntry { offset, reason })?;

    let name = std::str::from_utf8(name_bytes).map_err(|_| Error::MalformedTreeEntry {
        offset,
        reason: "name is not valid UTF-8",
    })?;

    let end = nul + 1 + 20;
    if record.len() < end {
        return Err(Error::TruncatedTreeEntry { offset });
    }

    let mut raw = [0u8; 20];
    raw.copy_from_slice(&record[nul + 1..end]);

    let entry = TreeEntry {
        mode,
        name: name.to_owned(),
        id: Id::from_raw(raw),
    };

    Ok((entry, end))
}

fn check_name(name: &[u8]) -> std::result::Result<(), &'static str> {
    if name.is_empty() {
        Err("empty name")
    } else if name == b"." || name == b".." {
        Err("name is `.` or `..`")
    } else if name.contains(&b'/') {
        Err("name contains `/`")
    } else if name.contains(&0) {
        Err("name contains NUL")
    } else {
        Ok(())
    }
}
