//! Canonical `"<type> <size>\0<payload>"` framing shared by every stored object.

use tracing::trace;

use super::{Blob, Error, Kind, Object, ObjectBytes, Result, Tree};

/// The pieces of a decoded object header, borrowed from the underlying buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Frame<'a> {
    /// Type tag exactly as found in the header.
    pub tag: &'a [u8],

    /// Declared payload size. Always equal to `payload.len()`.
    pub size: usize,

    pub payload: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Interpret the type tag.
    pub fn kind(&self) -> Result<Kind> {
        Kind::from_tag(self.tag)
    }
}

/// Frame `payload` as an object of type `kind`.
pub fn encode(kind: Kind, payload: &[u8]) -> ObjectBytes {
    let size = payload.len().to_string();
    let tag = kind.as_str();

    let mut data = Vec::with_capacity(tag.len() + size.len() + 2 + payload.len());
    data.extend_from_slice(tag.as_bytes());
    data.push(b' ');
    data.extend_from_slice(size.as_bytes());
    data.push(0);
    data.extend_from_slice(payload);

    ObjectBytes::new(data)
}

/// Split canonical object bytes into type tag, declared size, and payload.
///
/// Fails if the header is malformed or if the declared size does not exactly
/// match the number of bytes following the NUL.
pub fn decode(bytes: &ObjectBytes) -> Result<Frame<'_>> {
    let data = bytes.as_slice();

    let space = data
        .iter()
        .position(|b| *b == b' ')
        .ok_or(Error::MissingSpace)?;
    let tag = &data[..space];

    let nul = space
        + 1
        + data[space + 1..]
            .iter()
            .position(|b| *b == 0)
            .ok_or(Error::MissingNul)?;

    let size = parse_size(&data[space + 1..nul])?;
    let payload = &data[nul + 1..];

    if size != payload.len() {
        return Err(Error::SizeMismatch {
            declared: size,
            actual: payload.len(),
        });
    }

    trace!(tag = %String::from_utf8_lossy(tag), size, "decoded object header");
    Ok(Frame { tag, size, payload })
}

/// Construct the typed object for a type tag and payload.
///
/// Commit and tag objects are recognized but not supported.
pub fn dispatch(tag: &[u8], payload: &[u8]) -> Result<Object> {
    match Kind::from_tag(tag)? {
        Kind::Blob => Ok(Object::Blob(Blob::new(payload.to_vec()))),
        Kind::Tree => Ok(Object::Tree(Tree::parse(payload)?)),
        kind @ Kind::Commit | kind @ Kind::Tag => Err(Error::UnsupportedKind(kind)),
    }
}

// Git writes sizes without sign or leading zeros. Anything else would not
// survive a decode/encode round trip, so it is rejected here.
fn parse_size(field: &[u8]) -> Result<usize> {
    let invalid = || Error::InvalidSize(String::from_utf8_lossy(field).into_owned());

    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    if field.len() > 1 && field[0] == b'0' {
        return Err(invalid());
    }

    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(invalid)
}
