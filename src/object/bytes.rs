use std::io::{self, Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use sha1::{Digest, Sha1};

use super::Id;

/// The decompressed canonical form of a stored object: the
/// `"<type> <size>\0"` header followed by the payload.
///
/// An `ObjectBytes` is immutable once constructed. Use
/// [`codec::decode`](super::codec::decode) to split it back into header
/// and payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObjectBytes {
    data: Vec<u8>,
}

impl ObjectBytes {
    /// Wrap a buffer that already holds a canonical object encoding.
    pub fn new(data: Vec<u8>) -> ObjectBytes {
        ObjectBytes { data }
    }

    /// Inflate the zlib stream found in a loose object file.
    pub fn from_compressed(compressed: &[u8]) -> io::Result<ObjectBytes> {
        let mut data = Vec::new();
        ZlibDecoder::new(compressed).read_to_end(&mut data)?;
        Ok(ObjectBytes { data })
    }

    /// Return the zlib-compressed form that is written to disk.
    pub fn compress(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_compressed(&mut out)?;
        Ok(out)
    }

    /// Stream the zlib-compressed form to `w`.
    pub fn write_compressed<W: Write>(&self, w: W) -> io::Result<W> {
        let mut encoder = ZlibEncoder::new(w, Compression::default());
        encoder.write_all(&self.data)?;
        encoder.finish()
    }

    /// Computes the object's ID: the SHA-1 digest of the whole buffer,
    /// header included.
    pub fn id(&self) -> Id {
        let digest = Sha1::digest(&self.data);

        let mut raw = [0u8; 20];
        raw.copy_from_slice(digest.as_slice());
        Id::from_raw(raw)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[u8]> for ObjectBytes {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
