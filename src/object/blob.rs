/// An opaque byte buffer, stored and returned verbatim.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Blob {
    data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Blob {
        Blob { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl From<Vec<u8>> for Blob {
    fn from(data: Vec<u8>) -> Blob {
        Blob { data }
    }
}

impl From<&str> for Blob {
    fn from(s: &str) -> Blob {
        Blob {
            data: s.as_bytes().to_vec(),
        }
    }
}
