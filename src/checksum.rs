use crate::base::{Error, Result};

/// Calculates the SCIP line checksum: the low 6 bits of the byte sum, offset into printable ASCII.
pub struct Checksum {
    current: u32,
}

impl Checksum {
    /// Creates a new `Checksum` instance, initialized to 0.
    #[inline]
    pub fn new() -> Checksum {
        Checksum { current: 0 }
    }

    /// Includes a slice of bytes in the checksum calculation.
    ///
    /// # Arguments
    ///
    /// * `data` - The byte slice to add into the running sum.
    #[inline]
    pub fn push_slice(&mut self, data: &[u8]) {
        for d in data {
            self.current = self.current.wrapping_add(*d as u32);
        }
    }

    /// Returns the checksum character for the bytes pushed so far.
    #[inline]
    pub fn checksum(&self) -> u8 {
        (self.current & 0x3f) as u8 + 0x30
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a response line whose last character is its checksum.
///
/// An empty line has no checksum and never validates.
pub fn verify_line(line: &[u8]) -> Result<()> {
    match line.split_last() {
        Some((&expected, body)) => {
            let mut checksum = Checksum::new();
            checksum.push_slice(body);
            if checksum.checksum() == expected {
                Ok(())
            } else {
                Err(Error::ChecksumFailure {
                    line: String::from_utf8_lossy(line).into_owned(),
                })
            }
        }
        None => Err(Error::ChecksumFailure {
            line: String::new(),
        }),
    }
}

/// Returns `body` followed by its checksum character.
pub fn append_checksum(body: &str) -> String {
    let mut checksum = Checksum::new();
    checksum.push_slice(body.as_bytes());
    let mut line = String::with_capacity(body.len() + 1);
    line.push_str(body);
    line.push(checksum.checksum() as char);
    line
}
