//! Compression Operations

use crate::Compression;
use crate::error::{ErrorKind, Result};
use bzip2::{Compression as BzCompression, write::BzEncoder};
use exn::ResultExt;
use std::io::Write;

// Metadata is only ever compressed here to build fixtures, so favour speed.
const BZIP2_LEVEL: u32 = 1;

impl Compression {
    /// Compress a byte slice in memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfdb_compress::Compression;
    ///
    /// let data = b"SQLite format 3\0";
    /// let compressed = Compression::Bzip2.compress(data).unwrap();
    /// assert!(Compression::Bzip2.check_magic_bytes(&compressed));
    /// ```
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        match self {
            Compression::None => output.extend_from_slice(input),
            Compression::Bzip2 => {
                let mut encoder = BzEncoder::new(&mut output, BzCompression::new(BZIP2_LEVEL));
                encoder.write_all(input).or_raise(|| ErrorKind::Io)?;
                encoder.finish().or_raise(|| ErrorKind::Io)?;
            },
        }
        Ok(output)
    }
}
