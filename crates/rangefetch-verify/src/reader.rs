use std::io::{self, Read};

use crate::{Hasher, Result, VerifyError};

/// Streaming reader that hashes data as it passes through.
pub struct HashingReader<R, H> {
    reader: R,
    hasher: H,
    bytes_read: u64,
}

impl<R, H> HashingReader<R, H> {
    pub fn new(reader: R, hasher: H) -> Self {
        Self {
            reader,
            hasher,
            bytes_read: 0,
        }
    }

    pub fn bytes_read(&self) -> u64 { self.bytes_read }
}

impl<R, H: Hasher> HashingReader<R, H> {
    /// Compares the digest of everything read so far against `expected`.
    pub fn finish(self, expected: &[u8]) -> Result<()> {
        let actual = self.hasher.finalize();
        if actual == expected {
            Ok(())
        } else {
            Err(VerifyError::Mismatch {
                expected: hex::encode(expected),
                actual:   hex::encode(actual),
            })
        }
    }
}

impl<R: Read, H: Hasher> Read for HashingReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.bytes_read += n as u64;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Algorithm;
    use std::io::Cursor;

    #[test]
    fn hashes_everything_that_passes_through() {
        let data = b"test data for verification";
        let mut reader = HashingReader::new(Cursor::new(data), Algorithm::Sha256.hasher());

        let mut out = Vec::new();
        io::copy(&mut reader, &mut out).unwrap();

        assert_eq!(out, data);
        assert_eq!(reader.bytes_read(), data.len() as u64);
        reader.finish(&Algorithm::Sha256.digest(data)).unwrap();
    }

    #[test]
    fn mismatch_reports_both_digests() {
        let mut reader = HashingReader::new(Cursor::new(b"test data"), Algorithm::Md5.hasher());
        io::copy(&mut reader, &mut io::sink()).unwrap();

        match reader.finish(&[0u8; 16]) {
            Err(VerifyError::Mismatch { expected, actual }) => {
                assert_eq!(expected, "0".repeat(32));
                assert_eq!(actual, hex::encode(Algorithm::Md5.digest(b"test data")));
            }
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }
}
