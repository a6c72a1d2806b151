use std::io::{self, Read};

use serde::{Deserialize, Serialize};

use crate::{Algorithm, HashingReader, Result, VerifyError};

const READ_BUFFER: usize = 64 * 1024;

/// An algorithm paired with the digest a download is expected to produce.
///
/// The digest is kept as lowercase hex; [`Checksum::new`] rejects digests
/// that are not hex or whose length does not match the algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksum {
    pub algorithm: Algorithm,
    pub digest:    String,
}

impl Checksum {
    pub fn new(algorithm: Algorithm, digest: impl AsRef<str>) -> Result<Self> {
        let digest = digest.as_ref().trim().to_ascii_lowercase();
        let invalid = |reason| VerifyError::InvalidDigest {
            algorithm: algorithm.name(),
            digest: digest.clone(),
            reason,
        };

        let bytes = hex::decode(&digest).map_err(|_| invalid("not a hex string"))?;
        if bytes.len() != algorithm.output_len() {
            return Err(invalid("wrong length for algorithm"));
        }

        Ok(Self { algorithm, digest })
    }

    /// Parses an algorithm name (`md5`, `sha1`, `sha256`, `sha512`) and digest.
    pub fn parse(algorithm: &str, digest: impl AsRef<str>) -> Result<Self> {
        Self::new(algorithm.parse()?, digest)
    }

    /// Re-checks a value that may have bypassed [`Checksum::new`], e.g. via serde.
    pub fn validate(&self) -> Result<()> { Self::new(self.algorithm, &self.digest).map(drop) }

    /// Streams `reader` to its end and compares the digest.
    ///
    /// Returns the number of bytes hashed on success.
    pub fn verify_reader<R: Read>(&self, reader: R) -> Result<u64> {
        let expected = hex::decode(&self.digest).map_err(|_| VerifyError::InvalidDigest {
            algorithm: self.algorithm.name(),
            digest:    self.digest.clone(),
            reason:    "not a hex string",
        })?;
        let mut reader = HashingReader::new(reader, self.algorithm.hasher());
        let mut buf = vec![0u8; READ_BUFFER];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }

        let hashed = reader.bytes_read();
        reader.finish(&expected)?;
        Ok(hashed)
    }
}
