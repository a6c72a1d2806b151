//! Error types for rangefetch.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{url} answered with non-2xx status {status}")]
    Upstream { url: String, status: u16 },

    #[error("server ignored the range request for chunk {index} starting at byte {start}")]
    RangeIgnored { index: usize, start: u64 },

    #[error("chunk {index} ended after {received} of {expected} bytes")]
    Incomplete {
        index:    usize,
        expected: u64,
        received: u64,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error(transparent)]
    PartialTransfer(#[from] PartialTransferError),

    #[error("failed assembling chunk {index}: {source}")]
    Assembly {
        index:  usize,
        #[source]
        source: io::Error,
    },

    #[error("unsupported hashing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error(
        "integrity check failed, {} is untrusted (left on disk): expected {expected}, found {actual}",
        .path.display()
    )]
    IntegrityMismatch {
        path:     PathBuf,
        expected: String,
        actual:   String,
    },

    #[error("background task failed: {0}")]
    Task(String),

    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;

/// One range that could not be downloaded.
#[derive(Debug)]
pub struct RangeFailure {
    pub index: usize,
    pub error: FetchError,
}

/// Every range failure of a fetch, in range-index order.
#[derive(Debug)]
pub struct PartialTransferError {
    pub failures: Vec<RangeFailure>,
}

impl PartialTransferError {
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.failures.iter().map(|f| f.index)
    }
}

impl fmt::Display for PartialTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} range(s) failed:", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  range {}: {}", failure.index, failure.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for PartialTransferError {}
