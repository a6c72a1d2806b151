use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use rangefetch_verify::{Checksum, VerifyError};
use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};

/// Smallest share of a resource worth its own connection.
pub const DEFAULT_MIN_CHUNK_SIZE: u64 = 64 * 1024;

/// Phases of a fetch.
///
/// PREFLIGHT → (CACHE_HIT | PLANNING) → DOWNLOADING → ASSEMBLING →
/// (VERIFYING) → DONE. Any phase may end the fetch with an error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Metadata request in flight.
    #[default]
    Preflight,

    /// A completed download with the same change token is already on disk.
    CacheHit,

    /// Choosing single-stream or parallel and computing byte ranges.
    Planning,

    /// Range workers are streaming into chunk files.
    Downloading,

    /// Chunk files are being joined into the destination.
    Assembling,

    /// The destination is being hashed against the configured checksum.
    Verifying,

    Done,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchPhase::Preflight => "preflight",
            FetchPhase::CacheHit => "cache-hit",
            FetchPhase::Planning => "planning",
            FetchPhase::Downloading => "downloading",
            FetchPhase::Assembling => "assembling",
            FetchPhase::Verifying => "verifying",
            FetchPhase::Done => "done",
        })
    }
}

/// Whether change tokens (`ETag`) are remembered between fetches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChangeTracking {
    /// Every fetch downloads the resource again.
    #[default]
    Disabled,

    /// Marker files for observed tokens live under `cache_root`.
    Enabled { cache_root: PathBuf },
}

/// Configuration for a [`Fetcher`](crate::Fetcher).
///
/// Validated once, by [`Fetcher::new`](crate::Fetcher::new).
///
/// # Examples
///
/// ```
/// use rangefetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .dest_dir("/tmp/downloads")
///     .concurrency(8)
///     .timeout(Duration::from_secs(30));
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Directory the downloaded file and its temporary chunks are placed in.
    ///
    /// Default: `.`
    pub dest_dir: PathBuf,

    /// Number of ranges fetched in parallel.
    ///
    /// Forced to 1 when the server does not advertise `Accept-Ranges: bytes`,
    /// omits the content length, or the resource is too small to split.
    ///
    /// Default: 1
    pub concurrency: usize,

    /// A resource is split only as far as every range gets at least this many bytes.
    ///
    /// Default: 64 KiB
    pub min_chunk_size: u64,

    /// Default: [`ChangeTracking::Disabled`]
    pub change_tracking: ChangeTracking,

    /// Deadline for each individual HTTP call, applied by the HTTP client.
    ///
    /// Default: none
    pub timeout: Option<Duration>,

    /// Digest the assembled file must match.
    ///
    /// Default: none
    pub checksum: Option<Checksum>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            dest_dir:        PathBuf::from("."),
            concurrency:     1,
            min_chunk_size:  DEFAULT_MIN_CHUNK_SIZE,
            change_tracking: ChangeTracking::Disabled,
            timeout:         None,
            checksum:        None,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn dest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dest_dir = dir.into();
        self
    }

    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    #[must_use]
    pub fn min_chunk_size(mut self, bytes: u64) -> Self {
        self.min_chunk_size = bytes;
        self
    }

    /// Skip downloads whose change token was already seen, keeping markers
    /// under `cache_root`.
    ///
    /// Be aware that different servers serving the same file are likely to
    /// return different tokens, which causes the file to be fetched again.
    #[must_use]
    pub fn track_changes(mut self, cache_root: impl Into<PathBuf>) -> Self {
        self.change_tracking = ChangeTracking::Enabled {
            cache_root: cache_root.into(),
        };
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Verify the file once it is fully downloaded.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangefetch::{Checksum, FetchOptions};
    ///
    /// let checksum = Checksum::parse("md5", "5eb63bbbe01eeed093cb22bb8f5acdc3").unwrap();
    /// let options = FetchOptions::default().checksum(checksum);
    /// ```
    #[must_use]
    pub fn checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency < 1 {
            return Err(FetchError::InvalidConfiguration(format!(
                "concurrency must be at least 1, got {}",
                self.concurrency
            )));
        }
        if self.min_chunk_size < 1 {
            return Err(FetchError::InvalidConfiguration(
                "min_chunk_size must be at least 1 byte".into(),
            ));
        }
        if let Some(checksum) = &self.checksum {
            checksum.validate().map_err(|e| match e {
                VerifyError::UnsupportedAlgorithm(name) => FetchError::UnsupportedAlgorithm(name),
                other => FetchError::InvalidConfiguration(other.to_string()),
            })?;
        }
        Ok(())
    }
}
