//! Resumable, parallel HTTP downloads over byte ranges.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations
//! - effects - I/O operations behind the [`HttpClient`] trait
//!
//! # Key Features
//!
//! - **Parallel ranges**: a resource with a known length and `Accept-Ranges: bytes`
//!   is split into contiguous ranges fetched concurrently, then joined in order
//! - **Resume**: chunk files left by an interrupted fetch are continued, not restarted
//! - **Change tokens**: with tracking enabled, a file whose `ETag` is unchanged
//!   is not downloaded again
//! - **Integrity**: optional md5, sha1, sha256 or sha512 check of the final file
//! - **Progress**: a channel of per-write events that closes when the fetch ends
//!
//! # Example
//!
//! ```no_run
//! use rangefetch::{Fetcher, FetchOptions, progress_channel};
//!
//! # async fn run() -> rangefetch::Result<()> {
//! let fetcher = Fetcher::with_options(FetchOptions::default().dest_dir("downloads").concurrency(8))?;
//! let (tx, mut rx) = progress_channel();
//!
//! let (file, downloaded) = tokio::join!(fetcher.fetch("https://example.com/big.iso", Some(tx)), async {
//!     let mut downloaded = 0;
//!     while let Some(report) = rx.recv().await {
//!         downloaded += report.written;
//!     }
//!     downloaded
//! });
//! let file = file?;
//! assert_eq!(file.metadata().await?.len(), downloaded);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
mod effects;
mod error;

pub use data::{
    ByteRange, ChangeTracking, ChunkPlan, ContentMetadata, DEFAULT_MIN_CHUNK_SIZE, FetchOptions, FetchPhase,
    ProgressReceiver, ProgressReport, ProgressSender, progress_channel,
};
pub use effects::{
    BodyStream, BoxStream, ChangeTokenCache, Fetcher, GetResponse, HeadResponse, HttpClient,
    PLAN_FILE, ProgressWriter, assemble, fetch_range, promote, read_plan, verify_file, write_plan,
};
#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;
pub use error::{FetchError, PartialTransferError, RangeFailure, Result};
pub use rangefetch_verify::{Algorithm, Checksum};

/// Fetch `url` once with a default `reqwest` client.
///
/// Shorthand for [`Fetcher::with_options`] followed by [`Fetcher::fetch`].
#[cfg(feature = "reqwest")]
pub async fn fetch(
    url: &str,
    options: FetchOptions,
    progress: Option<ProgressSender>,
) -> Result<tokio::fs::File> {
    Fetcher::with_options(options)?.fetch(url, progress).await
}
