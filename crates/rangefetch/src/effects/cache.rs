use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, trace};

use crate::error::Result;

/// Marker files remembering which change token a completed download had.
///
/// A marker is an empty file at `<root>/<key>/<hex(token)>`. The token is hex
/// encoded so an arbitrary `ETag` can never escape the key directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeTokenCache {
    root: PathBuf,
}

impl ChangeTokenCache {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    /// `<user cache dir>/rangefetch`, if the platform has one.
    pub fn default_root() -> Option<PathBuf> { dirs::cache_dir().map(|dir| dir.join("rangefetch")) }

    pub fn root(&self) -> &Path { &self.root }

    pub fn marker_path(&self, key: &str, token: &str) -> PathBuf {
        self.root.join(key).join(hex::encode(token))
    }

    /// Whether the download of `key` can be skipped.
    ///
    /// True only when the server sent a token, a marker for that exact token
    /// exists, and the local file is still present with the length the server
    /// reported. Without a reported length the file cannot be checked and is
    /// never trusted.
    pub async fn should_skip(
        &self,
        key: &str,
        token: Option<&str>,
        local: &Path,
        expected_len: Option<u64>,
    ) -> Result<bool> {
        let Some(token) = token else {
            return Ok(false);
        };

        if !exists(&self.marker_path(key, token)).await? {
            trace!(key, token, "no marker for change token");
            return Ok(false);
        }

        let local_len = match fs::metadata(local).await {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => return Ok(false),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(key, path = %local.display(), "marker found but file is gone");
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        };

        match expected_len {
            Some(expected) if expected == local_len => Ok(true),
            _ => {
                debug!(key, local_len, ?expected_len, "marker found but file length unconfirmed");
                Ok(false)
            }
        }
    }

    /// Remember `token` as the token of the file now on disk for `key`.
    ///
    /// Markers of earlier tokens for the same key are removed.
    pub async fn record(&self, key: &str, token: &str) -> Result<()> {
        let dir = self.root.join(key);
        fs::create_dir_all(&dir).await?;

        let marker = self.marker_path(key, token);
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() && entry.path() != marker {
                fs::remove_file(entry.path()).await?;
            }
        }

        if !exists(&marker).await? {
            fs::File::create(&marker).await?;
            debug!(key, token, "recorded change token");
        }
        Ok(())
    }
}

async fn exists(path: &Path) -> Result<bool> { Ok(fs::try_exists(path).await?) }
