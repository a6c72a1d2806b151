use std::io::SeekFrom;
use std::path::Path;

use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tracing::debug;

use crate::core::chunk_path;
use crate::error::{FetchError, Result};

/// Concatenate chunk files `0..count` into `destination`, in index order.
///
/// The destination is truncated first. Once every chunk is copied the chunk
/// directory is removed and the destination handle is returned, opened for
/// reading and writing and positioned at the start.
pub async fn assemble(destination: &Path, chunk_dir: &Path, count: usize) -> Result<File> {
    let mut output = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(destination)
        .await?;

    for index in 0..count {
        let assembly = |source| FetchError::Assembly { index, source };
        let mut chunk = File::open(chunk_path(chunk_dir, index))
            .await
            .map_err(assembly)?;
        let copied = tokio::io::copy(&mut chunk, &mut output)
            .await
            .map_err(assembly)?;
        debug!(index, bytes = copied, "chunk appended");
    }
    output.flush().await?;

    fs::remove_dir_all(chunk_dir).await?;
    output.seek(SeekFrom::Start(0)).await?;
    Ok(output)
}

/// Move a finished single-stream download into place.
pub async fn promote(part: &Path, destination: &Path) -> Result<File> {
    fs::rename(part, destination).await?;
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(destination)
        .await?;
    Ok(file)
}
