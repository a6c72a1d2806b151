use std::io::SeekFrom;
use std::path::Path;

use rangefetch_verify::{Checksum, VerifyError};
use tokio::fs::File;
use tokio::io::AsyncSeekExt;
use tracing::{debug, warn};

use crate::error::{FetchError, Result};

/// Hash the whole of `file` against `checksum` on the blocking pool.
///
/// `file` is left positioned at the start whatever the outcome. On a
/// mismatch the file is kept and the error names `path`.
pub async fn verify_file(file: &mut File, checksum: &Checksum, path: &Path) -> Result<u64> {
    file.seek(SeekFrom::Start(0)).await?;
    let reader = file.try_clone().await?.into_std().await;
    let expected = checksum.clone();

    let outcome = tokio::task::spawn_blocking(move || expected.verify_reader(reader))
        .await
        .map_err(|e| FetchError::Task(e.to_string()))?;
    file.seek(SeekFrom::Start(0)).await?;

    match outcome {
        Ok(bytes) => {
            debug!(algorithm = %checksum.algorithm, bytes, "checksum verified");
            Ok(bytes)
        }
        Err(VerifyError::Mismatch { expected, actual }) => {
            warn!(path = %path.display(), %expected, %actual, "checksum mismatch");
            Err(FetchError::IntegrityMismatch {
                path: path.to_path_buf(),
                expected,
                actual,
            })
        }
        Err(VerifyError::UnsupportedAlgorithm(name)) => Err(FetchError::UnsupportedAlgorithm(name)),
        Err(err @ VerifyError::InvalidDigest { .. }) => {
            Err(FetchError::InvalidConfiguration(err.to_string()))
        }
        Err(VerifyError::Io(err)) => Err(FetchError::Io(err)),
    }
}
