use std::io::{self, ErrorKind};
use std::path::Path;

use tokio::fs;
use tracing::{debug, warn};

use crate::data::ChunkPlan;
use crate::error::Result;

/// Name of the plan file inside a chunk directory. Chunk files are named by
/// index, so it can never collide with one.
pub const PLAN_FILE: &str = "plan.json";

/// The plan stored in `chunk_dir`, or `None` if it is missing or unreadable.
pub async fn read_plan(chunk_dir: &Path) -> Result<Option<ChunkPlan>> {
    let raw = match fs::read(chunk_dir.join(PLAN_FILE)).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    match serde_json::from_slice(&raw) {
        Ok(plan) => Ok(Some(plan)),
        Err(err) => {
            warn!(dir = %chunk_dir.display(), %err, "unreadable chunk plan");
            Ok(None)
        }
    }
}

pub async fn write_plan(chunk_dir: &Path, plan: &ChunkPlan) -> Result<()> {
    let raw = serde_json::to_vec_pretty(plan).map_err(io::Error::from)?;
    fs::write(chunk_dir.join(PLAN_FILE), raw).await?;
    Ok(())
}

/// Make `chunk_dir` hold chunks for `plan` only.
///
/// An existing directory whose stored plan differs, or that has none, is
/// discarded: its chunk `i` was written for some other byte range.
pub(crate) async fn prepare_chunk_dir(chunk_dir: &Path, plan: &ChunkPlan) -> Result<()> {
    if fs::try_exists(chunk_dir).await? {
        match read_plan(chunk_dir).await? {
            Some(stored) if stored == *plan => {
                debug!(dir = %chunk_dir.display(), "resuming chunks of the same plan");
                return Ok(());
            }
            stored => {
                warn!(
                    dir = %chunk_dir.display(),
                    had_plan = stored.is_some(),
                    "chunk directory belongs to a different plan, discarding"
                );
                fs::remove_dir_all(chunk_dir).await?;
            }
        }
    }
    fs::create_dir_all(chunk_dir).await?;
    write_plan(chunk_dir, plan).await
}
