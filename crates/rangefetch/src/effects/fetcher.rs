use std::io::SeekFrom;
use std::path::Path;
use std::sync::Arc;

use tokio::fs::{self, File};
use tokio::io::AsyncSeekExt;
use tracing::{debug, info, warn};

use crate::core::{Layout, effective_concurrency, is_success, plan_ranges, resource_name};
use crate::data::{
    ByteRange, ChangeTracking, ChunkPlan, ContentMetadata, FetchOptions, FetchPhase, ProgressSender,
};
use crate::effects::assemble::{assemble, promote};
use crate::effects::cache::ChangeTokenCache;
use crate::effects::chunk::fetch_range;
use crate::effects::http::HttpClient;
use crate::effects::plan::{prepare_chunk_dir, read_plan};
use crate::effects::verify::verify_file;
use crate::error::{FetchError, PartialTransferError, RangeFailure, Result};

/// Downloads resources into [`FetchOptions::dest_dir`].
///
/// A fetcher is cheap to share behind an `Arc`; every call to
/// [`fetch`](Self::fetch) is independent, but two concurrent fetches of the
/// same file name into the same directory will trample each other's chunks.
pub struct Fetcher<C: HttpClient> {
    client:  Arc<C>,
    options: FetchOptions,
    tokens:  Option<ChangeTokenCache>,
}

impl<C: HttpClient> Fetcher<C> {
    /// Create a fetcher around `client`, rejecting invalid options up front.
    pub fn new(client: C, options: FetchOptions) -> Result<Self> {
        options.validate()?;
        let tokens = match &options.change_tracking {
            ChangeTracking::Disabled => None,
            ChangeTracking::Enabled { cache_root } => Some(ChangeTokenCache::new(cache_root)),
        };
        Ok(Self {
            client: Arc::new(client),
            options,
            tokens,
        })
    }

    pub fn options(&self) -> &FetchOptions { &self.options }

    /// Download `url` into `<dest_dir>/<file name of url>` and return an open
    /// handle to it, positioned at the start.
    ///
    /// If `progress` is given, one [`ProgressReport`](crate::ProgressReport)
    /// is sent per write to disk, plus one per range already on disk from an
    /// earlier attempt. The sender is dropped before this returns, so the
    /// receiver ends exactly when the fetch does, success or not.
    ///
    /// An interrupted fetch leaves its chunk files behind; fetching the same
    /// URL into the same directory again resumes from them.
    pub async fn fetch(&self, url: &str, progress: Option<ProgressSender>) -> Result<File> {
        let url = url.trim();
        if url.is_empty() {
            return Err(FetchError::InvalidConfiguration("URL is empty".into()));
        }
        let name = resource_name(url)?;
        let layout = Layout::new(&self.options.dest_dir, &name);
        info!(url, destination = %layout.destination.display(), "fetch started");

        let head = self
            .client
            .head(url)
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        if !is_success(head.status) {
            return Err(FetchError::Upstream {
                url:    url.to_string(),
                status: head.status,
            });
        }
        let meta = head.metadata();
        debug!(
            phase = %FetchPhase::Preflight,
            length = ?meta.length,
            accepts_ranges = meta.accepts_ranges,
            change_token = ?meta.change_token,
            "metadata received"
        );

        if let Some(tokens) = &self.tokens {
            let token = meta.change_token.as_deref();
            if tokens
                .should_skip(&name, token, &layout.destination, meta.length)
                .await?
            {
                info!(
                    phase = %FetchPhase::CacheHit,
                    destination = %layout.destination.display(),
                    "change token unchanged, skipping download"
                );
                drop(progress);
                return Ok(File::open(&layout.destination).await?);
            }
        }

        fs::create_dir_all(&self.options.dest_dir).await?;

        let workers = effective_concurrency(&meta, self.options.concurrency, self.options.min_chunk_size);
        let ranges = plan_ranges(meta.length, workers)?;
        debug!(
            phase = %FetchPhase::Planning,
            requested = self.options.concurrency,
            ranges = ranges.len(),
            "ranges planned"
        );

        let mut file = if let [range] = ranges[..] {
            self.fetch_single(url, &layout, range, &meta, progress.as_ref())
                .await?
        } else {
            self.fetch_parallel(url, &layout, ranges, &meta, progress.as_ref())
                .await?
        };
        drop(progress);

        if let Some(checksum) = &self.options.checksum {
            debug!(phase = %FetchPhase::Verifying, algorithm = %checksum.algorithm, "verifying");
            verify_file(&mut file, checksum, &layout.destination).await?;
        }
        file.seek(SeekFrom::Start(0)).await?;

        if let (Some(tokens), Some(token)) = (&self.tokens, meta.change_token.as_deref()) {
            tokens.record(&name, token).await?;
        }

        info!(
            phase = %FetchPhase::Done,
            destination = %layout.destination.display(),
            "fetch complete"
        );
        Ok(file)
    }

    async fn fetch_single(
        &self,
        url: &str,
        layout: &Layout,
        range: ByteRange,
        meta: &ContentMetadata,
        sink: Option<&ProgressSender>,
    ) -> Result<File> {
        adopt_first_chunk(layout, meta).await?;

        debug!(phase = %FetchPhase::Downloading, part = %layout.part_file.display(), "single stream");
        fetch_range(&*self.client, url, &layout.part_file, range, meta.length, sink).await?;

        debug!(phase = %FetchPhase::Assembling, "promoting part file");
        promote(&layout.part_file, &layout.destination).await
    }

    async fn fetch_parallel(
        &self,
        url: &str,
        layout: &Layout,
        ranges: Vec<ByteRange>,
        meta: &ContentMetadata,
        sink: Option<&ProgressSender>,
    ) -> Result<File> {
        prepare_chunk_dir(&layout.chunk_dir, &ChunkPlan::new(meta, &ranges)).await?;
        adopt_part_file(layout).await?;

        let total = meta.length;
        let count = ranges.len();
        debug!(phase = %FetchPhase::Downloading, ranges = count, "parallel ranges");

        let handles: Vec<_> = ranges
            .into_iter()
            .map(|range| {
                let client = Arc::clone(&self.client);
                let url = url.to_string();
                let path = layout.chunk_path(range.index);
                let sink = sink.map(ProgressSender::fork);
                let handle = tokio::spawn(async move {
                    fetch_range(&*client, &url, &path, range, total, sink.as_ref()).await
                });
                (range.index, handle)
            })
            .collect();

        let mut failures = Vec::new();
        for (index, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join) => Err(FetchError::Task(join.to_string())),
            };
            match outcome {
                Ok(bytes) => debug!(index, bytes, "range finished"),
                Err(error) => {
                    warn!(index, %error, "range failed");
                    failures.push(RangeFailure { index, error });
                }
            }
        }
        if !failures.is_empty() {
            return Err(PartialTransferError { failures }.into());
        }

        debug!(phase = %FetchPhase::Assembling, chunks = count, "assembling chunks");
        assemble(&layout.destination, &layout.chunk_dir, count).await
    }
}

#[cfg(feature = "reqwest")]
impl Fetcher<crate::effects::http::ReqwestClient> {
    /// Fetcher backed by a `reqwest` client honouring [`FetchOptions::timeout`].
    pub fn with_options(options: FetchOptions) -> Result<Self> {
        let client = crate::effects::http::ReqwestClient::with_timeout(options.timeout)?;
        Self::new(client, options)
    }
}

/// Single-stream fetches take over the first chunk of an earlier parallel
/// attempt, since it starts at byte 0 too, provided that attempt was for
/// the same resource.
async fn adopt_first_chunk(layout: &Layout, meta: &ContentMetadata) -> Result<()> {
    if !exists(&layout.chunk_dir).await? {
        return Ok(());
    }
    let first = layout.chunk_path(0);
    if !exists(&layout.part_file).await? && exists(&first).await? {
        let stored = read_plan(&layout.chunk_dir).await?;
        if stored.as_ref().is_some_and(|plan| plan.same_resource(meta)) {
            debug!(from = %first.display(), to = %layout.part_file.display(), "adopting leftover chunk");
            fs::rename(&first, &layout.part_file).await?;
        } else {
            warn!(
                dir = %layout.chunk_dir.display(),
                had_plan = stored.is_some(),
                "leftover chunks belong to a different resource, discarding"
            );
        }
    }
    fs::remove_dir_all(&layout.chunk_dir).await?;
    Ok(())
}

/// The reverse of [`adopt_first_chunk`]: a leftover part file becomes chunk 0.
async fn adopt_part_file(layout: &Layout) -> Result<()> {
    if !exists(&layout.part_file).await? {
        return Ok(());
    }
    let first = layout.chunk_path(0);
    if exists(&first).await? {
        fs::remove_file(&layout.part_file).await?;
    } else {
        debug!(from = %layout.part_file.display(), to = %first.display(), "adopting leftover part file");
        fs::rename(&layout.part_file, &first).await?;
    }
    Ok(())
}

async fn exists(path: &Path) -> Result<bool> { Ok(fs::try_exists(path).await?) }
