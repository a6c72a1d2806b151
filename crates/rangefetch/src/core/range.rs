use crate::data::{ByteRange, ContentMetadata};
use crate::error::{FetchError, Result};

/// Split a resource into `concurrency` contiguous byte ranges.
///
/// Every range gets `total / concurrency` bytes and the last one also takes
/// the remainder, so the ranges cover `[0, total)` without gaps or overlap.
/// With an unknown length a single open-ended range is returned whatever the
/// requested concurrency. Concurrency is capped at `total` so no range is
/// ever empty, except the lone range of an empty resource.
pub fn plan_ranges(total: Option<u64>, concurrency: usize) -> Result<Vec<ByteRange>> {
    if concurrency < 1 {
        return Err(FetchError::InvalidConfiguration(
            "concurrency must be at least 1".into(),
        ));
    }

    let Some(total) = total else {
        return Ok(vec![ByteRange {
            index: 0,
            start: 0,
            end:   None,
        }]);
    };

    let count = (concurrency as u64).min(total).max(1);
    let chunk_size = total / count;
    let remainder = total % count;

    let ranges = (0..count)
        .map(|i| {
            let start = chunk_size * i;
            let mut end = chunk_size * (i + 1);
            if i == count - 1 {
                end += remainder;
            }
            ByteRange {
                index: i as usize,
                start,
                end: Some(end),
            }
        })
        .collect();

    Ok(ranges)
}

/// Number of workers worth running for a resource.
///
/// Parallel fetching needs a known length and range support; beyond that the
/// resource is split only as far as every worker gets `min_chunk_size` bytes.
pub fn effective_concurrency(meta: &ContentMetadata, requested: usize, min_chunk_size: u64) -> usize {
    match meta.length {
        Some(length) if meta.accepts_ranges => {
            let by_size = (length / min_chunk_size.max(1)).max(1);
            requested.min(usize::try_from(by_size).unwrap_or(usize::MAX))
        }
        _ => 1,
    }
}
