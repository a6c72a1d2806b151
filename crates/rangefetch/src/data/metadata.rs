use serde::{Deserialize, Serialize};

/// What the preflight request told us about the remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentMetadata {
    /// Total length in bytes, `None` when the server omitted `Content-Length`.
    pub length:         Option<u64>,
    pub accepts_ranges: bool,
    /// Normalised change token (`ETag`), `None` when absent or empty.
    pub change_token:   Option<String>,
}

/// A contiguous slice of the resource, fetched by one worker.
///
/// `end` is exclusive; `None` means "to the end of the stream", which is only
/// planned when the total length is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub index: usize,
    pub start: u64,
    pub end:   Option<u64>,
}

impl ByteRange {
    /// Width of the range, `None` if open-ended.
    pub fn len(&self) -> Option<u64> { self.end.map(|end| end - self.start) }

    pub fn is_empty(&self) -> bool { self.len() == Some(0) }

    /// `Range` header value asking for this range minus the first `present`
    /// bytes, which are already on disk.
    pub fn header_value(&self, present: u64) -> String {
        let from = self.start + present;
        match self.end {
            Some(end) => format!("bytes={}-{}", from, end.saturating_sub(1)),
            None => format!("bytes={from}-"),
        }
    }
}

/// The ranges a chunk directory was filled for.
///
/// Stored next to the chunk files; chunk `i` on disk only belongs to range
/// `i` of the current fetch when the stored plan equals the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPlan {
    pub total:        Option<u64>,
    pub change_token: Option<String>,
    pub ranges:       Vec<ByteRange>,
}

impl ChunkPlan {
    pub fn new(meta: &ContentMetadata, ranges: &[ByteRange]) -> Self {
        Self {
            total:        meta.length,
            change_token: meta.change_token.clone(),
            ranges:       ranges.to_vec(),
        }
    }

    /// Whether chunk 0 of this plan is a prefix of the resource `meta` describes.
    pub fn same_resource(&self, meta: &ContentMetadata) -> bool {
        self.total.is_some() && self.total == meta.length && self.change_token == meta.change_token
    }
}
