//! In-memory HTTP server double shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use rangefetch::{GetResponse, HeadResponse, HttpClient, ProgressReceiver, ProgressReport};

pub const URL: &str = "http://mock.test/files/fixture.bin";
pub const FILE_NAME: &str = "fixture.bin";

/// Deterministic payload: byte `i` is `i % 251`.
pub fn fixture(len: usize) -> Vec<u8> { (0..len).map(|i| (i % 251) as u8).collect() }

#[derive(Debug, thiserror::Error)]
#[error("mock transport failure: {0}")]
pub struct MockError(pub String);

/// What the mock server advertises and how it answers.
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub data:             Bytes,
    pub head_status:      u16,
    pub advertise_length: bool,
    pub accept_ranges:    bool,
    pub honour_ranges:    bool,
    pub etag:             Option<String>,
    /// Requests starting at one of these offsets get a 500.
    pub fail_starts:      HashSet<u64>,
    /// Size of each body frame.
    pub write_size:       usize,
    /// End every body with a transport error instead of a clean close.
    pub broken_body:      bool,
}

impl MockConfig {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data:             Bytes::from(data),
            head_status:      200,
            advertise_length: true,
            accept_ranges:    true,
            honour_ranges:    true,
            etag:             None,
            fail_starts:      HashSet::new(),
            write_size:       16 * 1024,
            broken_body:      false,
        }
    }

    pub fn client(self) -> MockClient {
        MockClient {
            inner: Arc::new(Inner {
                config: self,
                heads:  AtomicUsize::new(0),
                gets:   AtomicUsize::new(0),
                ranges: Mutex::new(Vec::new()),
            }),
        }
    }
}

#[derive(Debug)]
struct Inner {
    config: MockConfig,
    heads:  AtomicUsize,
    gets:   AtomicUsize,
    ranges: Mutex<Vec<String>>,
}

/// Cloning shares the request counters, so a test can keep a handle while
/// the fetcher owns another.
#[derive(Debug, Clone)]
pub struct MockClient {
    inner: Arc<Inner>,
}

impl MockClient {
    pub fn heads(&self) -> usize { self.inner.heads.load(Ordering::SeqCst) }

    pub fn gets(&self) -> usize { self.inner.gets.load(Ordering::SeqCst) }

    /// Every `Range` header received, in arrival order.
    pub fn ranges(&self) -> Vec<String> { self.inner.ranges.lock().unwrap().clone() }

    fn answer(&self, range: &str) -> std::result::Result<GetResponse<MockError>, MockError> {
        let config = &self.inner.config;
        let len = config.data.len() as u64;
        let (start, end) = parse_range(range, len)?;

        if config.fail_starts.contains(&start) {
            return Ok(GetResponse {
                status: 500,
                body:   Box::pin(futures_util::stream::empty()),
            });
        }

        let (status, slice) = if config.honour_ranges {
            (206, config.data.slice(start as usize..end as usize))
        } else {
            (200, config.data.clone())
        };
        let mut frames = frames(slice, config.write_size);
        if config.broken_body {
            frames.push(Err(MockError("connection reset".into())));
        }
        Ok(GetResponse {
            status,
            body: Box::pin(futures_util::stream::iter(frames)),
        })
    }
}

impl HttpClient for MockClient {
    type Error = MockError;

    fn head(
        &self,
        _url: &str,
    ) -> impl Future<Output = std::result::Result<HeadResponse, Self::Error>> + Send {
        self.inner.heads.fetch_add(1, Ordering::SeqCst);
        let config = &self.inner.config;
        let response = HeadResponse {
            status:         config.head_status,
            content_length: config.advertise_length.then_some(config.data.len() as u64),
            accept_ranges:  config.accept_ranges.then(|| "bytes".to_string()),
            etag:           config.etag.as_ref().map(|tag| format!("\"{tag}\"")),
        };
        async move { Ok(response) }
    }

    fn get(
        &self,
        _url: &str,
        range: &str,
    ) -> impl Future<Output = std::result::Result<GetResponse<Self::Error>, Self::Error>> + Send {
        self.inner.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.ranges.lock().unwrap().push(range.to_string());
        let answer = self.answer(range);
        async move { answer }
    }
}

/// `bytes=<a>-<b>` (inclusive) or `bytes=<a>-`, as an exclusive `[start, end)`.
fn parse_range(header: &str, len: u64) -> std::result::Result<(u64, u64), MockError> {
    let bad = || MockError(format!("malformed range {header:?}"));
    let bounds = header.strip_prefix("bytes=").ok_or_else(bad)?;
    let (from, to) = bounds.split_once('-').ok_or_else(bad)?;
    let start: u64 = from.parse().map_err(|_| bad())?;
    let end = match to {
        "" => len,
        to => to.parse::<u64>().map_err(|_| bad())? + 1,
    };
    Ok((start.min(len), end.min(len)))
}

fn frames(data: Bytes, size: usize) -> Vec<std::result::Result<Bytes, MockError>> {
    let mut frames = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let next = (offset + size).min(data.len());
        frames.push(Ok(data.slice(offset..next)));
        offset = next;
    }
    frames
}

/// Drain a progress receiver until its fetch drops the sender.
pub async fn collect(mut rx: ProgressReceiver) -> Vec<ProgressReport> {
    let mut reports = Vec::new();
    while let Some(report) = rx.recv().await {
        reports.push(report);
    }
    reports
}

pub fn transferred(reports: &[ProgressReport]) -> u64 {
    reports.iter().filter(|r| !r.resumed).map(|r| r.written).sum()
}

pub fn resumed(reports: &[ProgressReport]) -> Vec<u64> {
    reports.iter().filter(|r| r.resumed).map(|r| r.written).collect()
}
