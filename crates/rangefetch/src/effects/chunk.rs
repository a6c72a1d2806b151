use std::io;
use std::path::Path;

use futures_util::TryStreamExt;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

use crate::core::{is_partial, is_success};
use crate::data::{ByteRange, ProgressReport, ProgressSender};
use crate::effects::http::HttpClient;
use crate::effects::writer::ProgressWriter;
use crate::error::{FetchError, Result};

/// Download one byte range into `path`, resuming from whatever the file
/// already holds.
///
/// Returns the number of bytes written by this call. A file that already
/// covers the whole range is reported as resumed and no request is made.
pub async fn fetch_range<C: HttpClient>(
    client: &C,
    url: &str,
    path: &Path,
    range: ByteRange,
    total: Option<u64>,
    sink: Option<&ProgressSender>,
) -> Result<u64> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    let mut present = file.metadata().await?.len();
    let width = range.len();

    if let Some(width) = width {
        if present == width {
            debug!(index = range.index, bytes = present, "range already on disk");
            if present > 0 {
                report(sink, ProgressReport::resumed(total, present));
            }
            return Ok(0);
        }
        if present > width {
            warn!(
                index = range.index,
                present, width, "chunk file is longer than its range, starting over"
            );
            file.set_len(0).await?;
            present = 0;
        }
    }

    let header = range.header_value(present);
    debug!(index = range.index, range = %header, "requesting range");
    let response = client
        .get(url, &header)
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if !is_success(response.status) {
        return Err(FetchError::Upstream {
            url:    url.to_string(),
            status: response.status,
        });
    }

    let offset = range.start + present;
    if offset > 0 && !is_partial(response.status) {
        if range.start != 0 {
            return Err(FetchError::RangeIgnored {
                index: range.index,
                start: offset,
            });
        }
        // The full body starts at byte 0 of this range, so it can simply be
        // written again from scratch.
        warn!(
            index = range.index,
            status = response.status,
            present,
            "server ignored resume offset, discarding partial data"
        );
        file.set_len(0).await?;
        present = 0;
    } else if present > 0 {
        debug!(index = range.index, bytes = present, "resuming range");
        report(sink, ProgressReport::resumed(total, present));
    }

    let remaining = width.map_or(u64::MAX, |width| width - present);
    let body = response.body.map_err(io::Error::other);
    let mut reader = StreamReader::new(body).take(remaining);
    let mut writer = ProgressWriter::new(&mut file, sink, total);

    let copied = tokio::io::copy(&mut reader, &mut writer)
        .await
        .map_err(|e| transfer_error::<C>(e))?;
    writer.flush().await?;

    if let Some(width) = width {
        let received = present + copied;
        if received < width {
            return Err(FetchError::Incomplete {
                index: range.index,
                expected: width,
                received,
            });
        }
    }

    debug!(index = range.index, bytes = copied, "range complete");
    Ok(copied)
}

fn report(sink: Option<&ProgressSender>, report: ProgressReport) {
    if let Some(sink) = sink {
        sink.report(report);
    }
}

/// Body errors arrive wrapped in `io::Error`; unwrap them back into network
/// failures so they are not mistaken for local disk errors.
fn transfer_error<C: HttpClient>(err: io::Error) -> FetchError {
    match err.get_ref().and_then(|inner| inner.downcast_ref::<C::Error>()) {
        Some(inner) => FetchError::Network(inner.to_string()),
        None => FetchError::Io(err),
    }
}
