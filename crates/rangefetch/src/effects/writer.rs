use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::AsyncWrite;

use crate::data::{ProgressReport, ProgressSender};

/// `AsyncWrite` adapter that reports the size of every successful write.
///
/// One event is emitted per accepted write, holding only that write's byte
/// count; zero-byte writes are not reported.
pub struct ProgressWriter<'a, W> {
    inner: W,
    sink:  Option<&'a ProgressSender>,
    total: Option<u64>,
}

impl<'a, W: AsyncWrite + Unpin> ProgressWriter<'a, W> {
    pub fn new(inner: W, sink: Option<&'a ProgressSender>, total: Option<u64>) -> Self {
        Self { inner, sink, total }
    }

    pub fn into_inner(self) -> W { self.inner }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for ProgressWriter<'_, W> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let poll = Pin::new(&mut this.inner).poll_write(cx, buf);
        if let (Poll::Ready(Ok(n)), Some(sink)) = (&poll, this.sink) {
            if *n > 0 {
                sink.report(ProgressReport::written(this.total, *n as u64));
            }
        }
        poll
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
