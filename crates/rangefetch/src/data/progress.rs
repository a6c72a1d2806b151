use tokio::sync::mpsc;

/// One progress event of a fetch.
///
/// `written` never accumulates: it is the size of a single write to a chunk
/// file, or, when `resumed` is set, the bytes a previous run already left on
/// disk for one range. Consumers sum the events to get a running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    /// Total length of the resource, `None` when the server did not say.
    pub total:   Option<u64>,
    pub written: u64,
    pub resumed: bool,
}

impl ProgressReport {
    pub fn written(total: Option<u64>, written: u64) -> Self {
        Self {
            total,
            written,
            resumed: false,
        }
    }

    pub fn resumed(total: Option<u64>, present: u64) -> Self {
        Self {
            total,
            written: present,
            resumed: true,
        }
    }

    /// Fraction of `total` this single event accounts for.
    #[must_use]
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(0) | None => None,
            Some(total) => Some(self.written as f64 / total as f64),
        }
    }
}

pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressReport>;

/// Sending half of a progress channel.
///
/// It is handed to [`Fetcher::fetch`](crate::Fetcher::fetch) by value and
/// cannot be cloned from outside the crate, so the matching
/// [`ProgressReceiver`] yields `None` exactly when that fetch has finished.
#[derive(Debug)]
pub struct ProgressSender {
    tx: mpsc::UnboundedSender<ProgressReport>,
}

impl ProgressSender {
    pub(crate) fn fork(&self) -> Self { Self { tx: self.tx.clone() } }

    pub(crate) fn report(&self, report: ProgressReport) {
        // A dropped receiver only means nobody is watching.
        let _ = self.tx.send(report);
    }
}

/// Creates an unbounded progress channel; sending never waits on the consumer.
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender { tx }, rx)
}
