//! Progress reporting for the artifact download.
//!
//! The fetcher pushes snapshots over a bounded channel with `try_send`; a slow
//! consumer simply misses intermediate updates.

use tokio::sync::mpsc::Sender;

/// Snapshot of one download's progress (CLI-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Body bytes written so far.
    pub bytes_transferred: u64,
    /// Declared `Content-Length`, if the server sent one.
    pub bytes_total: Option<u64>,
}

impl DownloadProgress {
    /// Whole percentage, truncated. None when the total is unknown.
    pub fn percent(&self) -> Option<u8> {
        let total = self.bytes_total?;
        if total == 0 {
            return Some(100);
        }
        let pct = (self.bytes_transferred.min(total) as u128 * 100) / total as u128;
        Some(pct as u8)
    }

    pub fn is_complete(&self) -> bool {
        self.bytes_total
            .map(|t| self.bytes_transferred >= t)
            .unwrap_or(false)
    }
}

/// Tracks bytes and emits a snapshot when something worth showing changed:
/// a new whole percentage with a known total, every chunk otherwise.
#[derive(Debug)]
pub(crate) struct ProgressReporter {
    tx: Option<Sender<DownloadProgress>>,
    current: DownloadProgress,
    last_percent: Option<u8>,
}

impl ProgressReporter {
    pub(crate) fn new(tx: Option<Sender<DownloadProgress>>) -> Self {
        Self {
            tx,
            current: DownloadProgress {
                bytes_transferred: 0,
                bytes_total: None,
            },
            last_percent: None,
        }
    }

    pub(crate) fn start(&mut self, bytes_total: Option<u64>) {
        self.current = DownloadProgress {
            bytes_transferred: 0,
            bytes_total,
        };
        self.last_percent = None;
    }

    /// Record `n` more bytes. Returns true if a snapshot was emitted.
    pub(crate) fn advance(&mut self, n: u64) -> bool {
        self.current.bytes_transferred += n;
        match self.current.percent() {
            Some(pct) if self.last_percent == Some(pct) => false,
            Some(pct) => {
                self.last_percent = Some(pct);
                self.emit()
            }
            None => self.emit(),
        }
    }

    pub(crate) fn snapshot(&self) -> DownloadProgress {
        self.current
    }

    fn emit(&self) -> bool {
        if let Some(tx) = &self.tx {
            let _ = tx.try_send(self.current);
        }
        true
    }
}
