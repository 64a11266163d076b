//! Progress reporting for artifact transfers (bytes done, rate, ETA).
//!
//! Transfers report through [`ProgressSink`]; the CLI renders a console line,
//! tests record calls or ignore them with [`NoProgress`].

use crate::catalog::ArtifactDescriptor;
use std::time::Instant;

/// Observer for transfer progress.
pub trait ProgressSink {
    /// Called before the transfer of `artifact` starts.
    fn begin(&mut self, _artifact: &ArtifactDescriptor) {}

    /// Called after each chunk is written. `total` is the advertised
    /// `Content-Length`, if any.
    fn on_progress(&mut self, bytes_done: u64, total: Option<u64>);

    /// Called once the transfer ends, successfully or not.
    fn finish(&mut self) {}
}

/// Sink that discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _bytes_done: u64, _total: Option<u64>) {}
}

/// Snapshot of one transfer's progress (CLI-friendly).
#[derive(Debug, Clone)]
pub struct TransferStats {
    /// Bytes written so far.
    pub bytes_done: u64,
    /// Advertised total size, if the server sent `Content-Length`.
    pub total_bytes: Option<u64>,
    /// Elapsed time since the transfer started (seconds).
    pub elapsed_secs: f64,
}

impl TransferStats {
    pub fn since(started: Instant, bytes_done: u64, total_bytes: Option<u64>) -> Self {
        Self {
            bytes_done,
            total_bytes,
            elapsed_secs: started.elapsed().as_secs_f64(),
        }
    }

    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if total unknown or rate is 0).
    pub fn eta_secs(&self) -> Option<f64> {
        let total = self.total_bytes?;
        let remaining = total.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0], if the total is known.
    pub fn fraction(&self) -> Option<f64> {
        let total = self.total_bytes?;
        if total == 0 {
            return Some(1.0);
        }
        Some((self.bytes_done as f64 / total as f64).min(1.0))
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.total_bytes, Some(total) if self.bytes_done >= total)
    }
}
