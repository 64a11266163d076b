//! Per-run accounting: outcome of each artifact and aggregate counters.

use crate::catalog::{ArtifactDescriptor, BYTES_PER_MB};
use crate::fetch::FailureKind;
use std::fmt;

/// Why an artifact ended up failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The transfer itself failed.
    Transfer { kind: FailureKind, message: String },
    /// The transfer completed but the file size is outside tolerance.
    SizeMismatch { actual: Option<u64>, expected: u64 },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Transfer { message, .. } => write!(f, "{}", message),
            FailureReason::SizeMismatch {
                actual: Some(actual),
                expected,
            } => write!(f, "size mismatch: got {} bytes, expected {}", actual, expected),
            FailureReason::SizeMismatch {
                actual: None,
                expected,
            } => write!(f, "file missing after transfer (expected {} bytes)", expected),
        }
    }
}

/// Terminal state of one artifact within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// Already present and within tolerance.
    Skipped,
    /// Fetched and verified; `bytes` is the declared expected size.
    Downloaded { bytes: u64 },
    Failed(FailureReason),
}

impl ArtifactOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactOutcome::Skipped => "skipped",
            ArtifactOutcome::Downloaded { .. } => "downloaded",
            ArtifactOutcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub category: String,
    pub name: String,
    pub filename: String,
    pub outcome: ArtifactOutcome,
}

/// Accumulated result of one provisioning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Sum of declared sizes of downloaded artifacts.
    pub downloaded_bytes: u64,
    /// One record per processed artifact, in processing order.
    pub records: Vec<ArtifactRecord>,
}

impl RunSummary {
    pub fn record(&mut self, artifact: &ArtifactDescriptor, outcome: ArtifactOutcome) {
        match &outcome {
            ArtifactOutcome::Skipped => self.skipped += 1,
            ArtifactOutcome::Downloaded { bytes } => {
                self.downloaded += 1;
                self.downloaded_bytes += bytes;
            }
            ArtifactOutcome::Failed(_) => self.failed += 1,
        }
        self.records.push(ArtifactRecord {
            category: artifact.category.clone(),
            name: artifact.name.clone(),
            filename: artifact.filename.clone(),
            outcome,
        });
    }

    /// True iff no artifact failed.
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }

    pub fn downloaded_mb(&self) -> f64 {
        self.downloaded_bytes as f64 / BYTES_PER_MB as f64
    }

    /// Emit the summary as log events.
    pub fn log(&self) {
        tracing::info!(
            downloaded = self.downloaded,
            downloaded_bytes = self.downloaded_bytes,
            skipped = self.skipped,
            failed = self.failed,
            "provisioning summary"
        );
        if self.success() {
            tracing::info!("all artifacts present");
        } else {
            tracing::warn!(
                failed = self.failed,
                "some artifacts failed to download; check network access and rerun"
            );
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Downloaded: {} ({:.1} MB)", self.downloaded, self.downloaded_mb())?;
        writeln!(f, "Skipped:    {} (already present)", self.skipped)?;
        write!(f, "Failed:     {}", self.failed)
    }
}
