//! Console output: run header, per-transfer progress line, outcome table and summary.

use modelfetch_core::catalog::{ArtifactDescriptor, Catalog};
use modelfetch_core::progress::{ProgressSink, TransferStats};
use modelfetch_core::provision::{ArtifactOutcome, ProvisionOptions, RunSummary};
use std::io::Write;
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);
const MIB: f64 = 1_048_576.0;
const RULE_WIDTH: usize = 72;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn print_header(catalog: &Catalog, opts: &ProvisionOptions) {
    println!("{}", rule());
    println!(
        "modelfetch: {} artifact(s) in {} categor{} -> {}{}",
        catalog.len(),
        catalog.categories().len(),
        if catalog.categories().len() == 1 { "y" } else { "ies" },
        opts.models_dir.display(),
        if opts.force { " (force)" } else { "" }
    );
    println!("{}", rule());
}

/// Renders a throttled single-line progress indicator for the current transfer.
#[derive(Default)]
pub struct ConsoleProgress {
    started: Option<Instant>,
    last_print: Option<Instant>,
    last_stats: Option<TransferStats>,
}

impl ConsoleProgress {
    fn render(stats: &TransferStats) -> String {
        let done_mib = stats.bytes_done as f64 / MIB;
        let rate_mib = stats.bytes_per_sec() / MIB;
        match (stats.total_bytes, stats.fraction()) {
            (Some(total), Some(fraction)) => {
                let eta = stats
                    .eta_secs()
                    .map(|s| format!("{:.0}s", s))
                    .unwrap_or_else(|| "?".to_string());
                format!(
                    "\r  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ETA {}  ",
                    done_mib,
                    total as f64 / MIB,
                    fraction * 100.0,
                    rate_mib,
                    eta
                )
            }
            _ => format!("\r  {:.1} MiB  {:.2} MiB/s  ", done_mib, rate_mib),
        }
    }

    fn print(stats: &TransferStats) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "{}", Self::render(stats));
        let _ = out.flush();
    }
}

impl ProgressSink for ConsoleProgress {
    fn begin(&mut self, artifact: &ArtifactDescriptor) {
        println!(
            "Downloading {}/{} ({:.0} MB)...",
            artifact.category,
            artifact.filename,
            artifact.expected_size_mb()
        );
        self.started = Some(Instant::now());
        self.last_print = None;
        self.last_stats = None;
    }

    fn on_progress(&mut self, bytes_done: u64, total: Option<u64>) {
        let started = *self.started.get_or_insert_with(Instant::now);
        let stats = TransferStats::since(started, bytes_done, total);
        let now = Instant::now();
        let due = self
            .last_print
            .map_or(true, |last| now.duration_since(last) >= PROGRESS_INTERVAL);
        if due || stats.is_complete() {
            Self::print(&stats);
            self.last_print = Some(now);
        }
        self.last_stats = Some(stats);
    }

    fn finish(&mut self) {
        // Final state may have been throttled away.
        if let Some(stats) = self.last_stats.take() {
            Self::print(&stats);
            println!();
        }
        self.started = None;
    }
}

fn outcome_detail(outcome: &ArtifactOutcome) -> String {
    match outcome {
        ArtifactOutcome::Skipped => "already present".to_string(),
        ArtifactOutcome::Downloaded { bytes } => format!("{:.1} MB", *bytes as f64 / MIB),
        ArtifactOutcome::Failed(reason) => reason.to_string(),
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("{}", rule());
    println!(
        "{:<12} {:<12} {:<32} {:<11} {}",
        "CATEGORY", "NAME", "FILE", "OUTCOME", "DETAIL"
    );
    for r in &summary.records {
        println!(
            "{:<12} {:<12} {:<32} {:<11} {}",
            r.category,
            r.name,
            r.filename,
            r.outcome.label(),
            outcome_detail(&r.outcome)
        );
    }
    println!("{}", rule());
    println!("{}", summary);
    println!("{}", rule());
    if summary.success() {
        println!("All models downloaded successfully.");
    } else {
        println!("Some models failed to download. Check your internet connection and try again.");
    }
}
