//! Fetch/verify/skip orchestration over the catalog.
//!
//! Artifacts are processed one at a time in catalog order. Transfer failures and
//! size mismatches are recorded per artifact and never stop the run; filesystem
//! errors on the models tree (creating a category directory, removing a
//! corrupted file) are fatal and returned as `Err`.

mod summary;

pub use summary::{ArtifactOutcome, ArtifactRecord, FailureReason, RunSummary};

use crate::catalog::{ArtifactDescriptor, Catalog};
use crate::fetch::{classify, Fetch};
use crate::progress::ProgressSink;
use crate::verify::{self, SizeCheck};
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default models directory when neither the CLI nor config names one.
pub const DEFAULT_MODELS_DIR: &str = "./models";

/// Run settings.
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    pub models_dir: PathBuf,
    /// Re-fetch every artifact even if it already verifies.
    pub force: bool,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            force: false,
        }
    }
}

/// Drives one provisioning run over a catalog with a given fetcher.
pub struct Provisioner<'a, F> {
    catalog: &'a Catalog,
    fetcher: F,
    opts: ProvisionOptions,
}

impl<'a, F: Fetch> Provisioner<'a, F> {
    pub fn new(catalog: &'a Catalog, fetcher: F, opts: ProvisionOptions) -> Self {
        Self {
            catalog,
            fetcher,
            opts,
        }
    }

    /// Destination path of `artifact`: `<models-dir>/<category>/<filename>`.
    pub fn destination(&self, artifact: &ArtifactDescriptor) -> PathBuf {
        self.opts
            .models_dir
            .join(&artifact.category)
            .join(&artifact.filename)
    }

    /// Process every artifact and return the run summary.
    /// An invalid catalog is refused before anything touches the models tree.
    pub fn run(&self, progress: &mut dyn ProgressSink) -> Result<RunSummary> {
        self.catalog.validate().context("invalid catalog")?;
        tracing::info!(
            models_dir = %self.opts.models_dir.display(),
            artifacts = self.catalog.len(),
            force = self.opts.force,
            "provisioning started"
        );
        let mut summary = RunSummary::default();
        for category in self.catalog.categories() {
            let dir = self.opts.models_dir.join(&category.name);
            tracing::info!(category = %category.name, dir = %dir.display(), "category");
            fs::create_dir_all(&dir)
                .with_context(|| format!("create category directory {}", dir.display()))?;

            for artifact in &category.artifacts {
                let outcome = self.provision_one(artifact, progress)?;
                summary.record(artifact, outcome);
            }
        }
        summary.log();
        Ok(summary)
    }

    /// Skip / purge / fetch / verify for a single artifact.
    fn provision_one(
        &self,
        artifact: &ArtifactDescriptor,
        progress: &mut dyn ProgressSink,
    ) -> Result<ArtifactOutcome> {
        let dest = self.destination(artifact);
        let expected = artifact.expected_size_bytes;

        if !self.opts.force && dest.exists() {
            match verify::inspect(&dest, expected) {
                SizeCheck::Within { actual } => {
                    tracing::info!(
                        category = %artifact.category,
                        artifact = %artifact.name,
                        path = %dest.display(),
                        actual,
                        "already present, skipping"
                    );
                    return Ok(ArtifactOutcome::Skipped);
                }
                check => {
                    tracing::warn!(
                        category = %artifact.category,
                        artifact = %artifact.name,
                        path = %dest.display(),
                        actual = ?check.actual(),
                        expected,
                        "existing file failed size check, re-downloading"
                    );
                    remove_corrupted(&dest)?;
                }
            }
        }

        tracing::info!(
            category = %artifact.category,
            artifact = %artifact.name,
            url = %artifact.source,
            expected_mb = artifact.expected_size_mb(),
            "downloading"
        );
        progress.begin(artifact);
        let fetched = self.fetcher.fetch(&artifact.source, &dest, progress);
        progress.finish();

        if let Err(e) = fetched {
            let kind = classify(&e);
            tracing::error!(
                category = %artifact.category,
                artifact = %artifact.name,
                url = %artifact.source,
                kind = %kind,
                error = %e,
                "download failed"
            );
            return Ok(ArtifactOutcome::Failed(FailureReason::Transfer {
                kind,
                message: e.to_string(),
            }));
        }

        match verify::inspect(&dest, expected) {
            SizeCheck::Within { actual } => {
                tracing::info!(
                    category = %artifact.category,
                    artifact = %artifact.name,
                    path = %dest.display(),
                    actual,
                    "downloaded"
                );
                Ok(ArtifactOutcome::Downloaded { bytes: expected })
            }
            check => {
                tracing::error!(
                    category = %artifact.category,
                    artifact = %artifact.name,
                    path = %dest.display(),
                    actual = ?check.actual(),
                    expected,
                    "downloaded file failed size check"
                );
                Ok(ArtifactOutcome::Failed(FailureReason::SizeMismatch {
                    actual: check.actual(),
                    expected,
                }))
            }
        }
    }
}

fn remove_corrupted(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("remove corrupted file {}", path.display())),
    }
}
