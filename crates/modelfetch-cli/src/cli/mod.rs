//! CLI for the modelfetch provisioner.

mod console;

use anyhow::{Context, Result};
use clap::Parser;
use modelfetch_core::catalog::{self, Catalog};
use modelfetch_core::config::{self, ModelfetchConfig};
use modelfetch_core::fetch::{CurlFetcher, FetchOptions};
use modelfetch_core::provision::{ProvisionOptions, Provisioner, DEFAULT_MODELS_DIR};
use std::path::PathBuf;

use console::ConsoleProgress;

/// Download and verify every model artifact in the catalog.
#[derive(Debug, Parser)]
#[command(name = "modelfetch")]
#[command(about = "Download missing or corrupted model artifacts", long_about = None)]
pub struct Cli {
    /// Models directory (default: `models_dir` from config, else ./models).
    #[arg(long, value_name = "PATH")]
    pub models_dir: Option<PathBuf>,

    /// Re-download every artifact, even ones that already verify.
    #[arg(long)]
    pub force: bool,

    /// TOML catalog file to use instead of the built-in catalog.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Config file (default: ~/.config/modelfetch/config.toml).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse arguments and run. `Ok(false)` means at least one artifact failed.
    pub fn run_from_args() -> Result<bool> {
        Cli::parse().run()
    }

    pub fn run(&self) -> Result<bool> {
        let cfg = self.load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let catalog = self.load_catalog(&cfg)?;
        let opts = ProvisionOptions {
            models_dir: self.models_dir(&cfg),
            force: self.force,
        };

        console::print_header(&catalog, &opts);
        let fetcher = CurlFetcher::new(FetchOptions::from(&cfg));
        let provisioner = Provisioner::new(&catalog, fetcher, opts);
        let summary = provisioner.run(&mut ConsoleProgress::default())?;
        console::print_summary(&summary);
        Ok(summary.success())
    }

    fn load_config(&self) -> Result<ModelfetchConfig> {
        match &self.config {
            Some(path) => config::load_from(path),
            None => Ok(config::load_or_init().unwrap_or_else(|e| {
                tracing::warn!("using default config: {:#}", e);
                ModelfetchConfig::default()
            })),
        }
    }

    fn load_catalog(&self, cfg: &ModelfetchConfig) -> Result<Catalog> {
        match self.catalog.as_ref().or(cfg.catalog.as_ref()) {
            Some(path) => catalog::load_catalog_file(path)
                .with_context(|| format!("load catalog {}", path.display())),
            None => Ok(Catalog::builtin()),
        }
    }

    /// `--models-dir`, then config `models_dir`, then `./models`.
    fn models_dir(&self, cfg: &ModelfetchConfig) -> PathBuf {
        self.models_dir
            .clone()
            .or_else(|| cfg.models_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODELS_DIR))
    }
}
