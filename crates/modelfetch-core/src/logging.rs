//! Structured logging for a provisioning run.
//!
//! Records go to `~/.local/state/modelfetch/modelfetch.log` (appended across
//! runs). When the state dir cannot be used, they go to stderr instead and
//! the run carries on.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,modelfetch=debug,modelfetch_core=debug";

/// Where log records ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    File(PathBuf),
    Stderr,
}

/// `RUST_LOG` when it parses, else the default filter.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn env_filter() -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("modelfetch")?;
    Ok(xdg_dirs.get_state_home().join("modelfetch.log"))
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

fn init_file(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {}", e))
}

fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

/// Install the global subscriber. Never fails: an unusable log file means stderr.
pub fn init() -> LogDestination {
    let attempt = log_file_path().and_then(|path| init_file(&path).map(|()| path));
    match attempt {
        Ok(path) => {
            tracing::info!(log = %path.display(), "modelfetch {} starting", env!("CARGO_PKG_VERSION"));
            LogDestination::File(path)
        }
        Err(e) => {
            init_stderr();
            tracing::warn!("log file unavailable, logging to stderr: {:#}", e);
            LogDestination::Stderr
        }
    }
}
