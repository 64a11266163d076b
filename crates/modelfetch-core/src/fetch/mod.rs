//! Transfer primitive: one streamed HTTP(S) GET into a destination file.
//!
//! Failures come back as [`FetchError`]; nothing here panics or aborts a run.
//! [`Fetch`] is the seam the provisioner is generic over, so runs can be
//! tested without a network.

mod curl_fetch;
mod error;
mod headers;

pub use curl_fetch::CurlFetcher;
pub use error::{classify, FailureKind, FetchError};
pub use headers::parse_content_length;

use crate::config::ModelfetchConfig;
use crate::progress::ProgressSink;
use std::path::Path;
use std::time::Duration;

/// Default connect and read-stall timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default receive chunk size (8 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Downloads `source` into `dest`, truncating any existing content.
pub trait Fetch {
    /// Returns the number of body bytes written. A partially written file may
    /// remain at `dest` on error.
    fn fetch(
        &self,
        source: &str,
        dest: &Path,
        progress: &mut dyn ProgressSink,
    ) -> Result<u64, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch(
        &self,
        source: &str,
        dest: &Path,
        progress: &mut dyn ProgressSink,
    ) -> Result<u64, FetchError> {
        (**self).fetch(source, dest, progress)
    }
}

/// Transport settings for [`CurlFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Abort when no data arrives for this long.
    pub read_timeout: Duration,
    pub chunk_size: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_TIMEOUT,
            read_timeout: DEFAULT_TIMEOUT,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl From<&ModelfetchConfig> for FetchOptions {
    fn from(cfg: &ModelfetchConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            read_timeout: Duration::from_secs(cfg.read_timeout_secs),
            chunk_size: cfg.chunk_size,
        }
    }
}
