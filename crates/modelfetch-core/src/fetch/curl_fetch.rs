//! Single-stream HTTP GET via libcurl.
//!
//! Writes the response body sequentially into the destination starting at offset 0.

use super::headers::{is_status_line, parse_content_length};
use super::{Fetch, FetchError, FetchOptions};
use crate::progress::ProgressSink;
use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Minimum transfer rate (bytes/s) below which the read timeout starts counting.
const LOW_SPEED_LIMIT: u32 = 1;
const MAX_REDIRECTIONS: u32 = 10;

/// Blocking fetcher backed by a fresh `curl::easy::Easy` per transfer.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    opts: FetchOptions,
}

impl CurlFetcher {
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.opts
    }
}

impl Fetch for CurlFetcher {
    fn fetch(
        &self,
        source: &str,
        dest: &Path,
        progress: &mut dyn ProgressSink,
    ) -> Result<u64, FetchError> {
        let mut file = File::create(dest).map_err(FetchError::Storage)?;
        let total: Cell<Option<u64>> = Cell::new(None);
        let written = Cell::new(0u64);
        let write_error: RefCell<Option<std::io::Error>> = RefCell::new(None);

        let mut easy = curl::easy::Easy::new();
        easy.url(source)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTIONS)?;
        easy.fail_on_error(true)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.low_speed_limit(LOW_SPEED_LIMIT)?;
        easy.low_speed_time(self.opts.read_timeout)?;
        easy.buffer_size(self.opts.chunk_size)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|line| {
                if is_status_line(line) {
                    total.set(None);
                } else if let Some(len) = parse_content_length(line) {
                    total.set(Some(len));
                }
                true
            })?;
            transfer.write_function(|data| {
                if let Err(e) = file.write_all(data) {
                    *write_error.borrow_mut() = Some(e);
                    return Ok(0); // abort transfer
                }
                let done = written.get() + data.len() as u64;
                written.set(done);
                progress.on_progress(done, total.get());
                Ok(data.len())
            })?;
            transfer.perform()
        };

        if let Err(e) = performed {
            if let Some(io) = write_error.into_inner() {
                return Err(FetchError::Storage(io));
            }
            if e.is_http_returned_error() {
                let code = easy.response_code().unwrap_or(0);
                return Err(FetchError::Http(code));
            }
            return Err(FetchError::Curl(e));
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }

        file.flush().map_err(FetchError::Storage)?;
        file.sync_all().map_err(FetchError::Storage)?;
        let bytes = written.get();
        tracing::debug!(url = source, path = %dest.display(), bytes, "transfer complete");
        Ok(bytes)
    }
}
