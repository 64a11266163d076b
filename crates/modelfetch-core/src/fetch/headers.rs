//! Response header parsing.

use std::str;

/// Parse a raw header line, returning the value if it is `Content-Length`.
pub fn parse_content_length(line: &[u8]) -> Option<u64> {
    let line = str::from_utf8(line).ok()?.trim();
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse::<u64>().ok()
}

/// True for the status line that opens a response (`HTTP/1.1 200 OK`).
/// Each redirect hop starts a new header block.
pub(super) fn is_status_line(line: &[u8]) -> bool {
    line.starts_with(b"HTTP/")
}
