//! Size-based artifact verification.
//!
//! Size within a relative tolerance of the catalog value is the only integrity
//! signal available; corruption that preserves size goes undetected.

use std::fs;
use std::path::Path;

/// Allowed relative deviation from the expected size (inclusive).
pub const SIZE_TOLERANCE: f64 = 0.05;

/// Outcome of inspecting a file against an expected size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCheck {
    /// No regular file at the path.
    Missing,
    /// File size within tolerance.
    Within { actual: u64 },
    /// File present but size outside tolerance.
    Outside { actual: u64 },
}

impl SizeCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, SizeCheck::Within { .. })
    }

    /// Actual size on disk, if the file exists.
    pub fn actual(&self) -> Option<u64> {
        match *self {
            SizeCheck::Missing => None,
            SizeCheck::Within { actual } | SizeCheck::Outside { actual } => Some(actual),
        }
    }
}

/// True if `actual` deviates from `expected` by at most [`SIZE_TOLERANCE`].
/// An expected size of zero only accepts an empty file.
pub fn within_tolerance(actual: u64, expected: u64) -> bool {
    if expected == 0 {
        return actual == 0;
    }
    let deviation = (actual as f64 - expected as f64).abs() / expected as f64;
    deviation <= SIZE_TOLERANCE
}

/// Inspect `path` against `expected_size_bytes`. Reads metadata only.
pub fn inspect(path: &Path, expected_size_bytes: u64) -> SizeCheck {
    let meta = match fs::metadata(path) {
        Ok(meta) if meta.is_file() => meta,
        _ => return SizeCheck::Missing,
    };
    let actual = meta.len();
    if within_tolerance(actual, expected_size_bytes) {
        SizeCheck::Within { actual }
    } else {
        SizeCheck::Outside { actual }
    }
}

/// False if the file is missing; otherwise whether its size is within tolerance.
pub fn verify(path: &Path, expected_size_bytes: u64) -> bool {
    inspect(path, expected_size_bytes).is_valid()
}
