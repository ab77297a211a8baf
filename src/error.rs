// Copyright 2025 Lars Brubaker
// License: MIT
//
// Error kinds reported by the scanner. Each one tells the caller to fall back
// to a non-exact path; the scanner itself never retries.

use thiserror::Error;

/// Result type for scanner operations.
pub type ScanResult<T> = Result<T, ScanError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// A caller coordinate is not finite or does not fit the integer workspace.
    #[error("coordinate ({x}, {y}) does not fit the scan workspace")]
    BadNumber { x: f64, y: f64 },

    /// A pool reached its allocation ceiling.
    #[error("{pool} pool exhausted at {capacity} entries")]
    PoolExhausted { pool: &'static str, capacity: usize },

    /// An internal consistency check failed during the sweep.
    #[error("scanner failed: {0}")]
    ScannerFailed(&'static str),

    /// An ingestion or scan call was made in the wrong scanner state.
    #[error("invalid scanner state: {0}")]
    InvalidState(&'static str),
}

impl ScanError {
    /// True for the errors that come from the input geometry rather than
    /// from API misuse.
    pub fn wants_fallback(&self) -> bool {
        !matches!(self, ScanError::InvalidState(_))
    }
}
