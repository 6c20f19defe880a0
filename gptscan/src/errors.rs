// SPDX-License-Identifier: MIT

use core::fmt;

/// Unified error type for partition table scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// A read would touch bytes past the end of the image buffer.
    BufferTooShort {
        offset: u64,
        needed: usize,
        available: usize,
    },
    /// An entry whose range ends before it starts; the derived size would
    /// wrap around, so the entry is refused instead.
    MalformedRange { first_lba: u64, last_lba: u64 },
    Invalid(&'static str),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::BufferTooShort {
                offset,
                needed,
                available,
            } => write!(
                f,
                "buffer too short at offset {offset}: need {needed} bytes, {available} available"
            ),
            ScanError::MalformedRange {
                first_lba,
                last_lba,
            } => write!(
                f,
                "malformed LBA range: last_lba {last_lba} < first_lba {first_lba}"
            ),
            ScanError::Invalid(msg) => write!(f, "{msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ScanError {}

pub type ScanResult<T = ()> = Result<T, ScanError>;
