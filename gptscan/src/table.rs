// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
extern crate alloc;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::{
    ENTRY_ARRAY_OFFSET, GPT_ENTRY_SIZE,
    entry::{DecodedSlot, PartitionEntry, decode_entry},
    errors::*,
};

/// Upper bound on examined slots, for buffers whose data never produces the
/// empty sentinel. Matches the entry-count ceiling accepted from real GPT
/// headers.
pub const MAX_TABLE_SLOTS: usize = 16_384;

/// Result of walking the entry array.
///
/// `entries` holds every entry decoded before the walk stopped, in on-disk
/// slot order. A clean stop (empty sentinel) leaves `error` as `None`; a
/// halting failure is recorded alongside the accumulated prefix so callers
/// can decide whether partial results are acceptable.
#[derive(Debug, Clone)]
pub struct TableScan {
    pub entries: Vec<PartitionEntry>,
    pub error: Option<ScanError>,
}

impl TableScan {
    /// True when the walk ended at the empty sentinel.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Collapses to a plain result, dropping the partial prefix on failure.
    pub fn into_result(self) -> ScanResult<Vec<PartitionEntry>> {
        match self.error {
            None => Ok(self.entries),
            Some(e) => Err(e),
        }
    }
}

/// Walks the partition entry array at the fixed table offset (byte 1024).
///
/// The table position and the 128-byte stride are assumed, not read from a
/// GPT header; an image whose header declares different geometry will
/// misparse. Known limitation.
pub fn scan_table(image: &[u8]) -> TableScan {
    scan_table_at(image, ENTRY_ARRAY_OFFSET)
}

/// Walks an entry array starting at `table_offset` instead of the default.
/// Useful for pointing at a backup table copy.
pub fn scan_table_at(image: &[u8], table_offset: usize) -> TableScan {
    let mut entries = Vec::new();
    let mut offset = table_offset;

    for _ in 0..MAX_TABLE_SLOTS {
        match decode_entry(image, offset) {
            Ok(DecodedSlot::EndOfTable) => {
                return TableScan {
                    entries,
                    error: None,
                };
            }
            Ok(DecodedSlot::Entry(e)) => {
                entries.push(e);
                offset += GPT_ENTRY_SIZE;
            }
            Err(e) => {
                return TableScan {
                    entries,
                    error: Some(e),
                };
            }
        }
    }

    TableScan {
        entries,
        error: Some(ScanError::Invalid("entry array exceeds slot ceiling")),
    }
}
