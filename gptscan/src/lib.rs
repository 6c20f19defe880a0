// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(not(feature = "std"), feature = "alloc"))]
extern crate alloc;

pub mod errors;
/// GPT partition entry layout and the entry decoder.
pub mod entry;

#[cfg(feature = "alloc")]
pub mod table;
#[cfg(feature = "alloc")]
pub use table::{TableScan, scan_table, scan_table_at};

pub use entry::{DecodedSlot, PartitionEntry, RawGptEntry, decode_entry};
pub use errors::{ScanError, ScanResult};

/// Logical block size assumed throughout. Size derivation and the absolute
/// filesystem-signature offset are both computed against 512-byte sectors;
/// 4Kn images are not supported.
pub const DEFAULT_SECTOR_SIZE: u64 = 512;

/// Byte offset of the partition entry array (LBA 2 at 512-byte sectors).
/// The array position is assumed, not read from a GPT header.
pub const ENTRY_ARRAY_OFFSET: usize = 1024;

/// On-disk size of one partition entry, in bytes.
pub const GPT_ENTRY_SIZE: usize = 128;
