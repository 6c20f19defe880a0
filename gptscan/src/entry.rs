// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;

use crate::{DEFAULT_SECTOR_SIZE, GPT_ENTRY_SIZE, errors::*};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// One partition entry as stored on disk: 128 bytes, packed, little-endian
/// numeric fields. `attributes` and `name` are part of the fixed layout but
/// are not surfaced in the decoded result.
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug)]
#[repr(C)]
pub struct RawGptEntry {
    pub type_guid: [u8; 16],
    pub unique_guid: [u8; 16],
    pub first_lba: u64,
    pub last_lba: u64,
    pub attributes: u64,
    pub name: [u16; 36],
}

impl RawGptEntry {
    pub fn new(
        type_guid: [u8; 16],
        unique_guid: [u8; 16],
        first_lba: u64,
        last_lba: u64,
    ) -> Self {
        Self {
            type_guid,
            unique_guid,
            first_lba,
            last_lba,
            attributes: 0,
            name: [0u16; 36],
        }
    }
}

/// A fully decoded partition entry. Owns its values; no reference back into
/// the image buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionEntry {
    pub type_guid: [u8; 16],
    pub unique_guid: [u8; 16],
    pub first_lba: u64,
    /// Inclusive upper bound.
    pub last_lba: u64,
    /// `(last_lba - first_lba + 1) * 512`.
    pub size_bytes: u64,
    /// The 4 image bytes at absolute offset `first_lba * 512 + 3`.
    pub fs_signature: [u8; 4],
}

impl PartitionEntry {
    /// 32 lowercase hex characters, raw on-disk byte order. No byte-swapping
    /// to the canonical mixed-endian GUID text form.
    #[cfg(feature = "alloc")]
    pub fn type_guid_hex(&self) -> String {
        hex_lower(&self.type_guid)
    }

    #[cfg(feature = "alloc")]
    pub fn unique_guid_hex(&self) -> String {
        hex_lower(&self.unique_guid)
    }

    /// 8 lowercase hex characters.
    #[cfg(feature = "alloc")]
    pub fn fs_signature_hex(&self) -> String {
        hex_lower(&self.fs_signature)
    }
}

#[cfg(feature = "alloc")]
fn hex_lower(bytes: &[u8]) -> String {
    use core::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Outcome of decoding one table slot. A slot either holds an entry or marks
/// the end of the populated region; failures travel through `ScanResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedSlot {
    Entry(PartitionEntry),
    EndOfTable,
}

/// Decodes the 128-byte slot at `offset` into `image`.
///
/// A slot whose first two bytes are both zero is the empty sentinel; the
/// remaining fields are not examined. Otherwise the entry fields are decoded
/// and the filesystem signature is read from the image at
/// `first_lba * 512 + 3`. Pure function of `(image, offset)`.
pub fn decode_entry(image: &[u8], offset: usize) -> ScanResult<DecodedSlot> {
    let end = offset
        .checked_add(GPT_ENTRY_SIZE)
        .ok_or(ScanError::Invalid("entry offset overflows usize"))?;
    if end > image.len() {
        return Err(ScanError::BufferTooShort {
            offset: offset as u64,
            needed: GPT_ENTRY_SIZE,
            available: image.len().saturating_sub(offset),
        });
    }
    let window = &image[offset..end];

    if window[..2] == [0, 0] {
        return Ok(DecodedSlot::EndOfTable);
    }

    let raw = RawGptEntry::read_from_bytes(window)
        .map_err(|_| ScanError::Invalid("entry window has wrong size"))?;

    if raw.last_lba < raw.first_lba {
        return Err(ScanError::MalformedRange {
            first_lba: raw.first_lba,
            last_lba: raw.last_lba,
        });
    }
    let size_bytes = (raw.last_lba - raw.first_lba)
        .checked_add(1)
        .and_then(|n| n.checked_mul(DEFAULT_SECTOR_SIZE))
        .ok_or(ScanError::Invalid("partition size overflows u64"))?;

    let sig_offset = raw
        .first_lba
        .checked_mul(DEFAULT_SECTOR_SIZE)
        .and_then(|n| n.checked_add(3))
        .ok_or(ScanError::Invalid("signature offset overflows u64"))?;
    let sig_end = sig_offset
        .checked_add(4)
        .ok_or(ScanError::Invalid("signature offset overflows u64"))?;
    if sig_end > image.len() as u64 {
        return Err(ScanError::BufferTooShort {
            offset: sig_offset,
            needed: 4,
            available: (image.len() as u64).saturating_sub(sig_offset) as usize,
        });
    }
    let mut fs_signature = [0u8; 4];
    fs_signature.copy_from_slice(&image[sig_offset as usize..sig_end as usize]);

    Ok(DecodedSlot::Entry(PartitionEntry {
        type_guid: raw.type_guid,
        unique_guid: raw.unique_guid,
        first_lba: raw.first_lba,
        last_lba: raw.last_lba,
        size_bytes,
        fs_signature,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with_entry(raw: &RawGptEntry) -> Vec<u8> {
        // Entry at offset 0; enough sectors behind it for the signature read.
        let mut img = vec![0u8; ((raw.last_lba + 1) * 512) as usize];
        img[..GPT_ENTRY_SIZE].copy_from_slice(raw.as_bytes());
        let sig = (raw.first_lba * 512 + 3) as usize;
        img[sig..sig + 4].copy_from_slice(b"NTFS");
        img
    }

    #[test]
    fn decode_populated_slot() {
        let raw = RawGptEntry::new([0x11; 16], [0xAA; 16], 8, 15);
        let img = image_with_entry(&raw);

        let slot = decode_entry(&img, 0).unwrap();
        let DecodedSlot::Entry(e) = slot else {
            panic!("expected entry, got {slot:?}");
        };
        assert_eq!(e.first_lba, 8);
        assert_eq!(e.last_lba, 15);
        assert_eq!(e.size_bytes, 8 * 512);
        assert_eq!(&e.fs_signature, b"NTFS");
    }

    #[test]
    fn decode_is_idempotent() {
        let raw = RawGptEntry::new([0x42; 16], [0x07; 16], 4, 9);
        let img = image_with_entry(&raw);

        let a = decode_entry(&img, 0).unwrap();
        let b = decode_entry(&img, 0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn leading_zero_pair_is_end_of_table() {
        // Non-zero bytes after the first two must not be decoded.
        let mut img = vec![0xFFu8; GPT_ENTRY_SIZE];
        img[0] = 0;
        img[1] = 0;
        assert_eq!(decode_entry(&img, 0).unwrap(), DecodedSlot::EndOfTable);
    }

    #[test]
    fn short_entry_window_is_reported() {
        let img = vec![0x11u8; 100];
        let err = decode_entry(&img, 0).unwrap_err();
        assert_eq!(
            err,
            ScanError::BufferTooShort {
                offset: 0,
                needed: GPT_ENTRY_SIZE,
                available: 100,
            }
        );
    }

    #[test]
    fn signature_read_past_buffer_is_reported() {
        // Entry is well formed but the buffer ends right after it: the
        // signature bytes at first_lba*512+3 do not exist.
        let raw = RawGptEntry::new([0x11; 16], [0xAA; 16], 40, 139);
        let img = raw.as_bytes().to_vec();

        let err = decode_entry(&img, 0).unwrap_err();
        assert_eq!(
            err,
            ScanError::BufferTooShort {
                offset: 40 * 512 + 3,
                needed: 4,
                available: 0,
            }
        );
    }

    #[test]
    fn inverted_lba_range_is_refused() {
        let raw = RawGptEntry::new([0x11; 16], [0xAA; 16], 10, 9);
        let mut img = vec![0u8; 16 * 512];
        img[..GPT_ENTRY_SIZE].copy_from_slice(raw.as_bytes());

        let err = decode_entry(&img, 0).unwrap_err();
        assert_eq!(
            err,
            ScanError::MalformedRange {
                first_lba: 10,
                last_lba: 9,
            }
        );
    }

    #[test]
    fn single_sector_partition_size() {
        let raw = RawGptEntry::new([0x11; 16], [0xAA; 16], 5, 5);
        let img = image_with_entry(&raw);

        let DecodedSlot::Entry(e) = decode_entry(&img, 0).unwrap() else {
            panic!("expected entry");
        };
        assert_eq!(e.size_bytes, 512);
    }

    #[test]
    fn hex_accessors_are_lowercase_fixed_width() {
        let mut type_guid = [0u8; 16];
        type_guid[0] = 0xDE;
        type_guid[15] = 0x0B;
        let raw = RawGptEntry::new(type_guid, [0xCF; 16], 2, 3);
        let img = image_with_entry(&raw);

        let DecodedSlot::Entry(e) = decode_entry(&img, 0).unwrap() else {
            panic!("expected entry");
        };
        let t = e.type_guid_hex();
        assert_eq!(t.len(), 32);
        assert!(t.starts_with("de"));
        assert!(t.ends_with("0b"));
        assert_eq!(e.unique_guid_hex(), "cf".repeat(16));
        assert_eq!(e.fs_signature_hex().len(), 8);
        assert!(
            e.unique_guid_hex()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn guid_hex_keeps_on_disk_byte_order() {
        // No canonical GUID reordering: byte 0 prints first.
        let mut type_guid = [0u8; 16];
        for (i, b) in type_guid.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        let raw = RawGptEntry::new(type_guid, [0x01; 16], 2, 3);
        let img = image_with_entry(&raw);

        let DecodedSlot::Entry(e) = decode_entry(&img, 0).unwrap() else {
            panic!("expected entry");
        };
        assert!(e.type_guid_hex().starts_with("01020304"));
    }
}
