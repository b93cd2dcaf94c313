//! CRC32 key type for parameter archive trees.
//!
//! Every list, object, and parameter in an AAMP tree is addressed by the
//! IEEE CRC32 of its original name. This module models that hash as a
//! distinct newtype rather than a bare `u32` so that hashing and key
//! comparisons can't be mixed up with unrelated integers in the tree.

use std::fmt;

/// A 32-bit CRC32 hash used as the sole key type inside a parameter tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Crc32(u32);

impl Crc32 {
    /// Wrap a raw hash value, e.g. one already read from a binary archive.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Crc32(value)
    }

    /// Hash a name the same way the archive format does: IEEE CRC32 over
    /// its UTF-8 bytes.
    pub fn hash(name: &str) -> Self {
        Crc32(crc32_ieee(name.as_bytes()))
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Crc32(0)
    }
}

impl From<u32> for Crc32 {
    fn from(value: u32) -> Self {
        Crc32(value)
    }
}

impl From<Crc32> for u32 {
    fn from(key: Crc32) -> Self {
        key.0
    }
}

impl fmt::Display for Crc32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}

impl fmt::LowerHex for Crc32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

// Table-driven IEEE 802.3 CRC32, the same polynomial zlib (and thus the
// reference archive encoder) uses. Computed once at first use.
static CRC32_TABLE: once_cell::sync::Lazy<[u32; 256]> = once_cell::sync::Lazy::new(|| {
    let mut table = [0u32; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let mut c = i as u32;
        for _ in 0..8 {
            c = if c & 1 != 0 {
                0xEDB88320 ^ (c >> 1)
            } else {
                c >> 1
            };
        }
        *entry = c;
    }
    table
});

fn crc32_ieee(bytes: &[u8]) -> u32 {
    let table = &*CRC32_TABLE;
    let mut crc = 0xFFFFFFFFu32;
    for &b in bytes {
        let idx = ((crc ^ b as u32) & 0xFF) as usize;
        crc = table[idx] ^ (crc >> 8);
    }
    !crc
}
