//! Little-endian fixed-width primitive codec.
//!
//! All multibyte values in an archive are little-endian; this module
//! centralises the offset-based reads the parser performs directly against
//! the input slice, and the `Write` + `byteorder` helpers the writer uses
//! to append to its output buffer.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

use crate::error::{AampError, Result};

/// Round `n` up to the next multiple of `align` (`align` must be a power of two).
#[inline]
pub fn align_up(n: usize, align: usize) -> usize {
    (n + align - 1) & !(align - 1)
}

fn check_bounds(data: &[u8], offset: usize, len: usize) -> Result<()> {
    if offset.checked_add(len).map_or(true, |end| end > data.len()) {
        return Err(AampError::Truncated(offset));
    }
    Ok(())
}

pub fn read_u8(data: &[u8], offset: usize) -> Result<u8> {
    check_bounds(data, offset, 1)?;
    Ok(data[offset])
}

pub fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    check_bounds(data, offset, 2)?;
    Ok(u16::from_le_bytes([data[offset], data[offset + 1]]))
}

pub fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    check_bounds(data, offset, 4)?;
    Ok(u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]))
}

pub fn read_i32(data: &[u8], offset: usize) -> Result<i32> {
    read_u32(data, offset).map(|v| v as i32)
}

pub fn read_f32(data: &[u8], offset: usize) -> Result<f32> {
    read_u32(data, offset).map(f32::from_bits)
}

/// Scan forward from `offset` for a NUL byte and decode the preceding bytes
/// as UTF-8. `max_len` clamps the scan to at most that many bytes (used for
/// the sized string variants); `None` means unbounded (`StringRef`).
pub fn read_string(data: &[u8], offset: usize, max_len: Option<usize>) -> Result<String> {
    if offset > data.len() {
        return Err(AampError::Truncated(offset));
    }
    let search_end = match max_len {
        Some(max) => (offset + max).min(data.len()),
        None => data.len(),
    };
    let end = data[offset..search_end]
        .iter()
        .position(|&b| b == 0)
        .map(|p| offset + p)
        .unwrap_or(search_end);
    std::str::from_utf8(&data[offset..end])
        .map(|s| s.to_string())
        .map_err(|_| AampError::Truncated(offset))
}

/// Write a NUL-terminated UTF-8 string.
pub fn write_string<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    w.write_all(s.as_bytes())?;
    w.write_u8(0)
}

pub use byteorder::ReadBytesExt;

/// Little-endian write helpers, re-exported under short names matching the
/// reader's `read_*` functions for symmetry at call sites.
pub trait WriteLe: Write {
    fn write_u8_le(&mut self, v: u8) -> io::Result<()> {
        self.write_u8(v)
    }
    fn write_u16_le(&mut self, v: u16) -> io::Result<()> {
        WriteBytesExt::write_u16::<LittleEndian>(self, v)
    }
    fn write_u32_le(&mut self, v: u32) -> io::Result<()> {
        WriteBytesExt::write_u32::<LittleEndian>(self, v)
    }
    fn write_i32_le(&mut self, v: i32) -> io::Result<()> {
        WriteBytesExt::write_i32::<LittleEndian>(self, v)
    }
    fn write_f32_le(&mut self, v: f32) -> io::Result<()> {
        WriteBytesExt::write_f32::<LittleEndian>(self, v)
    }
}

impl<W: Write + ?Sized> WriteLe for W {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 4), 0);
        assert_eq!(align_up(1, 4), 4);
        assert_eq!(align_up(4, 4), 4);
        assert_eq!(align_up(5, 4), 8);
    }

    #[test]
    fn test_read_u32_le() {
        let data = [0x78, 0x56, 0x34, 0x12];
        assert_eq!(read_u32(&data, 0).unwrap(), 0x1234_5678);
    }

    #[test]
    fn test_read_f32() {
        let mut buf = Vec::new();
        buf.write_f32_le(1.5).unwrap();
        assert_eq!(read_f32(&buf, 0).unwrap(), 1.5);
    }

    #[test]
    fn test_read_string_nul_terminated() {
        let data = b"hello\0world";
        assert_eq!(read_string(data, 0, None).unwrap(), "hello");
    }

    #[test]
    fn test_read_string_clamped() {
        let data = b"helloworld_no_nul_here";
        assert_eq!(read_string(data, 0, Some(5)).unwrap(), "hello");
    }

    #[test]
    fn test_read_truncated() {
        let data = [0u8; 2];
        assert!(matches!(read_u32(&data, 0), Err(AampError::Truncated(0))));
    }
}
