//! Unsigned LEB128 varints used for the description trailer length.

use super::error::FormatError;
use super::layout;

/// A decoded varint and the offset of the first byte after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uleb128 {
    pub value: u64,
    pub next: usize,
}

/// Append `value` as ULEB128: seven data bits per byte, least significant
/// group first, continuation bit on every byte but the last.
///
/// # Examples
/// ```
/// use fyt_core::format::varint::write_uleb128;
///
/// let mut out = Vec::new();
/// write_uleb128(&mut out, 300);
/// assert_eq!(out, [0xac, 0x02]);
/// ```
pub fn write_uleb128(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value as u8) & layout::ULEB128_PAYLOAD_MASK;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | layout::ULEB128_CONTINUATION);
    }
}

pub fn encode_uleb128(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(5);
    write_uleb128(&mut out, value);
    out
}

/// Read a ULEB128 value starting at `offset`.
///
/// Bytes past the end of `buffer` read as zero, which terminates the value.
/// Fails once the accumulated shift would exceed 35 bits.
///
/// # Errors
/// Returns [`FormatError::Uleb128TooLarge`] for six or more continuation bytes.
pub fn read_uleb128(buffer: &[u8], offset: usize) -> Result<Uleb128, FormatError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    let mut pos = offset;
    loop {
        let byte = buffer.get(pos).copied().unwrap_or(0);
        value |= u64::from(byte & layout::ULEB128_PAYLOAD_MASK) << shift;
        pos += 1;
        if byte & layout::ULEB128_CONTINUATION == 0 {
            return Ok(Uleb128 { value, next: pos });
        }
        shift += 7;
        if shift > layout::ULEB128_MAX_SHIFT {
            return Err(FormatError::Uleb128TooLarge { offset });
        }
    }
}
