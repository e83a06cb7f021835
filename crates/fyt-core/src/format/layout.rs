pub const MAGIC: &[u8; 18] = b"\x11Fytotron Protocol";
pub const MAGIC_RANGE: std::ops::Range<usize> = 0..18;
// Not part of the signature; zero on fresh encode, preserved on round-trip.
pub const RESERVED_OFFSET: usize = 18;
pub const VERSION_RANGE: std::ops::Range<usize> = 19..22;
pub const LENGTH_LO_OFFSET: usize = 22;
pub const LENGTH_HI_OFFSET: usize = 23;
pub const HEADER_LEN: usize = 24;

pub const FRESH_VERSION: [u8; 3] = [0x01, 0x00, 0x00];

// Bytes 22..24 are derived from (header + JSON) length for an external reader.
pub const LENGTH_BIAS: usize = 104;
pub const LENGTH_RADIX: usize = 128;

pub const CR: u8 = 0x0d;
pub const LF: u8 = 0x0a;

pub const ULEB128_CONTINUATION: u8 = 0x80;
pub const ULEB128_PAYLOAD_MASK: u8 = 0x7f;
pub const ULEB128_MAX_SHIFT: u32 = 35;

/// UTF-8 byte-order mark; one leading copy is dropped from decoded text.
pub const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";
