use super::error::FormatError;
use super::layout;
use super::reader::FytReader;

/// The fixed 24-byte FYT preamble.
///
/// Decoded headers are carried verbatim; bytes 19..24 are never interpreted
/// on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header([u8; layout::HEADER_LEN]);

impl Header {
    /// Check the size and signature of `bytes` and copy out the first 24 bytes.
    ///
    /// # Examples
    /// ```
    /// use fyt_core::Header;
    ///
    /// let fresh = Header::build(2);
    /// let parsed = Header::validate(fresh.as_bytes()).unwrap();
    /// assert_eq!(parsed, fresh);
    /// ```
    ///
    /// # Errors
    /// `TooSmall` below 24 bytes, `BadMagic` when the signature differs.
    pub fn validate(bytes: &[u8]) -> Result<Self, FormatError> {
        let reader = FytReader::new(bytes);
        reader.require_header()?;
        let raw = reader.header_bytes()?;
        if &raw[layout::MAGIC_RANGE] != layout::MAGIC {
            return Err(FormatError::BadMagic);
        }
        Ok(Self(*raw))
    }

    /// Build a fresh header for a JSON payload of `json_len` bytes.
    pub fn build(json_len: usize) -> Self {
        let mut raw = [0u8; layout::HEADER_LEN];
        raw[layout::MAGIC_RANGE].copy_from_slice(layout::MAGIC);
        raw[layout::VERSION_RANGE].copy_from_slice(&layout::FRESH_VERSION);
        let (lo, hi) = Self::expected_length_pair(json_len);
        raw[layout::LENGTH_LO_OFFSET] = lo;
        raw[layout::LENGTH_HI_OFFSET] = hi;
        Self(raw)
    }

    /// The `(lo, hi)` pair a fresh encode writes at offsets 22 and 23.
    ///
    /// With `T = 24 + json_len + 104`: `lo = T % 128 + 128`, `hi = T / 128 - 1`,
    /// each truncated to one byte.
    ///
    /// # Examples
    /// ```
    /// use fyt_core::Header;
    ///
    /// assert_eq!(Header::expected_length_pair(0), (128, 0));
    /// ```
    pub fn expected_length_pair(json_len: usize) -> (u8, u8) {
        let total = layout::HEADER_LEN + json_len + layout::LENGTH_BIAS;
        let lo = total % layout::LENGTH_RADIX + layout::LENGTH_RADIX;
        let hi = total / layout::LENGTH_RADIX - 1;
        ((lo & 0xff) as u8, (hi & 0xff) as u8)
    }

    pub fn length_pair(&self) -> (u8, u8) {
        (
            self.0[layout::LENGTH_LO_OFFSET],
            self.0[layout::LENGTH_HI_OFFSET],
        )
    }

    /// Opt-in consistency check; decode itself never calls this.
    pub fn length_pair_matches(&self, json_len: usize) -> bool {
        self.length_pair() == Self::expected_length_pair(json_len)
    }

    pub fn version(&self) -> [u8; 3] {
        let mut version = [0u8; 3];
        version.copy_from_slice(&self.0[layout::VERSION_RANGE]);
        version
    }

    pub fn as_bytes(&self) -> &[u8; layout::HEADER_LEN] {
        &self.0
    }
}

impl AsRef<[u8]> for Header {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Header;
    use crate::format::error::FormatError;
    use crate::format::layout;

    #[test]
    fn build_writes_magic_version_and_pair() {
        let header = Header::build(2);
        let bytes = header.as_bytes();
        assert_eq!(&bytes[..18], layout::MAGIC);
        assert_eq!(bytes[layout::RESERVED_OFFSET], 0);
        assert_eq!(header.version(), [0x01, 0x00, 0x00]);
        // T = 24 + 2 + 104 = 130
        assert_eq!(header.length_pair(), (130, 0));
    }

    #[test]
    fn length_pair_formula() {
        assert_eq!(Header::expected_length_pair(0), (128, 0));
        // T = 256 -> q = 2
        assert_eq!(Header::expected_length_pair(128), (128, 1));
        // T = 1128 -> q = 8, r = 104
        assert_eq!(Header::expected_length_pair(1000), (232, 7));
    }

    #[test]
    fn length_pair_high_byte_wraps() {
        // T = 128 * 258 -> hi = 257, masked to 1
        let json_len = 128 * 258 - 128;
        assert_eq!(Header::expected_length_pair(json_len), (128, 1));
    }

    #[test]
    fn validate_rejects_short_buffer() {
        let err = Header::validate(&[0x11; 10]).unwrap_err();
        assert!(matches!(err, FormatError::TooSmall { actual: 10 }));
    }

    #[test]
    fn validate_rejects_bad_magic() {
        let mut bytes = *Header::build(0).as_bytes();
        bytes[1] = b'f';
        let err = Header::validate(&bytes).unwrap_err();
        assert!(matches!(err, FormatError::BadMagic));
    }

    #[test]
    fn validate_keeps_unchecked_bytes() {
        let mut bytes = *Header::build(0).as_bytes();
        bytes[19] = 0x07;
        bytes[22] = 0xaa;
        bytes[23] = 0xbb;
        let header = Header::validate(&bytes).unwrap();
        assert_eq!(header.version(), [0x07, 0x00, 0x00]);
        assert_eq!(header.length_pair(), (0xaa, 0xbb));
        assert!(!header.length_pair_matches(0));
    }
}
