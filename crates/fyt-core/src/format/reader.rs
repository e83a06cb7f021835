use super::error::FormatError;
use super::layout;

pub struct FytReader<'a> {
    buffer: &'a [u8],
}

impl<'a> FytReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer }
    }

    pub fn require_header(&self) -> Result<(), FormatError> {
        if self.buffer.len() < layout::HEADER_LEN {
            return Err(FormatError::TooSmall {
                actual: self.buffer.len(),
            });
        }
        Ok(())
    }

    pub fn header_bytes(&self) -> Result<&'a [u8; layout::HEADER_LEN], FormatError> {
        self.buffer
            .get(..layout::HEADER_LEN)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(FormatError::TooSmall {
                actual: self.buffer.len(),
            })
    }

    pub fn body(&self) -> &'a [u8] {
        self.buffer.get(layout::HEADER_LEN..).unwrap_or(&[])
    }

    /// Slice clamped to the buffer end; an out-of-range start yields an empty slice.
    pub fn slice_clamped(&self, start: usize, len: usize) -> &'a [u8] {
        let start = start.min(self.buffer.len());
        let end = start.saturating_add(len).min(self.buffer.len());
        &self.buffer[start..end]
    }

    pub fn tail(&self, start: usize) -> &'a [u8] {
        self.buffer.get(start..).unwrap_or(&[])
    }

    /// Skip a run of CR/LF bytes and return the first offset past it.
    pub fn skip_line_breaks(&self, mut offset: usize) -> usize {
        while matches!(self.buffer.get(offset), Some(&layout::CR) | Some(&layout::LF)) {
            offset += 1;
        }
        offset
    }
}
