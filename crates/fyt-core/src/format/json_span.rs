//! Brace matching over raw bytes to find the embedded JSON object.
//!
//! The bytes around the object (header, CR/LF, trailer) are not JSON, so the
//! scanner only tracks depth, string state and single-character escapes.

use super::error::FormatError;

const OPEN_BRACE: u8 = b'{';
const CLOSE_BRACE: u8 = b'}';
const QUOTE: u8 = b'"';
const BACKSLASH: u8 = b'\\';

/// Byte range of the first top-level JSON object, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonSpan {
    pub start: usize,
    pub end: usize,
}

impl JsonSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Locate the first `{` in `buffer` and the `}` that closes it.
///
/// # Examples
/// ```
/// use fyt_core::format::json_span::find_json_span;
///
/// let span = find_json_span(br#"xx{"a":"}"}yy"#).unwrap();
/// assert_eq!((span.start, span.end), (2, 11));
/// ```
///
/// # Errors
/// `JsonNotFound` without any `{`, `JsonUnterminated` when the depth never
/// returns to zero.
pub fn find_json_span(buffer: &[u8]) -> Result<JsonSpan, FormatError> {
    let start = buffer
        .iter()
        .position(|&b| b == OPEN_BRACE)
        .ok_or(FormatError::JsonNotFound)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;
    for (index, &byte) in buffer.iter().enumerate().skip(start) {
        if in_string {
            if escape_next {
                escape_next = false;
            } else if byte == BACKSLASH {
                escape_next = true;
            } else if byte == QUOTE {
                in_string = false;
            }
            continue;
        }
        match byte {
            QUOTE => in_string = true,
            OPEN_BRACE => depth += 1,
            CLOSE_BRACE => {
                depth -= 1;
                if depth == 0 {
                    return Ok(JsonSpan {
                        start,
                        end: index + 1,
                    });
                }
            }
            _ => {}
        }
    }
    Err(FormatError::JsonUnterminated { start })
}
