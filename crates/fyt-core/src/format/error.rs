use thiserror::Error;

/// Structural failures raised while decoding an FYT buffer.
///
/// Every variant is fatal: there is no partial decode.
///
/// # Examples
/// ```
/// use fyt_core::{FormatError, FormatErrorKind};
///
/// let err = FormatError::TooSmall { actual: 3 };
/// assert_eq!(err.kind(), FormatErrorKind::TooSmall);
/// assert!(err.to_string().contains("too small"));
/// ```
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("buffer too small for FYT header: need 24 bytes, got {actual}")]
    TooSmall { actual: usize },
    #[error("invalid FYT header: magic mismatch")]
    BadMagic,
    #[error("JSON object not found after header")]
    JsonNotFound,
    #[error("unterminated JSON object starting at offset {start}")]
    JsonUnterminated { start: usize },
    #[error("ULEB128 value at offset {offset} is too large")]
    Uleb128TooLarge { offset: usize },
    #[error("embedded JSON is invalid: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Stable identifiers for [`FormatError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatErrorKind {
    TooSmall,
    BadMagic,
    JsonNotFound,
    JsonUnterminated,
    Uleb128TooLarge,
    InvalidJson,
}

impl FormatErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FormatErrorKind::TooSmall => "too-small",
            FormatErrorKind::BadMagic => "bad-magic",
            FormatErrorKind::JsonNotFound => "json-not-found",
            FormatErrorKind::JsonUnterminated => "json-unterminated",
            FormatErrorKind::Uleb128TooLarge => "uleb128-too-large",
            FormatErrorKind::InvalidJson => "invalid-json",
        }
    }
}

impl std::fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FormatError {
    pub fn kind(&self) -> FormatErrorKind {
        match self {
            FormatError::TooSmall { .. } => FormatErrorKind::TooSmall,
            FormatError::BadMagic => FormatErrorKind::BadMagic,
            FormatError::JsonNotFound => FormatErrorKind::JsonNotFound,
            FormatError::JsonUnterminated { .. } => FormatErrorKind::JsonUnterminated,
            FormatError::Uleb128TooLarge { .. } => FormatErrorKind::Uleb128TooLarge,
            FormatError::InvalidJson(_) => FormatErrorKind::InvalidJson,
        }
    }
}
