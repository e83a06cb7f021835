//! Codec for FYT climate-chamber protocol files.
//!
//! An FYT file is a 24-byte header, one embedded JSON object holding the
//! protocol, and a ULEB128 length-prefixed description trailer. Decoding
//! keeps the header and JSON bytes verbatim so an untouched file re-encodes
//! to the same bytes; fresh encodes rebuild both from a protocol tree.
//!
//! Invariants:
//! - `encode(&decode(b)?) == b` for every buffer `b` that decodes.
//! - Legacy `"clouds"` tags are rewritten only in the returned tree, never in
//!   the preserved bytes.
//! - Header bytes 22..24 are written on fresh encode and never checked on
//!   decode (see [`Header::length_pair_matches`] for an opt-in check).
//!
//! # Examples
//! ```
//! use fyt_core::{ProtocolTree, decode, encode};
//!
//! let mut tree = ProtocolTree::new();
//! tree.insert("repeat".into(), 3.into());
//! let bytes = encode(&tree);
//!
//! let decoded = decode(&bytes)?;
//! assert_eq!(decoded.protocol()["repeat"], 3);
//! assert!(decoded.header().length_pair_matches(decoded.json_bytes().len()));
//! # Ok::<(), fyt_core::FormatError>(())
//! ```

pub mod format;
pub mod protocol;
mod report;

pub use format::error::{FormatError, FormatErrorKind};
pub use format::header::Header;
pub use format::{DecodedContainer, EncodeInput, RoundTrip, decode, encode};
pub use protocol::{Protocol, ProtocolError, ProtocolTree, REPEAT_FOREVER};
pub use report::{ContainerReport, GroupSummary, build_report};
