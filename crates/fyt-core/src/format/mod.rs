//! FYT container decoding and encoding.
//!
//! Layered like any byte-format decoder here:
//! - `layout`: offsets and constants (source of truth)
//! - `reader`: bounds-safe byte access
//! - `header`, `varint`, `json_span`: leaf codecs
//! - `parser` / `writer`: decode and encode orchestration
//! - `error`: explicit, actionable errors
//!
//! Everything is pure; callers own file access.

pub mod error;
pub mod header;
pub mod json_span;
pub mod layout;
pub mod varint;

mod container;
mod parser;
mod reader;
mod writer;

pub use container::DecodedContainer;
pub use parser::decode;
pub use writer::{EncodeInput, RoundTrip, encode, fresh_json};
