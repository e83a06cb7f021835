use tracing::debug;

use crate::protocol::ProtocolTree;
use crate::protocol::normalize::normalize_tree;

use super::container::{DecodedContainer, Framing};
use super::error::FormatError;
use super::header::Header;
use super::json_span::find_json_span;
use super::layout::{self, UTF8_BOM};
use super::reader::FytReader;
use super::varint::read_uleb128;

/// Decode an FYT buffer into its protocol tree and the bytes needed to
/// reproduce it.
///
/// # Examples
/// ```
/// use fyt_core::decode;
///
/// let mut bytes = b"\x11Fytotron Protocol\x00\x01\x00\x00\x82\x00".to_vec();
/// bytes.extend_from_slice(b"{}\x00");
/// let decoded = decode(&bytes)?;
/// assert!(decoded.protocol().is_empty());
/// assert_eq!(decoded.description(), "");
/// # Ok::<(), fyt_core::FormatError>(())
/// ```
///
/// # Errors
/// Any [`FormatError`]; nothing is returned on failure.
pub fn decode(buffer: &[u8]) -> Result<DecodedContainer, FormatError> {
    let reader = FytReader::new(buffer);
    let header = Header::validate(buffer)?;

    // The span search starts after the header but is not anchored to it.
    let body_span = find_json_span(reader.body())?;
    let start = layout::HEADER_LEN + body_span.start;
    let end = layout::HEADER_LEN + body_span.end;
    let json_bytes = buffer[start..end].to_vec();
    debug!(start, end, "located embedded JSON");

    let trailer_offset = reader.skip_line_breaks(end);
    let length = read_uleb128(buffer, trailer_offset)?;
    let description_len = usize::try_from(length.value).unwrap_or(usize::MAX);
    let description_bytes = reader.slice_clamped(length.next, description_len);
    let description = decode_text(description_bytes);
    debug!(
        trailer_offset,
        description_len = description_bytes.len(),
        "read description trailer"
    );

    let text = String::from_utf8_lossy(&json_bytes);
    let mut protocol: ProtocolTree = serde_json::from_str(&text)?;
    normalize_tree(&mut protocol);

    let framing = Framing {
        leading: buffer[layout::HEADER_LEN..start].to_vec(),
        separator: buffer[end..trailer_offset].to_vec(),
        trailer: reader.tail(trailer_offset).to_vec(),
    };

    Ok(DecodedContainer {
        protocol,
        header,
        json_bytes,
        description,
        framing,
    })
}

/// Lossy UTF-8 with one leading byte-order mark dropped.
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
