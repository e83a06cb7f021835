use tracing::debug;

use crate::protocol::{DESCRIPTION_FIELD, ProtocolTree, integral_numbers, tree_description};

use super::container::{DecodedContainer, Framing};
use super::header::Header;
use super::varint::write_uleb128;

/// Preserved pieces for a byte-exact re-encode.
#[derive(Debug, Clone, Copy)]
pub struct RoundTrip<'a> {
    header: &'a Header,
    json_bytes: &'a [u8],
    description: Option<&'a str>,
    protocol: Option<&'a ProtocolTree>,
    framing: Option<(&'a Framing, &'a str)>,
}

impl<'a> RoundTrip<'a> {
    /// Round-trip input from a header and JSON bytes kept by the caller.
    pub fn new(header: &'a Header, json_bytes: &'a [u8]) -> Self {
        Self {
            header,
            json_bytes,
            description: None,
            protocol: None,
            framing: None,
        }
    }

    /// Trailer text; takes precedence over the protocol's own description.
    pub fn with_description(mut self, description: &'a str) -> Self {
        self.description = Some(description);
        self
    }

    /// Tree whose `description` is used when no explicit description is set.
    pub fn with_protocol(mut self, protocol: &'a ProtocolTree) -> Self {
        self.protocol = Some(protocol);
        self
    }

    fn resolved_description(&self) -> String {
        match (self.description, self.protocol) {
            (Some(description), _) => description.to_string(),
            (None, Some(protocol)) => tree_description(protocol),
            (None, None) => String::new(),
        }
    }
}

impl<'a> From<&'a DecodedContainer> for RoundTrip<'a> {
    fn from(decoded: &'a DecodedContainer) -> Self {
        Self {
            header: &decoded.header,
            json_bytes: &decoded.json_bytes,
            description: Some(decoded.description.as_str()),
            protocol: Some(&decoded.protocol),
            framing: Some((&decoded.framing, decoded.description.as_str())),
        }
    }
}

/// The two encode modes.
#[derive(Debug, Clone, Copy)]
pub enum EncodeInput<'a> {
    /// Reuse preserved header and JSON bytes verbatim.
    RoundTrip(RoundTrip<'a>),
    /// Rebuild header and JSON from a logical tree.
    Fresh(&'a ProtocolTree),
}

impl<'a> From<&'a DecodedContainer> for EncodeInput<'a> {
    fn from(decoded: &'a DecodedContainer) -> Self {
        EncodeInput::RoundTrip(RoundTrip::from(decoded))
    }
}

impl<'a> From<RoundTrip<'a>> for EncodeInput<'a> {
    fn from(round_trip: RoundTrip<'a>) -> Self {
        EncodeInput::RoundTrip(round_trip)
    }
}

impl<'a> From<&'a ProtocolTree> for EncodeInput<'a> {
    fn from(protocol: &'a ProtocolTree) -> Self {
        EncodeInput::Fresh(protocol)
    }
}

/// Encode an FYT buffer.
///
/// For any buffer `b` that decodes, `encode(&decode(b)?) == b`. Fresh
/// encodes are deterministic: the tree's `description` is moved to the
/// trailer and the JSON is pretty-printed with CRLF line endings.
///
/// # Examples
/// ```
/// use fyt_core::{ProtocolTree, decode, encode};
///
/// let mut tree = ProtocolTree::new();
/// tree.insert("description".into(), "Short day".into());
/// tree.insert("repeat".into(), 1.into());
///
/// let bytes = encode(&tree);
/// let decoded = decode(&bytes)?;
/// assert_eq!(decoded.description(), "Short day");
/// assert_eq!(decoded.protocol()["description"], "");
/// assert_eq!(encode(&decoded), bytes);
/// # Ok::<(), fyt_core::FormatError>(())
/// ```
pub fn encode<'a>(input: impl Into<EncodeInput<'a>>) -> Vec<u8> {
    match input.into() {
        EncodeInput::RoundTrip(round_trip) => encode_round_trip(&round_trip),
        EncodeInput::Fresh(protocol) => encode_fresh(protocol),
    }
}

fn encode_round_trip(input: &RoundTrip<'_>) -> Vec<u8> {
    let description = input.resolved_description();
    let mut out = Vec::with_capacity(
        input.header.as_bytes().len() + input.json_bytes.len() + description.len() + 8,
    );
    out.extend_from_slice(input.header.as_bytes());

    match input.framing {
        Some((framing, decoded_description)) => {
            out.extend_from_slice(&framing.leading);
            out.extend_from_slice(input.json_bytes);
            out.extend_from_slice(&framing.separator);
            if description == decoded_description {
                out.extend_from_slice(&framing.trailer);
            } else {
                write_trailer(&mut out, &description);
            }
        }
        None => {
            out.extend_from_slice(input.json_bytes);
            write_trailer(&mut out, &description);
        }
    }
    debug!(
        mode = "round-trip",
        json_len = input.json_bytes.len(),
        total = out.len(),
        "encoded container"
    );
    out
}

fn encode_fresh(protocol: &ProtocolTree) -> Vec<u8> {
    let description = tree_description(protocol);
    let json_bytes = fresh_json(protocol);
    let header = Header::build(json_bytes.len());

    let mut out = Vec::with_capacity(
        header.as_bytes().len() + json_bytes.len() + description.len() + 5,
    );
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(&json_bytes);
    write_trailer(&mut out, &description);
    debug!(
        mode = "fresh",
        json_len = json_bytes.len(),
        total = out.len(),
        "encoded container"
    );
    out
}

/// Pretty JSON (2-space indent, CRLF, no trailing newline) with the
/// `description` field blanked and integral floats written as integers.
pub fn fresh_json(protocol: &ProtocolTree) -> Vec<u8> {
    let mut body = serde_json::Value::Object(protocol.clone());
    integral_numbers(&mut body);
    if let serde_json::Value::Object(map) = &mut body {
        map.insert(
            DESCRIPTION_FIELD.to_string(),
            serde_json::Value::String(String::new()),
        );
    }
    let pretty = format!("{body:#}");
    pretty.replace('\n', "\r\n").into_bytes()
}

fn write_trailer(out: &mut Vec<u8>, description: &str) {
    write_uleb128(out, description.len() as u64);
    out.extend_from_slice(description.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::{RoundTrip, encode, fresh_json};
    use crate::format::header::Header;
    use crate::format::layout;
    use crate::format::parser::decode;
    use crate::protocol::ProtocolTree;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ProtocolTree {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn sample_tree() -> ProtocolTree {
        tree(json!({
            "description": "Arabidopsis long day",
            "repeat": 2147483647,
            "logic": "1.00:00:00",
            "sections": [{"parts": [{
                "group-name": "Light",
                "type": "light",
                "union-tag": "L",
                "unit": "%",
                "vars": ["L1", "L2"],
                "phases": [{"type": "const", "value": 80, "duration": "16:00:00"}]
            }]}]
        }))
    }

    #[test]
    fn fresh_json_uses_crlf_and_blank_description() {
        let json = fresh_json(&tree(json!({"description": "x", "repeat": 1, "vars": []})));
        let text = String::from_utf8(json).unwrap();
        assert_eq!(
            text,
            "{\r\n  \"description\": \"\",\r\n  \"repeat\": 1,\r\n  \"vars\": []\r\n}"
        );
    }

    #[test]
    fn fresh_json_appends_missing_description() {
        let json = fresh_json(&tree(json!({"repeat": 1})));
        let text = String::from_utf8(json).unwrap();
        assert_eq!(text, "{\r\n  \"repeat\": 1,\r\n  \"description\": \"\"\r\n}");
    }

    #[test]
    fn fresh_json_writes_integral_floats_as_integers() {
        let mut bytes = Header::build(40).as_bytes().to_vec();
        bytes.extend_from_slice(br#"{"phases":[{"value":20.0},{"value":18.5}]}"#);
        bytes.push(0x00);
        let decoded = decode(&bytes).unwrap();

        let text = String::from_utf8(fresh_json(decoded.protocol())).unwrap();
        assert!(text.contains("\"value\": 20\r\n"));
        assert!(text.contains("\"value\": 18.5\r\n"));
        assert!(!text.contains("20.0"));

        let encoded = encode(&decoded.protocol_with_description());
        let reread = decode(&encoded).unwrap();
        assert_eq!(reread.protocol()["phases"][0]["value"], 20);
        assert_eq!(
            &encoded[..layout::HEADER_LEN],
            Header::build(text.len()).as_bytes()
        );
    }

    #[test]
    fn fresh_encode_layout() {
        let protocol = sample_tree();
        let bytes = encode(&protocol);
        let json = fresh_json(&protocol);
        let header = Header::build(json.len());

        assert_eq!(&bytes[..layout::HEADER_LEN], header.as_bytes());
        assert_eq!(&bytes[layout::HEADER_LEN..layout::HEADER_LEN + json.len()], &json[..]);
        let trailer = &bytes[layout::HEADER_LEN + json.len()..];
        assert_eq!(trailer[0] as usize, "Arabidopsis long day".len());
        assert_eq!(&trailer[1..], b"Arabidopsis long day");
    }

    #[test]
    fn fresh_encode_is_deterministic() {
        let protocol = sample_tree();
        assert_eq!(encode(&protocol), encode(&protocol));
    }

    #[test]
    fn fresh_encode_empty_description_is_single_zero() {
        let bytes = encode(&tree(json!({"repeat": 1})));
        assert_eq!(bytes.last(), Some(&0x00));
        assert_eq!(bytes[bytes.len() - 2], b'}');
    }

    #[test]
    fn fresh_encode_long_description_uses_multibyte_length() {
        let description = "é".repeat(100);
        let bytes = encode(&tree(json!({"description": description})));
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.description(), description);
        let json_end = layout::HEADER_LEN + decoded.json_bytes().len();
        assert_eq!(&bytes[json_end..json_end + 2], &[0xc8, 0x01]);
    }

    #[test]
    fn round_trip_reproduces_fresh_output() {
        let bytes = encode(&sample_tree());
        let decoded = decode(&bytes).unwrap();
        assert_eq!(encode(&decoded), bytes);
    }

    #[test]
    fn round_trip_keeps_separators_and_trailing_bytes() {
        let mut bytes = Header::build(7).as_bytes().to_vec();
        bytes.extend_from_slice(b"\x00{\"a\":1}\r\n\r\n\x80\x00junk");
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.description(), "");
        assert_eq!(encode(&decoded), bytes);
    }

    #[test]
    fn round_trip_keeps_legacy_tag_bytes() {
        let json = br#"{"phases":[{"type":"clouds"}]}"#;
        let mut bytes = Header::build(json.len()).as_bytes().to_vec();
        bytes.extend_from_slice(json);
        bytes.extend_from_slice(b"\x03abc");

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.protocol()["phases"][0]["type"], "cloud");
        let encoded = encode(&decoded);
        assert_eq!(encoded, bytes);
        assert!(
            encoded
                .windows(b"\"clouds\"".len())
                .any(|window| window == b"\"clouds\"")
        );
    }

    #[test]
    fn round_trip_with_new_description_rebuilds_trailer() {
        let mut bytes = Header::build(2).as_bytes().to_vec();
        bytes.extend_from_slice(b"{}\r\n\x03abc");
        let decoded = decode(&bytes).unwrap();

        let input = RoundTrip::new(decoded.header(), decoded.json_bytes()).with_description("xy");
        let encoded = encode(input);
        let mut expected = Header::build(2).as_bytes().to_vec();
        expected.extend_from_slice(b"{}\x02xy");
        assert_eq!(encoded, expected);
    }

    #[test]
    fn round_trip_description_falls_back_to_protocol_then_empty() {
        let header = Header::build(2);
        let protocol = tree(json!({"description": "from tree"}));

        let with_tree = encode(RoundTrip::new(&header, b"{}").with_protocol(&protocol));
        assert!(with_tree.ends_with(b"\x09from tree"));

        let bare = encode(RoundTrip::new(&header, b"{}"));
        assert!(bare.ends_with(b"{}\x00"));
    }
}
