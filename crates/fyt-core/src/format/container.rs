use crate::protocol::{DESCRIPTION_FIELD, ProtocolTree};

use super::header::Header;

/// Bytes a decode skipped or consumed around the JSON payload.
///
/// Replayed by a round-trip encode so that untouched files come back
/// byte-for-byte, whatever their separators or trailer encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Framing {
    /// Bytes between the header and the first `{`.
    pub leading: Vec<u8>,
    /// CR/LF run after the closing `}`.
    pub separator: Vec<u8>,
    /// Varint, description bytes and anything after them.
    pub trailer: Vec<u8>,
}

/// Result of decoding one FYT buffer.
///
/// The header and JSON bytes are kept exactly as read and have no mutators;
/// they only feed a round-trip encode. Edit [`protocol`](Self::protocol) via
/// [`into_protocol`](Self::into_protocol) and fresh-encode the result.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedContainer {
    pub(crate) protocol: ProtocolTree,
    pub(crate) header: Header,
    pub(crate) json_bytes: Vec<u8>,
    pub(crate) description: String,
    pub(crate) framing: Framing,
}

impl DecodedContainer {
    /// Normalized logical tree.
    pub fn protocol(&self) -> &ProtocolTree {
        &self.protocol
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The embedded JSON exactly as stored, legacy tags included.
    pub fn json_bytes(&self) -> &[u8] {
        &self.json_bytes
    }

    /// Free-text description from the trailer.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn into_protocol(self) -> ProtocolTree {
        self.protocol
    }

    /// The logical tree with its `description` field set to the trailer
    /// description; fresh-encoding it moves the text back into the trailer.
    pub fn protocol_with_description(&self) -> ProtocolTree {
        let mut tree = self.protocol.clone();
        tree.insert(
            DESCRIPTION_FIELD.to_string(),
            serde_json::Value::String(self.description.clone()),
        );
        tree
    }
}
