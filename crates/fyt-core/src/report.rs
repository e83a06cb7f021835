use serde::{Deserialize, Serialize};

use crate::format::DecodedContainer;
use crate::format::header::Header;
use crate::protocol::duration::format_seconds;
use crate::protocol::{Protocol, ProtocolTree};

/// Deterministic summary of one decoded container.
///
/// # Examples
/// ```
/// use fyt_core::{ProtocolTree, build_report, decode, encode};
///
/// let bytes = encode(&ProtocolTree::new());
/// let report = build_report(&decode(&bytes)?);
/// assert!(report.length_pair_consistent);
/// assert!(report.groups.is_empty());
/// # Ok::<(), fyt_core::FormatError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerReport {
    /// Trailer description.
    pub description: String,
    /// Length of the embedded JSON in bytes.
    pub json_len: usize,
    /// Header bytes 19..22.
    pub version: [u8; 3],
    /// Header bytes 22..24 as stored.
    pub length_pair: [u8; 2],
    /// Header bytes 22..24 a fresh encode would write for `json_len`.
    pub expected_length_pair: [u8; 2],
    pub length_pair_consistent: bool,
    /// Per-group summaries in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupSummary>,
    /// Set when the tree does not fit the typed schema; `groups` is then empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_error: Option<String>,
    /// Normalized protocol tree.
    pub protocol: ProtocolTree,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub name: String,
    pub kind: String,
    pub unit: String,
    pub vars: Vec<String>,
    /// Phase tags in order, legacy spellings normalized.
    pub phases: Vec<String>,
    /// Sum of phase durations, absent if one of them does not parse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<String>,
}

pub fn build_report(decoded: &DecodedContainer) -> ContainerReport {
    let header = decoded.header();
    let json_len = decoded.json_bytes().len();
    let (lo, hi) = header.length_pair();
    let (expected_lo, expected_hi) = Header::expected_length_pair(json_len);

    let (groups, schema_error) = match Protocol::from_tree(decoded.protocol()) {
        Ok(protocol) => (protocol.groups().map(summarize_group).collect(), None),
        Err(err) => (Vec::new(), Some(err.to_string())),
    };

    ContainerReport {
        description: decoded.description().to_string(),
        json_len,
        version: header.version(),
        length_pair: [lo, hi],
        expected_length_pair: [expected_lo, expected_hi],
        length_pair_consistent: header.length_pair_matches(json_len),
        groups,
        schema_error,
        protocol: decoded.protocol().clone(),
    }
}

fn summarize_group(group: &crate::protocol::Group) -> GroupSummary {
    GroupSummary {
        name: group.group_name.clone(),
        kind: group.kind.clone(),
        unit: group.unit.clone(),
        vars: group.vars.clone(),
        phases: group
            .phases
            .iter()
            .map(|phase| phase.kind().to_string())
            .collect(),
        total_duration: group.total_seconds().ok().map(format_seconds),
    }
}
