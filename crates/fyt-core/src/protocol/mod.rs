//! The logical protocol document carried inside an FYT container.
//!
//! Decoding yields a [`ProtocolTree`], a key-ordered JSON object with legacy
//! tags normalized. The typed [`Protocol`] schema is an optional view over
//! that tree for callers that want checked field access.

pub mod duration;
pub mod error;
pub mod normalize;
pub mod schema;

pub use error::ProtocolError;
pub use schema::{CloudPhase, ConstPhase, Group, Phase, Protocol, RampPhase, Section, SinPhase};

/// Key-ordered JSON object holding one protocol document.
pub type ProtocolTree = serde_json::Map<String, serde_json::Value>;

/// `repeat` value callers use for "run forever".
pub const REPEAT_FOREVER: i64 = 2_147_483_647;

pub const DESCRIPTION_FIELD: &str = "description";
pub const TAG_FIELD: &str = "type";
pub const CLOUD_TAG: &str = "cloud";
pub const LEGACY_CLOUD_TAG: &str = "clouds";

// Largest magnitude below which every integral f64 is exact.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// `Some` when `value` prints as a plain integer in the reference JSON writer
/// (`20.0` becomes `20`).
pub(crate) fn exact_integer(value: f64) -> Option<i64> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        Some(value as i64)
    } else {
        None
    }
}

/// Rewrite integral floats anywhere in `value` as integers.
pub(crate) fn integral_numbers(value: &mut serde_json::Value) {
    let integer = match value {
        serde_json::Value::Number(number) if number.is_f64() => {
            number.as_f64().and_then(exact_integer)
        }
        _ => None,
    };
    if let Some(integer) = integer {
        *value = serde_json::Value::from(integer);
        return;
    }
    match value {
        serde_json::Value::Array(items) => items.iter_mut().for_each(integral_numbers),
        serde_json::Value::Object(map) => map.values_mut().for_each(integral_numbers),
        _ => {}
    }
}

/// Text of the tree's `description` field: strings as-is, `null` or missing
/// as empty, anything else as its JSON text.
pub fn tree_description(tree: &ProtocolTree) -> String {
    match tree.get(DESCRIPTION_FIELD) {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
