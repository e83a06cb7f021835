use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::duration::parse_seconds;
use super::error::ProtocolError;
use super::{ProtocolTree, REPEAT_FOREVER, exact_integer};

fn number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match exact_integer(*value) {
        Some(integer) => serializer.serialize_i64(integer),
        None => serializer.serialize_f64(*value),
    }
}

/// Typed view of one chamber-control protocol.
///
/// Missing fields take their defaults, so `{}` is an empty protocol. Values
/// are not range-checked.
///
/// # Examples
/// ```
/// use fyt_core::protocol::Protocol;
/// use serde_json::json;
///
/// let tree = json!({"repeat": 1, "logic": "00:00:00", "sections": []});
/// let protocol = Protocol::from_tree(tree.as_object().unwrap()).unwrap();
/// assert_eq!(protocol.repeat, 1);
/// assert!(protocol.sections.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Protocol {
    pub description: String,
    pub repeat: i64,
    pub logic: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub parts: Vec<Group>,
}

/// One control channel group and its phase timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    #[serde(rename = "group-name")]
    pub group_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "union-tag")]
    pub union_tag: String,
    pub unit: String,
    pub vars: Vec<String>,
    pub phases: Vec<Phase>,
}

/// A timed segment of a channel's output. Files written by older tools tag
/// clouds as `"clouds"`; both spellings read as [`Phase::Cloud`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Phase {
    Const(ConstPhase),
    Ramp(RampPhase),
    Sin(SinPhase),
    #[serde(alias = "clouds")]
    Cloud(CloudPhase),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstPhase {
    #[serde(serialize_with = "number")]
    pub value: f64,
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampPhase {
    pub duration: String,
    pub step: String,
    #[serde(serialize_with = "number")]
    pub start: f64,
    #[serde(serialize_with = "number")]
    pub end: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinPhase {
    pub duration: String,
    pub step: String,
    #[serde(serialize_with = "number")]
    pub offset: f64,
    #[serde(serialize_with = "number")]
    pub amplitude: f64,
    pub period: String,
    /// Phase offset in degrees.
    #[serde(rename = "phase", serialize_with = "number")]
    pub phase_degrees: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudPhase {
    pub duration: String,
    pub step: String,
    #[serde(serialize_with = "number")]
    pub offset: f64,
    #[serde(serialize_with = "number")]
    pub amplitude: f64,
    #[serde(serialize_with = "number")]
    pub density: f64,
    #[serde(serialize_with = "number")]
    pub position: f64,
    #[serde(serialize_with = "number")]
    pub variance: f64,
}

impl Protocol {
    /// Read the typed schema out of a logical tree.
    ///
    /// # Errors
    /// `Schema` when a field has the wrong JSON type or a phase tag is unknown.
    pub fn from_tree(tree: &ProtocolTree) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_value(Value::Object(tree.clone()))?)
    }

    /// Convert back into a logical tree, fields in schema order.
    pub fn to_tree(&self) -> Result<ProtocolTree, ProtocolError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(ProtocolError::Schema(serde::ser::Error::custom(format!(
                "protocol serialized to non-object {other}"
            )))),
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.repeat == REPEAT_FOREVER
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.sections.iter().flat_map(|section| section.parts.iter())
    }
}

impl Group {
    /// Sum of all phase durations, in seconds.
    pub fn total_seconds(&self) -> Result<u64, ProtocolError> {
        self.phases.iter().try_fold(0u64, |total, phase| {
            Ok(total.saturating_add(parse_seconds(phase.duration())?))
        })
    }
}

impl Phase {
    /// The canonical tag written for this phase.
    pub fn kind(&self) -> &'static str {
        match self {
            Phase::Const(_) => "const",
            Phase::Ramp(_) => "ramp",
            Phase::Sin(_) => "sin",
            Phase::Cloud(_) => super::CLOUD_TAG,
        }
    }

    pub fn duration(&self) -> &str {
        match self {
            Phase::Const(phase) => &phase.duration,
            Phase::Ramp(phase) => &phase.duration,
            Phase::Sin(phase) => &phase.duration,
            Phase::Cloud(phase) => &phase.duration,
        }
    }
}
