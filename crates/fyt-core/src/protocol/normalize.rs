//! Legacy tag rewriting on the logical tree.

use serde_json::{Map, Value};

use super::{CLOUD_TAG, LEGACY_CLOUD_TAG, TAG_FIELD};

/// The node kinds the rewrite walk distinguishes.
enum Node<'a> {
    Object(&'a mut Map<String, Value>),
    Array(&'a mut Vec<Value>),
    Scalar,
}

impl<'a> From<&'a mut Value> for Node<'a> {
    fn from(value: &'a mut Value) -> Self {
        match value {
            Value::Object(map) => Node::Object(map),
            Value::Array(items) => Node::Array(items),
            _ => Node::Scalar,
        }
    }
}

/// Rewrite every `"type": "clouds"` to `"type": "cloud"`, at any depth.
///
/// Idempotent; only the tag field of matching objects changes.
///
/// # Examples
/// ```
/// use fyt_core::protocol::normalize::normalize_value;
/// use serde_json::json;
///
/// let mut tree = json!({"phases": [{"type": "clouds"}, {"type": "ramp"}]});
/// normalize_value(&mut tree);
/// assert_eq!(tree["phases"][0]["type"], "cloud");
/// assert_eq!(tree["phases"][1]["type"], "ramp");
/// ```
pub fn normalize_value(value: &mut Value) {
    visit(Node::from(value));
}

pub fn normalize_tree(tree: &mut Map<String, Value>) {
    visit(Node::Object(tree));
}

/// Owned form of [`normalize_tree`].
pub fn normalize(mut tree: Map<String, Value>) -> Map<String, Value> {
    normalize_tree(&mut tree);
    tree
}

fn visit(node: Node<'_>) {
    match node {
        Node::Object(map) => {
            if let Some(tag) = map.get_mut(TAG_FIELD) {
                if tag.as_str() == Some(LEGACY_CLOUD_TAG) {
                    *tag = Value::String(CLOUD_TAG.to_string());
                }
            }
            for child in map.values_mut() {
                visit(Node::from(child));
            }
        }
        Node::Array(items) => {
            for child in items.iter_mut() {
                visit(Node::from(child));
            }
        }
        Node::Scalar => {}
    }
}
