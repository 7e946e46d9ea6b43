//! Tree data model
//!
//! A [`TreeNode`] is an ordered record of attributes plus child nodes. The
//! picker never assumes fixed field names: the label and value are read via
//! the configured `label_key` / `value_key`, and every other attribute is
//! carried through untouched.
//!
//! Labels may be plain strings or structured content. Structured content
//! (JSON objects with `text`/`children`, or arrays of fragments) is flattened
//! to its concatenated text for searching.

use std::borrow::Cow;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{read_to_string, Result};

/// A node of the picker's tree
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Arbitrary attributes, including the label and value fields
    #[serde(flatten)]
    pub attrs: IndexMap<String, Value>,
    /// Ordered child nodes; empty for leaves
    #[serde(
        default,
        deserialize_with = "nullable_children",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<TreeNode>,
}

fn nullable_children<'de, D>(deserializer: D) -> std::result::Result<Vec<TreeNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TreeNode>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TreeNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// A leaf with `label` and `value` under the default field names
    pub fn leaf(label: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self::new().attr("label", label).attr("value", value)
    }

    /// A node with children under the default field names
    pub fn branch(
        label: impl Into<Value>,
        value: impl Into<Value>,
        children: Vec<TreeNode>,
    ) -> Self {
        let mut node = Self::leaf(label, value);
        node.children = children;
        node
    }

    /// Set an attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Append a child
    pub fn child(mut self, node: TreeNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    /// The label stored under `label_key`
    pub fn label(&self, label_key: &str) -> Label<'_> {
        Label::from_value(self.attrs.get(label_key))
    }

    /// The value stored under `value_key`
    pub fn value(&self, value_key: &str) -> Option<&Value> {
        self.attrs.get(value_key)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Visit `nodes` depth-first (pre-order) with each node's depth
pub fn walk<'a, F>(nodes: &'a [TreeNode], f: &mut F)
where
    F: FnMut(&'a TreeNode, usize),
{
    fn visit<'a, F>(nodes: &'a [TreeNode], depth: usize, f: &mut F)
    where
        F: FnMut(&'a TreeNode, usize),
    {
        for node in nodes {
            f(node, depth);
            visit(&node.children, depth + 1, f);
        }
    }
    visit(nodes, 0, f);
}

/// Parse a JSON array of nodes
pub fn parse_tree(json: &str) -> Result<Vec<TreeNode>> {
    Ok(serde_json::from_str(json)?)
}

/// Load a JSON array of nodes from disk
pub fn load_tree(path: impl AsRef<Path>) -> Result<Vec<TreeNode>> {
    parse_tree(&read_to_string(path.as_ref())?)
}

/// A node label as it appears in the data
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Label<'a> {
    /// Plain text
    Text(&'a str),
    /// Structured content (object or array of fragments)
    Rich(&'a Value),
    /// Anything else: numbers, booleans, null, or a missing field
    Other,
}

impl<'a> Label<'a> {
    pub fn from_value(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::String(s)) => Label::Text(s),
            Some(v @ (Value::Object(_) | Value::Array(_))) => Label::Rich(v),
            _ => Label::Other,
        }
    }

    /// The searchable text, or `None` for content that cannot be matched
    pub fn text(&self) -> Option<Cow<'a, str>> {
        match *self {
            Label::Text(s) => Some(Cow::Borrowed(s)),
            Label::Rich(v) => {
                let mut out = String::new();
                flatten_into(v, &mut out);
                Some(Cow::Owned(out))
            }
            Label::Other => None,
        }
    }

    /// Case-insensitive substring match against the flattened text
    pub fn contains_ignore_case(&self, keyword: &str) -> bool {
        let Some(text) = self.text() else {
            return false;
        };
        text.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// Concatenate the text leaves of structured content
fn flatten_into(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Array(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("text") {
                out.push_str(text);
            }
            if let Some(children) = map.get("children") {
                flatten_into(children, out);
            } else if let Some(children) = map.get("props").and_then(|p| p.get("children")) {
                flatten_into(children, out);
            }
        }
        Value::Bool(_) | Value::Null => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tree_keeps_extra_attributes() {
        let data = parse_tree(
            r#"[
                {"label": "Fruit", "value": "fruit", "icon": "basket", "children": [
                    {"label": "Apple", "value": "apple"}
                ]},
                {"label": "Nuts", "value": "nuts", "children": null}
            ]"#,
        )
        .unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data[0].get("icon"), Some(&json!("basket")));
        assert_eq!(data[0].children.len(), 1);
        assert_eq!(data[0].children[0].value("value"), Some(&json!("apple")));
        assert!(data[1].is_leaf());
    }

    #[test]
    fn test_custom_label_and_value_keys() {
        let node = TreeNode::new().attr("name", "Apple").attr("id", 7);
        assert_eq!(node.label("name"), Label::Text("Apple"));
        assert_eq!(node.value("id"), Some(&json!(7)));
        assert_eq!(node.label("label"), Label::Other);
    }

    #[test]
    fn test_rich_label_flattens_text() {
        let rich = json!({
            "tag": "span",
            "children": ["Gala ", {"tag": "b", "children": "Apple"}, {"text": " #", "children": [2]}]
        });
        let node = TreeNode::new().attr("label", rich);
        let label = node.label("label");

        assert!(matches!(label, Label::Rich(_)));
        assert_eq!(label.text().as_deref(), Some("Gala Apple #2"));
        assert!(label.contains_ignore_case("apple"));
    }

    #[test]
    fn test_react_style_props_children() {
        let rich = json!({"type": "em", "props": {"children": ["Pear"]}});
        assert_eq!(Label::from_value(Some(&rich)).text().as_deref(), Some("Pear"));
    }

    #[test]
    fn test_other_labels_never_match() {
        let number = json!(42);
        let label = Label::from_value(Some(&number));
        assert_eq!(label, Label::Other);
        assert_eq!(label.text(), None);
        assert!(!label.contains_ignore_case("4"));
    }

    #[test]
    fn test_walk_reports_depth() {
        let data = vec![TreeNode::branch(
            "Fruit",
            "fruit",
            vec![TreeNode::branch(
                "Apple",
                "apple",
                vec![TreeNode::leaf("Gala", "gala")],
            )],
        )];

        let mut seen = Vec::new();
        walk(&data, &mut |node: &TreeNode, depth| {
            seen.push((node.value("value").cloned(), depth));
        });

        assert_eq!(
            seen,
            vec![
                (Some(json!("fruit")), 0),
                (Some(json!("apple")), 1),
                (Some(json!("gala")), 2),
            ]
        );
    }
}
