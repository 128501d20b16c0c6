//! Node Model
//!
//! Classifies raw JSON values from the frontend's parse tree into the fixed
//! node grammar. Every serialized node looks like:
//!
//! ```text
//! { "node": Tag, "root": Tag, "left"?: Child, "right"?: Child, "_meta"?: any }
//! ```
//!
//! where a `Tag` is a string or an array of sub-tags, and a `Child` is null,
//! a single object, or an array of sibling nodes.

use serde_json::{Map, Value};
use std::fmt;

use crate::domain::error::{TreeError, TreeResult};

/// The runtime shape of a JSON value, as reported in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Missing,
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl JsonShape {
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None => JsonShape::Missing,
            Some(Value::Null) => JsonShape::Null,
            Some(Value::Bool(_)) => JsonShape::Boolean,
            Some(Value::Number(_)) => JsonShape::Number,
            Some(Value::String(_)) => JsonShape::String,
            Some(Value::Array(_)) => JsonShape::Array,
            Some(Value::Object(_)) => JsonShape::Object,
        }
    }
}

impl fmt::Display for JsonShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            JsonShape::Missing => "missing",
            JsonShape::Null => "null",
            JsonShape::Boolean => "a boolean",
            JsonShape::Number => "a number",
            JsonShape::String => "a string",
            JsonShape::Array => "an array",
            JsonShape::Object => "an object",
        };
        f.write_str(text)
    }
}

/// Schema-bound positions of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Node,
    Root,
    Left,
    Right,
    /// A member of a `left`/`right` sibling sequence.
    Element,
}

impl Field {
    pub fn key(&self) -> &'static str {
        match self {
            Field::Node => "node",
            Field::Root => "root",
            Field::Left => "left",
            Field::Right => "right",
            Field::Element => "element",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A classified `node` or `root` value, borrowed from the parsed document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeTag<'v> {
    /// A single tag name.
    Name(&'v str),
    /// A sequence of sub-tags.
    Sequence(&'v [Value]),
}

impl<'v> NodeTag<'v> {
    pub fn as_name(&self) -> Option<&'v str> {
        match self {
            NodeTag::Name(name) => Some(*name),
            NodeTag::Sequence(_) => None,
        }
    }

    /// Human-readable label: the name itself, or the sub-tags joined by `/`.
    pub fn label(&self) -> String {
        match self {
            NodeTag::Name(name) => (*name).to_string(),
            NodeTag::Sequence(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("/"),
        }
    }
}

impl fmt::Display for NodeTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A classified `left`/`right` value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeafValue<'v> {
    /// A single composite child.
    Composite(&'v Map<String, Value>),
    /// A sequence of sibling children.
    Sequence(&'v [Value]),
    /// No child at this position.
    Absent,
}

impl<'v> LeafValue<'v> {
    pub fn as_object(&self) -> Option<&'v Map<String, Value>> {
        match self {
            LeafValue::Composite(map) => Some(*map),
            _ => None,
        }
    }

    /// The `node` tag of a composite leaf, if it carries a well-formed one.
    pub fn tag(&self) -> Option<NodeTag<'v>> {
        self.as_object()
            .and_then(|map| classify_tag(Field::Node, map.get("node")).ok())
    }
}

/// Classify the value at a `node` or `root` position.
///
/// Only a string or an array is accepted; anything else (including a
/// missing key) is a malformed tree.
pub fn classify_tag(field: Field, value: Option<&Value>) -> TreeResult<NodeTag<'_>> {
    match value {
        Some(Value::String(name)) => Ok(NodeTag::Name(name.as_str())),
        Some(Value::Array(items)) => Ok(NodeTag::Sequence(items.as_slice())),
        other => Err(TreeError::malformed(field, JsonShape::of(other))),
    }
}

/// Classify the value at a `left` or `right` position.
///
/// A missing key and an explicit null are both absent.
pub fn classify_leaf(field: Field, value: Option<&Value>) -> TreeResult<LeafValue<'_>> {
    match value {
        None | Some(Value::Null) => Ok(LeafValue::Absent),
        Some(Value::Object(map)) => Ok(LeafValue::Composite(map)),
        Some(Value::Array(items)) => Ok(LeafValue::Sequence(items.as_slice())),
        other => Err(TreeError::malformed(field, JsonShape::of(other))),
    }
}

/// A typed view over one serialized AST node.
///
/// `node` and `root` are classified up front. The child positions are kept
/// raw and classified on demand, so a walker can deliver every leaf under
/// `left` before it looks at `right`.
#[derive(Debug, Clone, Copy)]
pub struct AstNode<'v> {
    pub node: NodeTag<'v>,
    pub root: NodeTag<'v>,
    left: Option<&'v Value>,
    right: Option<&'v Value>,
    /// Frontend annotations, passed through uninterpreted.
    pub meta: Option<&'v Value>,
}

impl<'v> AstNode<'v> {
    /// Classify `node` then `root`. The first offending field wins.
    pub fn from_value(value: &'v Value) -> TreeResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(TreeError::malformed(Field::Element, JsonShape::of(Some(other)))),
        };
        Ok(AstNode {
            node: classify_tag(Field::Node, map.get("node"))?,
            root: classify_tag(Field::Root, map.get("root"))?,
            left: map.get("left"),
            right: map.get("right"),
            meta: map.get("_meta"),
        })
    }

    pub fn left(&self) -> TreeResult<LeafValue<'v>> {
        classify_leaf(Field::Left, self.left)
    }

    pub fn right(&self) -> TreeResult<LeafValue<'v>> {
        classify_leaf(Field::Right, self.right)
    }

    /// The raw value at a child position, for deferred classification.
    pub fn child(&self, field: Field) -> Option<&'v Value> {
        match field {
            Field::Left => self.left,
            Field::Right => self.right,
            _ => None,
        }
    }
}

/// Whether an object carries a non-null child position of its own.
pub fn has_children(map: &Map<String, Value>) -> bool {
    ["left", "right"]
        .iter()
        .any(|key| matches!(map.get(*key), Some(v) if !v.is_null()))
}
