//! Node types: NodeId, Value, NodeData, NodeSpec.

use std::borrow::Cow;
use std::fmt;

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a document node. Copy, lightweight (u64).
    pub struct NodeId;
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A property value. A missing property is represented by `None` at the call
/// site, never by a variant of this enum.
///
/// Equality is loose: values of different variants compare by their canonical
/// text, so `Number(2.0) == String("2")` and `Bool(true) == String("true")`.
/// Values read back from markup are always strings; this keeps documents equal
/// across a serialize/parse round trip.
#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    Number(f64),
    Bool(bool),
}

impl Value {
    /// Canonical text form. Whole numbers print without a fraction.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Number(n) => Cow::Owned(format_number(*n)),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }

    /// Numeric value, or `0.0` if the value cannot be read as a number.
    pub fn as_f64(&self) -> f64 {
        self.try_f64().unwrap_or(0.0)
    }

    /// Numeric value, `None` on conversion failure.
    pub fn try_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Integer value, rounded. `0` on conversion failure.
    pub fn as_i64(&self) -> i64 {
        self.as_f64().round() as i64
    }

    /// Truthiness: `true`/`yes` (any case) or a non-zero number.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("true")
                    || s.eq_ignore_ascii_case("yes")
                    || s.parse::<f64>().map(|n| n != 0.0).unwrap_or(false)
            }
        }
    }

    /// Whether the value is an empty string.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::String(s) if s.is_empty())
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => self.as_text() == other.as_text(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// NodeData
// ---------------------------------------------------------------------------

/// Data stored for one node in a [`Document`](super::Document): a type tag and
/// an ordered list of named properties.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Type tag (e.g. "View", "Slider", "Classes", or a class name).
    pub node_type: String,
    properties: Vec<(String, Value)>,
}

impl NodeData {
    /// Create a node with the given type tag and no properties.
    pub fn new(node_type: impl Into<String>) -> Self {
        Self { node_type: node_type.into(), properties: Vec::new() }
    }

    /// Set a property (builder).
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(name, value.into());
        self
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Whether the node carries `name`.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|(n, _)| n == name)
    }

    /// Set a property, keeping its position if it already exists.
    ///
    /// Returns the previous value.
    pub fn set_property(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.properties.push((name, value));
                None
            }
        }
    }

    /// Remove a property, returning its value.
    pub fn remove_property(&mut self, name: &str) -> Option<Value> {
        let index = self.properties.iter().position(|(n, _)| n == name)?;
        Some(self.properties.remove(index).1)
    }

    /// Properties in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of properties.
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// The space separated tokens of the `class` property.
    pub fn class_names(&self) -> Vec<String> {
        self.property("class")
            .map(|v| v.as_text().split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Whether the `class` property contains `class` as a whole token.
    pub fn has_class(&self, class: &str) -> bool {
        self.property("class")
            .map(|v| v.as_text().split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// NodeSpec
// ---------------------------------------------------------------------------

/// An owned, detached node tree.
///
/// Used to build documents declaratively, to insert whole subtrees, and as the
/// value form of a document for serialization and deep comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub data: NodeData,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// Create a leaf spec with the given type tag.
    pub fn new(node_type: impl Into<String>) -> Self {
        Self { data: NodeData::new(node_type), children: Vec::new() }
    }

    /// Set a property (builder).
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.set_property(name, value.into());
        self
    }

    /// Set the `id` property (builder).
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_property("id", id.into())
    }

    /// Append a class token to the `class` property (builder). Duplicates are
    /// ignored.
    pub fn with_class(mut self, class: &str) -> Self {
        if self.data.has_class(class) {
            return self;
        }
        let mut classes = self.data.class_names();
        classes.push(class.to_owned());
        self.data.set_property("class", Value::String(classes.join(" ")));
        self
    }

    /// Append a child (builder).
    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children (builder).
    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }

    /// Type tag.
    pub fn node_type(&self) -> &str {
        &self.data.node_type
    }

    /// First direct child with the given type tag.
    pub fn child(&self, node_type: &str) -> Option<&NodeSpec> {
        self.children.iter().find(|c| c.data.node_type == node_type)
    }

    /// Total number of nodes in this subtree.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(NodeSpec::len).sum::<usize>()
    }

    /// Always false; a spec has at least its own node.
    pub fn is_empty(&self) -> bool {
        false
    }
}
