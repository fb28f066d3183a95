//! Cascade resolution.
//!
//! [`ResolveCx`] bundles the stylesheet with the two documents and answers
//! "what is property P of view node N". Precedence, first hit wins:
//!
//! **Local → Id → Class → Type → (parent: recursive Class → Type) → … → Default**
//!
//! Only the queried node's own properties, id entry and classes take part.
//! Ancestors contribute through their recursive classes and their type entry,
//! and the climb continues until a node without a parent.

use crate::document::{Document, NodeId, Value};

use super::defaults;
use super::names;
use super::palette::Colour;
use super::stylesheet::Stylesheet;

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A property on the view node itself.
    Local(NodeId),
    /// A `Nodes/<id>` entry in the style document.
    Id(NodeId),
    /// A class node in the style document.
    Class(NodeId),
    /// A `Types/<type>` entry in the style document.
    Type(NodeId),
    /// The built-in default.
    Default,
}

/// A resolved value together with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    pub source: Source,
    /// The view node whose cascade level produced the value. `None` for
    /// defaults.
    pub level: Option<NodeId>,
}

impl Resolved {
    /// Whether the value was found at an ancestor rather than the queried node.
    pub fn is_inherited(&self, queried: NodeId) -> bool {
        self.level.is_some_and(|level| level != queried)
    }
}

/// Everything needed to resolve a property. Cheap to copy.
#[derive(Clone, Copy)]
pub struct ResolveCx<'a> {
    pub sheet: &'a Stylesheet,
    pub styles: &'a Document,
    pub view: &'a Document,
}

impl<'a> ResolveCx<'a> {
    pub fn new(sheet: &'a Stylesheet, styles: &'a Document, view: &'a Document) -> Self {
        Self { sheet, styles, view }
    }

    /// The value of `name` for `node`, including the built-in default.
    pub fn property(&self, node: NodeId, name: &str) -> Option<Value> {
        self.resolve(name, node, true).map(|r| r.value)
    }

    /// Resolve `name` for `node`, falling back to ancestors and then to the
    /// built-in default. `None` only when there is no default either.
    ///
    /// With `inherit == false` the node is treated as an ancestor level: its
    /// own properties, id entry and non-recursive classes are skipped.
    pub fn resolve(&self, name: &str, node: NodeId, inherit: bool) -> Option<Resolved> {
        let mut current = node;
        let mut inherit = inherit;
        // A tree can't be deeper than its node count; anything beyond is a
        // broken parent chain.
        for _ in 0..=self.view.len() {
            if let Some(found) = self.resolve_level(name, current, inherit) {
                return Some(found);
            }
            match self.view.parent(current) {
                Some(parent) => current = parent,
                None => return self.default(name),
            }
            inherit = false;
        }
        debug_assert!(false, "parent chain of {node:?} does not terminate");
        self.default(name)
    }

    /// Resolve a colour-valued property and pass it through the palette.
    pub fn colour(&self, node: NodeId, name: &str) -> Colour {
        let token = self
            .property(node, name)
            .map(|v| v.as_text().into_owned())
            .unwrap_or_default();
        self.sheet.colour(self.styles, &token)
    }

    /// Resolve a colour property, or `fallback` when no scope defines it.
    pub fn colour_or(&self, node: NodeId, name: &str, fallback: Colour) -> Colour {
        match self.property(node, name) {
            Some(v) => self.sheet.colour(self.styles, &v.as_text()),
            None => fallback,
        }
    }

    fn resolve_level(&self, name: &str, node: NodeId, inherit: bool) -> Option<Resolved> {
        let data = self.view.get(node)?;
        let hit = |value: &Value, source: Source| {
            Some(Resolved { value: value.clone(), source, level: Some(node) })
        };

        if inherit {
            if let Some(value) = data.property(name) {
                return hit(value, Source::Local(node));
            }
            if let Some(entry) = self.id_entry(data.property(names::ID)) {
                if let Some(value) = self.styles.property(entry, name) {
                    return hit(value, Source::Id(entry));
                }
            }
        }

        let media = self.sheet.media_size();
        for class_name in data.class_names() {
            let Some(class) = self.sheet.classes().get(&class_name) else {
                log::trace!("class {class_name:?} is not defined");
                continue;
            };
            if !(class.is_recursive || inherit) {
                continue;
            }
            if class.applies(media) {
                if let Some(value) = self.styles.property(class.node, name) {
                    return hit(value, Source::Class(class.node));
                }
            }
            // A defined class that misses hands over to the type entry, so
            // later classes only apply when the type lacks the property.
            if inherit {
                if let Some((entry, value)) = self.type_property(&data.node_type, name) {
                    return hit(value, Source::Type(entry));
                }
            }
        }

        let (entry, value) = self.type_property(&data.node_type, name)?;
        hit(value, Source::Type(entry))
    }

    fn type_property(&self, node_type: &str, name: &str) -> Option<(NodeId, &Value)> {
        let types = self.sheet.section(self.styles, names::TYPES)?;
        let entry = self.styles.child_with_type(types, node_type)?;
        Some((entry, self.styles.property(entry, name)?))
    }

    fn id_entry(&self, id: Option<&Value>) -> Option<NodeId> {
        let id = id?.as_text();
        if id.is_empty() {
            return None;
        }
        let nodes = self.sheet.section(self.styles, names::NODES)?;
        self.styles.child_with_type(nodes, &id)
    }

    fn default(&self, name: &str) -> Option<Resolved> {
        defaults::default_value(name).map(|value| Resolved { value, source: Source::Default, level: None })
    }
}
