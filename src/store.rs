//! Application property store: a path-addressable key/value tree.
//!
//! Paths are colon separated. All segments but the last name nested nodes,
//! created on demand when writing; the last segment is the property name.
//! Empty segments are ignored, so `"ui::tab"` and `"ui:tab"` are the same key.

use crate::document::{Document, ListenerId, NodeId, Value};
use crate::document::DocumentEvent;

/// Root tag of the store's backing document.
pub const STORE_ROOT: &str = "Properties";

/// Key/value store shared by the application and the layout engine.
///
/// Used for tab selection persistence, class activation flags and visibility
/// bindings. Every effective write is reported once through
/// [`PropertyStore::take_changes`].
#[derive(Debug)]
pub struct PropertyStore {
    doc: Document,
    listener: ListenerId,
}

impl PropertyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let mut doc = Document::new(STORE_ROOT);
        let listener = doc.subscribe();
        Self { doc, listener }
    }

    /// Read the value at `path`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let (nodes, name) = split_path(path)?;
        let mut current = self.doc.root();
        for segment in nodes {
            current = self.doc.child_with_type(current, segment)?;
        }
        self.doc.property(current, name)
    }

    /// Read `path` as a bool; missing values read as `false`.
    pub fn get_bool(&self, path: &str) -> bool {
        self.get(path).map(Value::as_bool).unwrap_or(false)
    }

    /// Read `path` as a number; missing values read as `0`.
    pub fn get_f64(&self, path: &str) -> f64 {
        self.get(path).map(Value::as_f64).unwrap_or(0.0)
    }

    /// Write `value` at `path`, creating intermediate nodes. Returns whether
    /// the stored value changed.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> bool {
        let Some((nodes, name)) = split_path(path) else {
            log::debug!("property store: empty path");
            return false;
        };
        let mut current = self.doc.root();
        for segment in nodes {
            match self.doc.get_or_create_child(current, segment, None) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.doc.set_property(current, name, value, None)
    }

    /// Remove the value at `path`. Returns whether it existed.
    pub fn remove(&mut self, path: &str) -> bool {
        let Some((nodes, name)) = split_path(path) else {
            return false;
        };
        let mut current = self.doc.root();
        for segment in nodes {
            match self.doc.child_with_type(current, segment) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.doc.remove_property(current, name, None)
    }

    /// Paths written since the last call, in write order, without duplicates.
    pub fn take_changes(&mut self) -> Vec<String> {
        let mut paths: Vec<String> = Vec::new();
        for event in self.doc.drain(self.listener) {
            if let DocumentEvent::PropertyChanged { node, name } = event {
                let path = self.path_of(node, &name);
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }
        paths
    }

    /// The backing document, for inspection and serialization.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    fn path_of(&self, node: NodeId, name: &str) -> String {
        let mut segments: Vec<&str> = self
            .doc
            .ancestors(node)
            .into_iter()
            .rev()
            .skip(1)
            .filter_map(|n| self.doc.node_type(n))
            .collect();
        if node != self.doc.root() {
            if let Some(t) = self.doc.node_type(node) {
                segments.push(t);
            }
        }
        segments.push(name);
        segments.join(":")
    }
}

impl Default for PropertyStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a path to its canonical `a:b:c` form.
pub fn normalize_path(path: &str) -> String {
    path.split(':').filter(|s| !s.is_empty()).collect::<Vec<_>>().join(":")
}

fn split_path(path: &str) -> Option<(Vec<&str>, &str)> {
    let mut segments: Vec<&str> = path.split(':').filter(|s| !s.is_empty()).collect();
    let name = segments.pop()?;
    Some((segments, name))
}
