//! The document arena: queries, undoable mutations, subscriptions.

use slotmap::{SecondaryMap, SlotMap};

use super::events::{DocumentEvent, ListenerId, Listeners};
use super::node::{NodeData, NodeId, NodeSpec, Value};
use super::undo::{Change, DocId, UndoLog};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// An ordered, observable tree of typed nodes backed by a slotmap arena.
///
/// A document always has a root. Parent/child relationships are kept in
/// secondary maps; a node id appears in at most one child list. Nodes that were
/// removed through an [`UndoLog`] stay in the arena, detached, so they can be
/// restored; [`Document::is_attached`] tells the two apart.
#[derive(Debug)]
pub struct Document {
    id: DocId,
    nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: NodeId,
    listeners: Listeners,
}

impl Document {
    /// Create a document whose root has the given type tag.
    pub fn new(root_type: impl Into<String>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(root_type));
        let mut children = SecondaryMap::new();
        children.insert(root, Vec::new());
        Self {
            id: DocId::next(),
            nodes,
            children,
            parent: SecondaryMap::new(),
            root,
            listeners: Listeners::default(),
        }
    }

    /// Build a document from an owned tree. The spec's root becomes the
    /// document root.
    pub fn from_spec(spec: &NodeSpec) -> Self {
        let mut doc = Document::new(spec.data.node_type.clone());
        let root = doc.root;
        doc.nodes[root] = spec.data.clone();
        for child in &spec.children {
            let id = doc.build(child);
            doc.attach(root, usize::MAX, id);
        }
        doc
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Identity used by [`UndoLog`] to route changes.
    pub fn id(&self) -> DocId {
        self.id
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `node` exists in the arena (attached or not).
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Node data, if the node exists.
    pub fn get(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node)
    }

    /// Type tag of `node`.
    pub fn node_type(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node).map(|d| d.node_type.as_str())
    }

    /// A property of `node`.
    pub fn property(&self, node: NodeId, name: &str) -> Option<&Value> {
        self.nodes.get(node)?.property(name)
    }

    /// The parent of `node`, or `None` for the root and detached subtree roots.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent.get(node).copied()
    }

    /// The children of `node` in order. Empty for unknown nodes.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.children.get(node).map(Vec::as_slice).unwrap_or(EMPTY_CHILDREN)
    }

    /// Position of `node` in its parent's child list.
    pub fn child_index(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    /// Ancestors of `node`, nearest first. Does not include `node`.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            result.push(parent);
            current = parent;
        }
        result
    }

    /// First direct child of `parent` with type tag `node_type`.
    pub fn child_with_type(&self, parent: NodeId, node_type: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.node_type(c) == Some(node_type))
    }

    /// First direct child of `parent` whose property `name` equals `value`.
    pub fn child_with_property(&self, parent: NodeId, name: &str, value: &Value) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.property(c, name) == Some(value))
    }

    /// Whether `node` is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        if !self.contains(node) {
            return false;
        }
        node == self.root || self.ancestors(node).last() == Some(&self.root)
    }

    /// Whether `ancestor` appears above `node` (at any depth).
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Walk the subtree at `start` in depth-first pre-order.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        if !self.contains(start) {
            return result;
        }
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            result.push(id);
            for &child in self.children(id).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Copy the subtree at `node` into an owned [`NodeSpec`].
    pub fn to_spec(&self, node: NodeId) -> Option<NodeSpec> {
        let data = self.nodes.get(node)?.clone();
        let children = self
            .children(node)
            .iter()
            .filter_map(|&c| self.to_spec(c))
            .collect();
        Some(NodeSpec { data, children })
    }

    /// Number of nodes in the arena, including detached ones kept for undo.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a document has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Set a property. Setting an equal value is a no-op.
    ///
    /// Returns whether anything changed.
    pub fn set_property(
        &mut self,
        node: NodeId,
        name: &str,
        value: impl Into<Value>,
        undo: Option<&mut UndoLog>,
    ) -> bool {
        let value = value.into();
        let Some(data) = self.nodes.get_mut(node) else {
            return false;
        };
        if data.property(name) == Some(&value) {
            return false;
        }
        let old = data.set_property(name, value.clone());
        if let Some(log) = undo {
            log.record(
                self.id,
                Change::Property { node, name: name.to_owned(), old, new: Some(value) },
            );
        }
        self.listeners.emit(DocumentEvent::PropertyChanged { node, name: name.to_owned() });
        true
    }

    /// Remove a property. Returns whether it existed.
    pub fn remove_property(&mut self, node: NodeId, name: &str, undo: Option<&mut UndoLog>) -> bool {
        let Some(old) = self.nodes.get_mut(node).and_then(|d| d.remove_property(name)) else {
            return false;
        };
        if let Some(log) = undo {
            log.record(
                self.id,
                Change::Property { node, name: name.to_owned(), old: Some(old), new: None },
            );
        }
        self.listeners.emit(DocumentEvent::PropertyChanged { node, name: name.to_owned() });
        true
    }

    /// Append a new node under `parent`.
    pub fn append_child(
        &mut self,
        parent: NodeId,
        data: NodeData,
        undo: Option<&mut UndoLog>,
    ) -> Option<NodeId> {
        self.insert_spec(parent, usize::MAX, &NodeSpec { data, children: Vec::new() }, undo)
    }

    /// Insert a new node under `parent` at `index` (clamped to the child count).
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        data: NodeData,
        undo: Option<&mut UndoLog>,
    ) -> Option<NodeId> {
        self.insert_spec(parent, index, &NodeSpec { data, children: Vec::new() }, undo)
    }

    /// Insert a whole subtree under `parent` at `index` (clamped). Observers see
    /// a single `ChildAdded` for the subtree root.
    pub fn insert_spec(
        &mut self,
        parent: NodeId,
        index: usize,
        spec: &NodeSpec,
        undo: Option<&mut UndoLog>,
    ) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let child = self.build(spec);
        let index = self.attach(parent, index, child);
        if let Some(log) = undo {
            log.record(self.id, Change::Insert { parent, index, child });
        }
        Some(child)
    }

    /// Detach `node` from its parent. Without an undo log the subtree is
    /// freed; with one it is kept for restoration. The root cannot be removed.
    pub fn remove_child(&mut self, node: NodeId, undo: Option<&mut UndoLog>) -> bool {
        let Some((parent, index)) = self.detach(node) else {
            return false;
        };
        match undo {
            Some(log) => log.record(self.id, Change::Remove { parent, index, child: node }),
            None => self.purge(node),
        }
        true
    }

    /// Move the child of `parent` at `from` to position `to`.
    pub fn move_child(
        &mut self,
        parent: NodeId,
        from: usize,
        to: usize,
        undo: Option<&mut UndoLog>,
    ) -> bool {
        if !self.reorder(parent, from, to) {
            return false;
        }
        if let Some(log) = undo {
            log.record(self.id, Change::Move { parent, from, to });
        }
        true
    }

    /// Reparent `node` under `new_parent` at `index`. Refused when
    /// `new_parent` is `node` itself or one of its descendants.
    pub fn move_to(
        &mut self,
        node: NodeId,
        new_parent: NodeId,
        index: usize,
        mut undo: Option<&mut UndoLog>,
    ) -> bool {
        if node == new_parent
            || !self.contains(new_parent)
            || self.is_descendant_of(new_parent, node)
        {
            return false;
        }
        let Some((parent, old_index)) = self.detach(node) else {
            return false;
        };
        let new_index = self.attach(new_parent, index, node);
        if let Some(log) = undo.as_deref_mut() {
            log.record(self.id, Change::Remove { parent, index: old_index, child: node });
            log.record(self.id, Change::Insert { parent: new_parent, index: new_index, child: node });
        }
        true
    }

    /// The first child of `parent` with type `node_type`, appending one if
    /// there is none.
    pub fn get_or_create_child(
        &mut self,
        parent: NodeId,
        node_type: &str,
        undo: Option<&mut UndoLog>,
    ) -> Option<NodeId> {
        match self.child_with_type(parent, node_type) {
            Some(existing) => Some(existing),
            None => self.append_child(parent, NodeData::new(node_type), undo),
        }
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Start recording events for a new observer.
    pub fn subscribe(&mut self) -> ListenerId {
        self.listeners.subscribe()
    }

    /// Stop recording events for `listener`. Returns whether it was known.
    pub fn unsubscribe(&mut self, listener: ListenerId) -> bool {
        self.listeners.unsubscribe(listener)
    }

    /// Take all events recorded for `listener` since its last drain.
    pub fn drain(&mut self, listener: ListenerId) -> Vec<DocumentEvent> {
        self.listeners.drain(listener)
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // -----------------------------------------------------------------------
    // Replay (used by UndoLog)
    // -----------------------------------------------------------------------

    pub(crate) fn apply(&mut self, change: &Change) {
        match change {
            Change::Property { node, name, new, .. } => self.restore_property(*node, name, new.clone()),
            Change::Insert { parent, index, child } => {
                self.attach(*parent, *index, *child);
            }
            Change::Remove { child, .. } => {
                self.detach(*child);
            }
            Change::Move { parent, from, to } => {
                self.reorder(*parent, *from, *to);
            }
        }
    }

    pub(crate) fn revert(&mut self, change: &Change) {
        match change {
            Change::Property { node, name, old, .. } => self.restore_property(*node, name, old.clone()),
            Change::Insert { child, .. } => {
                self.detach(*child);
            }
            Change::Remove { parent, index, child } => {
                self.attach(*parent, *index, *child);
            }
            Change::Move { parent, from, to } => {
                self.reorder(*parent, *to, *from);
            }
        }
    }

    fn restore_property(&mut self, node: NodeId, name: &str, value: Option<Value>) {
        match value {
            Some(value) => {
                self.set_property(node, name, value, None);
            }
            None => {
                self.remove_property(node, name, None);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Create a detached subtree from `spec`, returning its root.
    fn build(&mut self, spec: &NodeSpec) -> NodeId {
        let id = self.nodes.insert(spec.data.clone());
        let mut kids = Vec::with_capacity(spec.children.len());
        for child in &spec.children {
            let child_id = self.build(child);
            self.parent.insert(child_id, id);
            kids.push(child_id);
        }
        self.children.insert(id, kids);
        id
    }

    /// Attach a detached node under `parent`. Returns the actual index used.
    fn attach(&mut self, parent: NodeId, index: usize, child: NodeId) -> usize {
        debug_assert!(self.parent(child).is_none(), "node already has a parent");
        debug_assert!(self.children.contains_key(parent), "parent node does not exist");
        let Some(siblings) = self.children.get_mut(parent) else {
            return 0;
        };
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.parent.insert(child, parent);
        self.listeners.emit(DocumentEvent::ChildAdded { parent, child });
        index
    }

    /// Detach `node` from its parent, keeping the subtree in the arena.
    fn detach(&mut self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent.remove(node)?;
        let siblings = self.children.get_mut(parent)?;
        let index = siblings.iter().position(|&c| c == node)?;
        siblings.remove(index);
        self.listeners.emit(DocumentEvent::ChildRemoved { parent, child: node, index });
        Some((parent, index))
    }

    fn reorder(&mut self, parent: NodeId, from: usize, to: usize) -> bool {
        let Some(siblings) = self.children.get_mut(parent) else {
            return false;
        };
        if from == to || from >= siblings.len() || to >= siblings.len() {
            return false;
        }
        let node = siblings.remove(from);
        siblings.insert(to, node);
        self.listeners.emit(DocumentEvent::ChildOrderChanged {
            parent,
            old_index: from,
            new_index: to,
        });
        true
    }

    /// Free a detached subtree.
    pub(crate) fn purge(&mut self, node: NodeId) {
        for id in self.walk_depth_first(node) {
            self.nodes.remove(id);
            self.children.remove(id);
            self.parent.remove(id);
        }
    }
}

impl PartialEq for Document {
    /// Deep structural equality of the attached trees.
    fn eq(&self, other: &Self) -> bool {
        self.to_spec(self.root) == other.to_spec(other.root)
    }
}
