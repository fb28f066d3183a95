//! Change notification: per-subscriber event queues.
//!
//! A document never calls back into its observers. Every mutation pushes a
//! [`DocumentEvent`] into the queue of each subscriber, and the subscriber
//! drains its queue when it is ready to react. This keeps mutation free of
//! re-entrancy: a consumer that writes to the document while handling events
//! simply produces more events for its next drain.

use slotmap::{new_key_type, SlotMap};

use super::node::NodeId;

new_key_type! {
    /// Handle returned by [`Document::subscribe`](super::Document::subscribe).
    pub struct ListenerId;
}

/// A single document mutation, as seen by observers.
///
/// Node ids may refer to nodes that no longer exist by the time the event is
/// drained (for example a child removed without an undo log). Consumers must
/// check liveness before dereferencing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A property was set, changed or removed.
    PropertyChanged { node: NodeId, name: String },
    /// A child subtree was attached under `parent`.
    ChildAdded { parent: NodeId, child: NodeId },
    /// A child subtree was detached from `parent` at `index`.
    ChildRemoved { parent: NodeId, child: NodeId, index: usize },
    /// A child of `parent` moved from `old_index` to `new_index`.
    ChildOrderChanged { parent: NodeId, old_index: usize, new_index: usize },
}

impl DocumentEvent {
    /// The node whose own state or child list changed.
    pub fn subject(&self) -> NodeId {
        match self {
            DocumentEvent::PropertyChanged { node, .. } => *node,
            DocumentEvent::ChildAdded { parent, .. }
            | DocumentEvent::ChildRemoved { parent, .. }
            | DocumentEvent::ChildOrderChanged { parent, .. } => *parent,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Listeners {
    queues: SlotMap<ListenerId, Vec<DocumentEvent>>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self) -> ListenerId {
        self.queues.insert(Vec::new())
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.queues.remove(id).is_some()
    }

    pub(crate) fn drain(&mut self, id: ListenerId) -> Vec<DocumentEvent> {
        self.queues.get_mut(id).map(std::mem::take).unwrap_or_default()
    }

    pub(crate) fn emit(&mut self, event: DocumentEvent) {
        for queue in self.queues.values_mut() {
            queue.push(event.clone());
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.queues.len()
    }
}
