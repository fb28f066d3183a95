//! Transactional undo/redo across one or more documents.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use super::node::{NodeId, Value};
use super::tree::Document;

// ---------------------------------------------------------------------------
// DocId
// ---------------------------------------------------------------------------

/// Identity of a [`Document`], used to route recorded changes back to the
/// document they were made on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocId(u64);

impl DocId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        DocId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

// ---------------------------------------------------------------------------
// Change
// ---------------------------------------------------------------------------

/// One reversible document mutation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Change {
    Property { node: NodeId, name: String, old: Option<Value>, new: Option<Value> },
    Insert { parent: NodeId, index: usize, child: NodeId },
    Remove { parent: NodeId, index: usize, child: NodeId },
    Move { parent: NodeId, from: usize, to: usize },
}

impl Change {
    fn nodes(&self) -> [Option<NodeId>; 2] {
        match self {
            Change::Property { node, .. } => [Some(*node), None],
            Change::Insert { parent, child, .. } | Change::Remove { parent, child, .. } => {
                [Some(*parent), Some(*child)]
            }
            Change::Move { parent, .. } => [Some(*parent), None],
        }
    }
}

#[derive(Debug, Clone)]
struct Transaction {
    name: String,
    changes: Vec<(DocId, Change)>,
}

// ---------------------------------------------------------------------------
// DocumentSet
// ---------------------------------------------------------------------------

/// The documents an [`UndoLog`] may replay changes into.
pub trait DocumentSet {
    /// The document with the given id, if it is part of this set.
    fn document_mut(&mut self, id: DocId) -> Option<&mut Document>;
}

impl DocumentSet for Document {
    fn document_mut(&mut self, id: DocId) -> Option<&mut Document> {
        (self.id() == id).then_some(self)
    }
}

impl<'a> DocumentSet for [&'a mut Document] {
    fn document_mut(&mut self, id: DocId) -> Option<&mut Document> {
        self.iter_mut().find(|d| d.id() == id).map(|d| &mut **d)
    }
}

impl<'a, const N: usize> DocumentSet for [&'a mut Document; N] {
    fn document_mut(&mut self, id: DocId) -> Option<&mut Document> {
        self.as_mut_slice().document_mut(id)
    }
}

// ---------------------------------------------------------------------------
// UndoLog
// ---------------------------------------------------------------------------

/// Records document mutations grouped into named transactions.
///
/// Every mutating [`Document`] method takes an `Option<&mut UndoLog>`. With a
/// log the change is recorded into the open transaction (one is opened on
/// demand); without one the change simply is not undoable.
///
/// Subtrees removed while a log is attached stay alive, detached, inside their
/// document so that undo can re-attach them with the same node ids. Once the
/// transactions mentioning such a subtree leave the history, the subtree is
/// freed by the next [`collect_garbage`](Self::collect_garbage).
#[derive(Debug)]
pub struct UndoLog {
    undo: Vec<Transaction>,
    redo: Vec<Transaction>,
    open: Option<Transaction>,
    limit: usize,
    /// Inserted or removed subtree roots of transactions that left history.
    dropped: Vec<(DocId, NodeId)>,
}

impl UndoLog {
    /// Create an empty log keeping at most 100 transactions.
    pub fn new() -> Self {
        Self { undo: Vec::new(), redo: Vec::new(), open: None, limit: 100, dropped: Vec::new() }
    }

    /// Keep at most `limit` transactions (builder).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Close the current transaction and open a new one named `name`.
    pub fn begin_transaction(&mut self, name: impl Into<String>) {
        self.close_open();
        self.open = Some(Transaction { name: name.into(), changes: Vec::new() });
    }

    pub(crate) fn record(&mut self, doc: DocId, change: Change) {
        let redo = std::mem::take(&mut self.redo);
        self.drop_transactions(redo);
        self.open
            .get_or_insert_with(|| Transaction { name: String::new(), changes: Vec::new() })
            .changes
            .push((doc, change));
    }

    /// Whether there is anything to undo.
    pub fn can_undo(&self) -> bool {
        self.open.as_ref().is_some_and(|t| !t.changes.is_empty()) || !self.undo.is_empty()
    }

    /// Whether there is anything to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Name of the transaction the next `undo` would revert.
    pub fn undo_description(&self) -> Option<&str> {
        match &self.open {
            Some(t) if !t.changes.is_empty() => Some(t.name.as_str()),
            _ => self.undo.last().map(|t| t.name.as_str()),
        }
    }

    /// Revert the most recent transaction. Returns `false` if there was none.
    pub fn undo<D: DocumentSet + ?Sized>(&mut self, docs: &mut D) -> bool {
        self.close_open();
        let Some(transaction) = self.undo.pop() else {
            return false;
        };
        for (doc, change) in transaction.changes.iter().rev() {
            match docs.document_mut(*doc) {
                Some(document) => document.revert(change),
                None => log::debug!("undo: document {doc:?} not in the supplied set"),
            }
        }
        self.redo.push(transaction);
        true
    }

    /// Re-apply the most recently undone transaction.
    pub fn redo<D: DocumentSet + ?Sized>(&mut self, docs: &mut D) -> bool {
        let Some(transaction) = self.redo.pop() else {
            return false;
        };
        for (doc, change) in &transaction.changes {
            match docs.document_mut(*doc) {
                Some(document) => document.apply(change),
                None => log::debug!("redo: document {doc:?} not in the supplied set"),
            }
        }
        self.undo.push(transaction);
        true
    }

    /// Forget all history. Detached subtrees it kept alive are freed by the
    /// next [`collect_garbage`](Self::collect_garbage).
    pub fn clear(&mut self) {
        let undo = std::mem::take(&mut self.undo);
        let redo = std::mem::take(&mut self.redo);
        let open = self.open.take();
        self.drop_transactions(undo.into_iter().chain(redo).chain(open));
    }

    /// Free the detached subtrees that only dropped transactions referred
    /// to. Returns the number of nodes removed.
    pub fn collect_garbage<D: DocumentSet + ?Sized>(&mut self, docs: &mut D) -> usize {
        if self.dropped.is_empty() {
            return 0;
        }
        let referenced: HashSet<(DocId, NodeId)> = self
            .undo
            .iter()
            .chain(&self.redo)
            .chain(&self.open)
            .flat_map(|t| &t.changes)
            .flat_map(|(doc, change)| change.nodes().into_iter().flatten().map(move |n| (*doc, n)))
            .collect();

        let mut freed = 0;
        for (doc, node) in std::mem::take(&mut self.dropped) {
            let Some(document) = docs.document_mut(doc) else {
                log::debug!("collect: document {doc:?} not in the supplied set");
                continue;
            };
            if !document.contains(node) || document.is_attached(node) {
                continue;
            }
            let subtree = document.walk_depth_first(node);
            if subtree.iter().any(|n| referenced.contains(&(doc, *n))) {
                continue;
            }
            freed += subtree.len();
            document.purge(node);
        }
        if freed > 0 {
            log::trace!("freed {freed} detached nodes");
        }
        freed
    }

    fn close_open(&mut self) {
        if let Some(transaction) = self.open.take() {
            if !transaction.changes.is_empty() {
                self.undo.push(transaction);
                if self.undo.len() > self.limit {
                    let oldest = self.undo.remove(0);
                    self.drop_transactions([oldest]);
                }
            }
        }
    }

    fn drop_transactions(&mut self, transactions: impl IntoIterator<Item = Transaction>) {
        for transaction in transactions {
            for (doc, change) in transaction.changes {
                if let Change::Insert { child, .. } | Change::Remove { child, .. } = change {
                    self.dropped.push((doc, child));
                }
            }
        }
    }
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeData;

    #[test]
    fn undo_property_change() {
        let mut doc = Document::new("View");
        let root = doc.root();
        let mut log = UndoLog::new();
        doc.set_property(root, "caption", "a", Some(&mut log));
        log.begin_transaction("second");
        doc.set_property(root, "caption", "b", Some(&mut log));

        assert_eq!(log.undo_description(), Some("second"));
        assert!(log.undo(&mut doc));
        assert_eq!(doc.property(root, "caption"), Some(&Value::from("a")));
        assert!(log.undo(&mut doc));
        assert_eq!(doc.property(root, "caption"), None);
        assert!(!log.undo(&mut doc));

        assert!(log.redo(&mut doc));
        assert_eq!(doc.property(root, "caption"), Some(&Value::from("a")));
    }

    #[test]
    fn undo_remove_restores_same_node() {
        let mut doc = Document::new("View");
        let root = doc.root();
        let a = doc.append_child(root, NodeData::new("A"), None).unwrap();
        let b = doc.append_child(root, NodeData::new("B"), None).unwrap();
        let mut log = UndoLog::new();

        assert!(doc.remove_child(a, Some(&mut log)));
        assert_eq!(doc.children(root), &[b]);
        assert!(log.undo(&mut doc));
        assert_eq!(doc.children(root), &[a, b]);
        assert!(log.redo(&mut doc));
        assert_eq!(doc.children(root), &[b]);
    }

    #[test]
    fn undo_spans_two_documents() {
        let mut view = Document::new("View");
        let mut styles = Document::new("Styles");
        let (vr, sr) = (view.root(), styles.root());
        let mut log = UndoLog::new();
        log.begin_transaction("edit both");
        view.set_property(vr, "x", 1, Some(&mut log));
        styles.set_property(sr, "selected", "dark", Some(&mut log));

        assert!(log.undo(&mut [&mut view, &mut styles]));
        assert_eq!(view.property(vr, "x"), None);
        assert_eq!(styles.property(sr, "selected"), None);
    }

    #[test]
    fn new_change_clears_redo() {
        let mut doc = Document::new("View");
        let root = doc.root();
        let mut log = UndoLog::new();
        doc.set_property(root, "x", 1, Some(&mut log));
        log.undo(&mut doc);
        assert!(log.can_redo());
        doc.set_property(root, "x", 2, Some(&mut log));
        assert!(!log.can_redo());
    }

    #[test]
    fn trimmed_history_frees_removed_subtrees() {
        let mut doc = Document::new("View");
        let root = doc.root();
        let mut log = UndoLog::new().with_limit(1);
        for i in 0..50 {
            log.begin_transaction(format!("t{i}"));
            let child = doc.append_child(root, NodeData::new("Slider"), Some(&mut log)).unwrap();
            doc.append_child(child, NodeData::new("Label"), Some(&mut log));
            doc.remove_child(child, Some(&mut log));
        }
        // The two transactions still in history keep their subtrees.
        assert_eq!(log.collect_garbage(&mut doc), 96);
        assert_eq!(doc.len(), 5);
        assert!(log.undo(&mut doc));
        assert!(doc.children(root).is_empty());

        log.clear();
        assert_eq!(log.collect_garbage(&mut doc), 4);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn cleared_redo_frees_undone_inserts() {
        let mut doc = Document::new("View");
        let root = doc.root();
        let mut log = UndoLog::new();
        doc.append_child(root, NodeData::new("Slider"), Some(&mut log));
        log.undo(&mut doc);
        assert_eq!(doc.len(), 2);

        log.begin_transaction("other");
        doc.set_property(root, "x", 1, Some(&mut log));
        log.collect_garbage(&mut doc);
        assert_eq!(doc.len(), 1);
        assert!(!log.redo(&mut doc));
    }

    #[test]
    fn limit_drops_oldest() {
        let mut doc = Document::new("View");
        let root = doc.root();
        let mut log = UndoLog::new().with_limit(2);
        for i in 0..4 {
            log.begin_transaction(format!("t{i}"));
            doc.set_property(root, "x", i, Some(&mut log));
        }
        assert!(log.undo(&mut doc));
        assert!(log.undo(&mut doc));
        assert!(!log.undo(&mut doc));
        assert_eq!(doc.property(root, "x"), Some(&Value::from(1)));
    }
}
