//! Widget lifecycle: mount, unmount, update cycle.
//!
//! Every [`WidgetNode`](super::WidgetNode) gets a fresh [`WidgetId`] when it
//! is created. The `LifecycleTracker` records which ids are currently mounted
//! and accumulates lifecycle events (`Mount`, `Unmount`, `Update`) that a host
//! drains to create, destroy or refresh its own components.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::document::NodeId;

// ---------------------------------------------------------------------------
// WidgetId
// ---------------------------------------------------------------------------

/// Identity of one widget instance. Never reused, so a structural rebuild is
/// observable as a change of id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        WidgetId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// Events that occur during the widget lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A widget was created for a view node.
    Mount { widget_id: WidgetId, node: NodeId },
    /// A widget was dropped from the tree.
    Unmount { widget_id: WidgetId },
    /// A widget re-resolved its properties.
    Update { widget_id: WidgetId },
}

// ---------------------------------------------------------------------------
// LifecycleTracker
// ---------------------------------------------------------------------------

/// Tracks which widgets are currently mounted and accumulates lifecycle events.
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    mounted: HashSet<WidgetId>,
    pending: Vec<LifecycleEvent>,
}

impl LifecycleTracker {
    /// Create a new, empty lifecycle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a widget has been mounted for `node`.
    ///
    /// If the widget was already mounted, this is a no-op (no duplicate event).
    pub fn on_mount(&mut self, id: WidgetId, node: NodeId) {
        if self.mounted.insert(id) {
            self.pending.push(LifecycleEvent::Mount { widget_id: id, node });
        }
    }

    /// Record that a widget has been unmounted.
    ///
    /// If the widget was not mounted, this is a no-op (no spurious event).
    pub fn on_unmount(&mut self, id: WidgetId) {
        if self.mounted.remove(&id) {
            self.pending.push(LifecycleEvent::Unmount { widget_id: id });
        }
    }

    /// Record that a mounted widget re-resolved its properties.
    ///
    /// If the widget is not currently mounted, this is a no-op.
    pub fn on_update(&mut self, id: WidgetId) {
        if self.mounted.contains(&id) {
            self.pending.push(LifecycleEvent::Update { widget_id: id });
        }
    }

    pub fn is_mounted(&self, id: WidgetId) -> bool {
        self.mounted.contains(&id)
    }

    /// The number of currently mounted widgets.
    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    /// Drain and return all pending lifecycle events.
    pub fn pending_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Clear all state (mounted widgets and pending events).
    pub fn clear(&mut self) {
        self.mounted.clear();
        self.pending.clear();
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn node(n: u64) -> NodeId {
        NodeId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn ids_are_unique() {
        let a = WidgetId::next();
        let b = WidgetId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn double_mount_is_noop() {
        let id = WidgetId::next();
        let mut tracker = LifecycleTracker::new();

        tracker.on_mount(id, node(1));
        tracker.on_mount(id, node(1));
        assert_eq!(tracker.mounted_count(), 1);
        assert_eq!(tracker.pending_events().len(), 1);
    }

    #[test]
    fn unmount_not_mounted_is_noop() {
        let mut tracker = LifecycleTracker::new();
        tracker.on_unmount(WidgetId::next());
        assert!(!tracker.has_pending());
    }

    #[test]
    fn update_unmounted_is_noop() {
        let mut tracker = LifecycleTracker::new();
        tracker.on_update(WidgetId::next());
        assert!(!tracker.has_pending());
    }

    #[test]
    fn full_lifecycle_sequence() {
        let id = WidgetId::next();
        let mut tracker = LifecycleTracker::new();

        tracker.on_mount(id, node(7));
        tracker.on_update(id);
        tracker.on_unmount(id);

        let events = tracker.pending_events();
        assert_eq!(
            events,
            vec![
                LifecycleEvent::Mount { widget_id: id, node: node(7) },
                LifecycleEvent::Update { widget_id: id },
                LifecycleEvent::Unmount { widget_id: id },
            ]
        );
        assert!(!tracker.is_mounted(id));
        assert!(tracker.pending_events().is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let id = WidgetId::next();
        let mut tracker = LifecycleTracker::new();

        tracker.on_mount(id, node(1));
        tracker.clear();
        assert!(!tracker.is_mounted(id));
        assert!(!tracker.has_pending());
    }
}
