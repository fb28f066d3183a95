//! Rebuild controller: turns document and store changes into widget tree
//! updates.
//!
//! Work happens in two phases. [`RebuildController::collect`] drains the
//! change queues of the view document, the style document and the property
//! store, classifies every change into an [`Action`] and deduplicates them.
//! The engine then applies the plan, checking that every node an action names
//! is still alive. Nothing reacts while a document is being mutated.

use crate::document::{Document, DocumentEvent, ListenerId, NodeId};
use crate::store::PropertyStore;
use crate::style::names;
use crate::style::{StyleScope, Stylesheet};
use crate::widget::WidgetNode;

/// One step of a rebuild plan, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Re-select the current style and palette.
    Reselect,
    /// Rebuild the class index of the current style.
    ReindexClasses,
    /// Re-read class activation flags from the store.
    RefreshActivation,
    /// Recreate the children of the widget for this view node, then relayout it.
    Rebuild(NodeId),
    /// Re-resolve the whole tree and relayout it.
    RefreshAll,
    /// Re-resolve widgets whose `class` names this class.
    RefreshClass(String),
    /// Re-resolve colours only.
    RefreshColours,
    /// Re-resolve the widget for this view node and relayout its parent.
    Refresh(NodeId),
    /// Re-read the selected tab of containers bound to this store path.
    TabSelection(String),
    /// Re-read the visibility of widgets bound to this store path.
    Visibility(String),
}

impl Action {
    fn rank(&self) -> u8 {
        match self {
            Action::Reselect => 0,
            Action::ReindexClasses => 1,
            Action::RefreshActivation => 2,
            Action::Rebuild(_) => 3,
            Action::RefreshAll => 4,
            Action::RefreshClass(_) => 5,
            Action::RefreshColours => 6,
            Action::Refresh(_) => 7,
            Action::TabSelection(_) => 8,
            Action::Visibility(_) => 9,
        }
    }
}

/// A deduplicated set of actions.
#[derive(Debug, Default)]
struct Plan {
    actions: Vec<Action>,
}

impl Plan {
    fn push(&mut self, action: Action) {
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
    }

    /// Order the actions and drop the ones a broader action covers.
    fn finish(mut self) -> Vec<Action> {
        let reselect = self.actions.contains(&Action::Reselect);
        let refresh_all = self.actions.contains(&Action::RefreshAll);
        self.actions.retain(|action| match action {
            Action::ReindexClasses => !reselect,
            Action::RefreshClass(_) | Action::RefreshColours | Action::Refresh(_) => !refresh_all,
            _ => true,
        });
        self.actions.sort_by_key(Action::rank);
        self.actions
    }
}

/// Subscriptions to the two documents the widget tree depends on.
#[derive(Debug)]
pub struct RebuildController {
    view: ListenerId,
    styles: ListenerId,
}

impl RebuildController {
    pub(crate) fn attach(view: &mut Document, styles: &mut Document) -> Self {
        Self { view: view.subscribe(), styles: styles.subscribe() }
    }

    pub(crate) fn detach(&self, view: &mut Document, styles: &mut Document) {
        view.unsubscribe(self.view);
        styles.unsubscribe(self.styles);
    }

    /// Discard pending changes, e.g. after the tree was rebuilt from scratch.
    pub(crate) fn discard(&self, view: &mut Document, styles: &mut Document, store: &mut PropertyStore) {
        view.drain(self.view);
        styles.drain(self.styles);
        store.take_changes();
    }

    /// Drain all pending changes and classify them into a plan.
    pub(crate) fn collect(
        &self,
        view: &mut Document,
        styles: &mut Document,
        store: &mut PropertyStore,
        sheet: &Stylesheet,
        tree: Option<&WidgetNode>,
    ) -> Vec<Action> {
        let view_events = view.drain(self.view);
        let style_events = styles.drain(self.styles);
        let store_paths = store.take_changes();

        let mut plan = Plan::default();
        if let Some(tree) = tree {
            for event in &view_events {
                classify_view(&mut plan, view, tree, event);
            }
        }
        for event in &style_events {
            classify_style(&mut plan, styles, sheet, event);
        }
        for path in store_paths {
            classify_store(&mut plan, sheet, path);
        }
        plan.finish()
    }
}

fn classify_view(plan: &mut Plan, view: &Document, tree: &WidgetNode, event: &DocumentEvent) {
    let subject = event.subject();
    if !view.is_attached(subject) {
        log::trace!("ignoring change on detached view node {subject:?}");
        return;
    }
    let Some(target) = item_at_or_above(view, tree, subject) else {
        return;
    };
    match event {
        DocumentEvent::PropertyChanged { name, .. } => {
            log::trace!("view property {name:?} changed on {subject:?}, refreshing {target:?}");
            plan.push(Action::Refresh(target));
        }
        _ => {
            log::trace!("children of {subject:?} changed, rebuilding {target:?}");
            plan.push(Action::Rebuild(target));
        }
    }
}

fn classify_style(plan: &mut Plan, styles: &Document, sheet: &Stylesheet, event: &DocumentEvent) {
    let subject = event.subject();
    if !styles.is_attached(subject) {
        return;
    }
    if subject == styles.root() {
        log::trace!("style selection may have changed");
        plan.push(Action::Reselect);
        plan.push(Action::RefreshAll);
        return;
    }
    let property = match event {
        DocumentEvent::PropertyChanged { name, .. } => Some(name.as_str()),
        _ => None,
    };
    let colour_only = property.is_some_and(|name| name.contains("color"));

    match sheet.scope_of(styles, subject) {
        None => log::trace!("change outside the current style ignored"),
        Some(StyleScope::Class(class)) => {
            log::trace!("class {class:?} changed");
            plan.push(Action::ReindexClasses);
            plan.push(Action::RefreshClass(class));
        }
        Some(StyleScope::Type(_)) | Some(StyleScope::Id(_)) if colour_only => plan.push(Action::RefreshColours),
        Some(StyleScope::Palette) => plan.push(Action::RefreshColours),
        Some(StyleScope::Type(_)) | Some(StyleScope::Id(_)) => plan.push(Action::RefreshAll),
        Some(StyleScope::Other) => {
            match styles.node_type(subject) {
                Some(names::CLASSES) => plan.push(Action::ReindexClasses),
                Some(names::PALETTES) | Some(names::STYLE) => plan.push(Action::Reselect),
                _ => {}
            }
            plan.push(Action::RefreshAll);
        }
    }
}

fn classify_store(plan: &mut Plan, sheet: &Stylesheet, path: String) {
    if sheet.classes().binds(&path) {
        log::trace!("class activation bound to {path:?} changed");
        plan.push(Action::RefreshActivation);
        plan.push(Action::RefreshAll);
    }
    plan.push(Action::TabSelection(path.clone()));
    plan.push(Action::Visibility(path));
}

/// `node` or its nearest ancestor that has a widget.
pub(crate) fn item_at_or_above(view: &Document, tree: &WidgetNode, node: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(view.ancestors(node))
        .find(|&n| tree.find(n).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use slotmap::KeyData;

    fn node(n: u64) -> NodeId {
        NodeId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn plan_deduplicates_and_orders() {
        let mut plan = Plan::default();
        plan.push(Action::Visibility("a".into()));
        plan.push(Action::Refresh(node(1)));
        plan.push(Action::Refresh(node(1)));
        plan.push(Action::Rebuild(node(2)));
        assert_eq!(
            plan.finish(),
            vec![Action::Rebuild(node(2)), Action::Refresh(node(1)), Action::Visibility("a".into())]
        );
    }

    #[test]
    fn refresh_all_covers_narrower_refreshes() {
        let mut plan = Plan::default();
        plan.push(Action::RefreshClass("knob".into()));
        plan.push(Action::Refresh(node(1)));
        plan.push(Action::RefreshColours);
        plan.push(Action::RefreshAll);
        plan.push(Action::Rebuild(node(3)));
        assert_eq!(plan.finish(), vec![Action::Rebuild(node(3)), Action::RefreshAll]);
    }

    #[test]
    fn reselect_covers_reindex() {
        let mut plan = Plan::default();
        plan.push(Action::ReindexClasses);
        plan.push(Action::Reselect);
        assert_eq!(plan.finish(), vec![Action::Reselect]);
    }
}
