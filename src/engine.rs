//! The engine: owns the documents, the stylesheet and the widget tree.
//!
//! [`Engine`] ties together the style document, the view document, the
//! property store, the stylesheet, the widget registry and the undo log. After
//! editing a document or the store, call [`Engine::process_events`] to bring
//! the widget tree up to date.

use crate::controller::{self, Action, RebuildController};
use crate::document::{Document, NodeId, UndoLog, Value};
use crate::geometry::{Region, Size};
use crate::layout::LayoutConfig;
use crate::markup::{self, ParseError};
use crate::store::PropertyStore;
use crate::style::names;
use crate::style::{Colour, ResolveCx, Resolved, Stylesheet};
use crate::widget::item::BuildCx;
use crate::widget::{LifecycleTracker, PropertyLookup, Widget, WidgetId, WidgetNode, WidgetRegistry};

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Configuration for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Tab strip height and scrollbar thickness.
    pub layout: LayoutConfig,
    /// Media size before the first [`Engine::set_bounds`].
    pub initial_media: Size,
    /// Register the built-in widgets.
    pub register_defaults: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { layout: LayoutConfig::default(), initial_media: Size::ZERO, register_defaults: true }
    }
}

impl EngineConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default tab strip height (builder).
    pub fn with_tab_height(mut self, height: i32) -> Self {
        self.layout.tab_height = height;
        self
    }

    /// Set the scrollbar thickness (builder).
    pub fn with_scrollbar_thickness(mut self, thickness: i32) -> Self {
        self.layout.scrollbar_thickness = thickness;
        self
    }

    /// Set the initial media size (builder).
    pub fn with_initial_media(mut self, size: Size) -> Self {
        self.initial_media = size;
        self
    }

    /// Choose whether to register the built-in widgets (builder).
    pub fn with_register_defaults(mut self, register: bool) -> Self {
        self.register_defaults = register;
        self
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns everything needed to turn the two documents into a laid-out widget
/// tree and keep it in sync.
pub struct Engine {
    styles: Document,
    view: Document,
    store: PropertyStore,
    sheet: Stylesheet,
    registry: WidgetRegistry,
    undo: UndoLog,
    lifecycle: LifecycleTracker,
    root: Option<WidgetNode>,
    bounds: Region,
    config: EngineConfig,
    controller: RebuildController,
}

impl Engine {
    /// An engine with an empty view and the default style.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_documents(Document::new(names::STYLES), Document::new(names::VIEW), config)
    }

    /// An engine over existing documents. Inserts the default style when the
    /// style document has none.
    pub fn with_documents(mut styles: Document, mut view: Document, config: EngineConfig) -> Self {
        let mut store = PropertyStore::new();
        let mut sheet = Stylesheet::new();
        sheet.select(&mut styles, &store);
        sheet.set_media_size(config.initial_media);

        let controller = RebuildController::attach(&mut view, &mut styles);
        controller.discard(&mut view, &mut styles, &mut store);
        let registry = if config.register_defaults { WidgetRegistry::with_defaults() } else { WidgetRegistry::new() };

        Self {
            styles,
            view,
            store,
            sheet,
            registry,
            undo: UndoLog::new(),
            lifecycle: LifecycleTracker::new(),
            root: None,
            bounds: Region::EMPTY,
            config,
            controller,
        }
    }

    /// An engine over a saved `<magic>` document.
    pub fn from_markup(input: &str, config: EngineConfig) -> Result<Self, ParseError> {
        let (styles, view) = markup::parse_magic(input)?;
        Ok(Self::with_documents(styles, view, config))
    }

    /// Save both documents as one `<magic>` document.
    pub fn to_markup(&self) -> String {
        markup::write_magic(&self.styles, &self.view)
    }

    // -----------------------------------------------------------------------
    // Widget tree
    // -----------------------------------------------------------------------

    /// Register a widget factory for `node_type`. Existing widgets are not
    /// affected until the next [`create_gui`](Self::create_gui).
    pub fn register_factory<F>(&mut self, node_type: &str, factory: F) -> bool
    where
        F: Fn(&PropertyLookup<'_>) -> Box<dyn Widget> + 'static,
    {
        self.registry.register(node_type, factory)
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Build the widget tree from scratch and lay it out in the current
    /// bounds. Pending changes are dropped.
    pub fn create_gui(&mut self) {
        self.clear_gui();
        let Engine { styles, view, store, sheet, registry, lifecycle, root, bounds, config, controller, .. } = self;
        sheet.refresh_activation(store);

        let mut cx = BuildCx {
            resolve: ResolveCx::new(sheet, styles, view),
            store,
            registry,
            config: &config.layout,
            lifecycle,
        };
        let mut item = WidgetNode::create(&mut cx, view.root());
        if let Some(item) = &mut item {
            item.set_bounds(*bounds, &config.layout);
        }
        *root = item;
        controller.discard(view, styles, store);
    }

    /// Drop the widget tree.
    pub fn clear_gui(&mut self) {
        if let Some(root) = self.root.take() {
            root.unmount(&mut self.lifecycle);
        }
    }

    /// Resize the root. When the new size leaves the media validity range the
    /// whole tree is re-resolved first; otherwise only layout runs.
    pub fn set_bounds(&mut self, bounds: Region) {
        self.bounds = bounds;
        let still_valid = self.sheet.set_media_size(bounds.size());
        let Engine { styles, view, store, sheet, registry, lifecycle, root, config, .. } = self;
        let Some(root) = root.as_mut() else {
            return;
        };
        if !still_valid {
            log::trace!("media size {:?} left the validity range, refreshing", bounds.size());
            let mut cx = BuildCx {
                resolve: ResolveCx::new(sheet, styles, view),
                store,
                registry,
                config: &config.layout,
                lifecycle,
            };
            root.update_internal(&mut cx);
        }
        root.set_bounds(bounds, &config.layout);
    }

    /// Apply all pending document and store changes to the widget tree.
    /// Returns the actions taken.
    pub fn process_events(&mut self) -> Vec<Action> {
        let actions = self.controller.collect(
            &mut self.view,
            &mut self.styles,
            &mut self.store,
            &self.sheet,
            self.root.as_ref(),
        );
        for action in &actions {
            self.apply(action);
        }
        self.undo.collect_garbage(&mut [&mut self.styles, &mut self.view]);
        actions
    }

    fn apply(&mut self, action: &Action) {
        let Engine { styles, view, store, sheet, registry, lifecycle, root, bounds, config, .. } = self;
        match action {
            Action::Reselect => {
                sheet.select(styles, store);
                sheet.set_media_size(bounds.size());
                return;
            }
            Action::ReindexClasses => {
                sheet.rebuild_classes(styles, store);
                return;
            }
            Action::RefreshActivation => {
                sheet.refresh_activation(store);
                return;
            }
            _ => {}
        }

        let Some(root) = root.as_mut() else {
            return;
        };
        let layout = &config.layout;
        let mut cx = BuildCx { resolve: ResolveCx::new(sheet, styles, view), store, registry, config: layout, lifecycle };
        match action {
            Action::Rebuild(node) => {
                if !view.is_attached(*node) {
                    return;
                }
                if let Some(item) = root.find_mut(*node) {
                    item.create_sub_components(&mut cx);
                    item.update_layout(layout);
                }
            }
            Action::RefreshAll => {
                root.update_internal(&mut cx);
                root.update_layout(layout);
            }
            Action::RefreshClass(class) => {
                if root.refresh_matching(&mut cx, &|item| item.has_class(class)) > 0 {
                    root.update_layout(layout);
                }
            }
            Action::RefreshColours => root.update_colours(&cx.resolve),
            Action::Refresh(node) => {
                if !view.is_attached(*node) {
                    return;
                }
                // One bubble: the nearest widget above the refreshed one lays
                // it out again, nothing further up.
                let parent = view.parent(*node).and_then(|p| controller::item_at_or_above(view, root, p));
                let Some(item) = root.find_mut(*node) else {
                    return;
                };
                item.update_internal(&mut cx);
                let relayout = parent.unwrap_or(*node);
                if let Some(item) = root.find_mut(relayout) {
                    item.update_layout(layout);
                }
            }
            Action::TabSelection(path) => {
                root.refresh_tab_selection(store, path);
            }
            Action::Visibility(path) => {
                root.refresh_visibility(store, path);
            }
            Action::Reselect | Action::ReindexClasses | Action::RefreshActivation => {}
        }
    }

    /// Leaf widgets with new data below containers that set `repaint-hz`.
    pub fn poll_repaint(&mut self) -> Vec<WidgetId> {
        let mut out = Vec::new();
        if let Some(root) = &mut self.root {
            root.poll_repaint(&mut out);
        }
        out
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The cascaded value of `name` for view node `node`.
    pub fn resolve(&self, node: NodeId, name: &str) -> Option<Value> {
        self.resolve_cx().property(node, name)
    }

    /// Like [`resolve`](Self::resolve), also telling where the value came from.
    pub fn resolve_detailed(&self, node: NodeId, name: &str) -> Option<Resolved> {
        self.resolve_cx().resolve(name, node, true)
    }

    /// Resolve a colour token (`$name`, colour name or hex) against the
    /// current palette.
    pub fn colour(&self, token: &str) -> Colour {
        self.sheet.colour(&self.styles, token)
    }

    pub fn root_item(&self) -> Option<&WidgetNode> {
        self.root.as_ref()
    }

    /// The widget whose view node has the `id` attribute `id`.
    pub fn find_item_with_id(&self, id: &str) -> Option<&WidgetNode> {
        if id.is_empty() {
            return None;
        }
        self.root.as_ref()?.find_by_item_id(id)
    }

    /// The widget created for view node `node`.
    pub fn item_for_node(&self, node: NodeId) -> Option<&WidgetNode> {
        self.root.as_ref()?.find(node)
    }

    /// Mutable access to the leaf widget created for `node`.
    pub fn widget_mut(&mut self, node: NodeId) -> Option<&mut dyn Widget> {
        self.root.as_mut()?.find_mut(node)?.widget_mut()
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Make the style named `name` current. Returns `false` if there is none.
    pub fn select_style(&mut self, name: &str) -> bool {
        let root = self.styles.root();
        if self.styles.child_with_property(root, names::NAME, &Value::from(name)).is_none() {
            log::debug!("no style named {name:?}");
            return false;
        }
        self.styles.set_property(root, names::SELECTED, name, Some(&mut self.undo));
        self.process_events();
        true
    }

    pub fn style_names(&self) -> Vec<String> {
        Stylesheet::style_names(&self.styles)
    }

    /// Show tab `index` of the tabbed container created for `node`. A
    /// container bound to a store path is switched through the store.
    pub fn select_tab(&mut self, node: NodeId, index: usize) -> bool {
        let Some(container) = self.root.as_mut().and_then(|r| r.find_mut(node)).and_then(|i| i.container_mut())
        else {
            return false;
        };
        match container.tab_binding().map(str::to_owned) {
            Some(path) => {
                self.store.set(&path, index as f64);
                self.process_events();
            }
            None => {
                container.select_tab(index);
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // Style editing
    // -----------------------------------------------------------------------

    /// Add a class to the current style (undoable).
    pub fn add_style_class(&mut self, name: &str) -> Option<NodeId> {
        self.sheet.add_style_class(&mut self.styles, name, Some(&mut self.undo))
    }

    /// Delete a class and every reference to it (undoable).
    pub fn delete_style_class(&mut self, name: &str) -> bool {
        self.undo.begin_transaction(format!("delete class {name}"));
        self.sheet.delete_style_class(&mut self.styles, &mut self.view, name, Some(&mut self.undo))
    }

    /// Add or overwrite a palette entry of the current palette (undoable).
    pub fn add_palette_entry(&mut self, name: &str, colour: &str, keep_if_exists: bool) -> bool {
        self.sheet.add_palette_entry(&mut self.styles, name, colour, keep_if_exists, Some(&mut self.undo))
    }

    // -----------------------------------------------------------------------
    // Documents and undo
    // -----------------------------------------------------------------------

    pub fn styles(&self) -> &Document {
        &self.styles
    }

    pub fn view(&self) -> &Document {
        &self.view
    }

    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// Writes become visible on the next [`process_events`](Self::process_events).
    pub fn store_mut(&mut self) -> &mut PropertyStore {
        &mut self.store
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.sheet
    }

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    pub fn lifecycle_mut(&mut self) -> &mut LifecycleTracker {
        &mut self.lifecycle
    }

    pub fn bounds(&self) -> Region {
        self.bounds
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Edit the view document with undo recording.
    pub fn edit_view<R>(&mut self, f: impl FnOnce(&mut Document, &mut UndoLog) -> R) -> R {
        f(&mut self.view, &mut self.undo)
    }

    /// Edit the style document with undo recording.
    pub fn edit_styles<R>(&mut self, f: impl FnOnce(&mut Document, &mut UndoLog) -> R) -> R {
        f(&mut self.styles, &mut self.undo)
    }

    /// Forget the undo history and free the subtrees it kept alive.
    pub fn clear_undo_history(&mut self) {
        self.undo.clear();
        self.undo.collect_garbage(&mut [&mut self.styles, &mut self.view]);
    }

    /// Revert the last transaction on either document and update the tree.
    pub fn undo(&mut self) -> bool {
        let done = self.undo.undo(&mut [&mut self.styles, &mut self.view]);
        if done {
            self.process_events();
        }
        done
    }

    /// Re-apply the last undone transaction and update the tree.
    pub fn redo(&mut self) -> bool {
        let done = self.undo.redo(&mut [&mut self.styles, &mut self.view]);
        if done {
            self.process_events();
        }
        done
    }

    fn resolve_cx(&self) -> ResolveCx<'_> {
        ResolveCx::new(&self.sheet, &self.styles, &self.view)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.clear_gui();
        self.controller.detach(&mut self.view, &mut self.styles);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeSpec;

    fn engine(view: NodeSpec) -> Engine {
        let mut engine =
            Engine::with_documents(Document::new("Styles"), Document::from_spec(&view), EngineConfig::default());
        engine.set_bounds(Region::new(0, 0, 400, 300));
        engine.create_gui();
        engine
    }

    #[test]
    fn config_builder() {
        let config = EngineConfig::new().with_tab_height(24).with_scrollbar_thickness(12).with_register_defaults(false);
        assert_eq!(config.layout, LayoutConfig { tab_height: 24, scrollbar_thickness: 12 });
        assert!(!config.register_defaults);
        assert!(Engine::new(config).registry().types().is_empty());
    }

    #[test]
    fn new_engine_has_default_style() {
        let engine = Engine::default();
        assert_eq!(engine.style_names(), vec!["default".to_owned()]);
        assert!(engine.stylesheet().palette().is_some());
    }

    #[test]
    fn create_gui_builds_and_places_root() {
        let engine = engine(NodeSpec::new("View").with_child(NodeSpec::new("Dummy").with_id("a")));
        let root = engine.root_item().unwrap();
        assert_eq!(root.bounds(), Region::new(0, 0, 400, 300));
        assert!(engine.find_item_with_id("a").is_some());
        assert!(engine.find_item_with_id("").is_none());
    }

    #[test]
    fn pending_edits_are_dropped_by_create_gui() {
        let mut engine = engine(NodeSpec::new("View"));
        let root = engine.view().root();
        engine.edit_view(|view, undo| view.set_property(root, "caption", "x", Some(undo)));
        engine.create_gui();
        assert!(engine.process_events().is_empty());
    }

    #[test]
    fn select_tab_without_binding() {
        let mut engine = engine(
            NodeSpec::new("View")
                .with_property("display", "tabbed")
                .with_child(NodeSpec::new("Dummy"))
                .with_child(NodeSpec::new("Dummy")),
        );
        let root = engine.view().root();
        assert!(engine.select_tab(root, 1));
        let item = engine.item_for_node(root).unwrap();
        assert_eq!(item.container().unwrap().selected_tab(), 1);
        assert!(!item.children()[0].is_visible());
    }

    #[test]
    fn removed_nodes_are_freed_with_history() {
        let mut engine = engine(
            NodeSpec::new("View").with_child(NodeSpec::new("View").with_id("group").with_child(NodeSpec::new("Dummy"))),
        );
        let group = engine.find_item_with_id("group").map(WidgetNode::node).unwrap();
        engine.edit_view(|view, undo| view.remove_child(group, Some(undo)));
        engine.process_events();
        assert!(engine.find_item_with_id("group").is_none());
        assert_eq!(engine.view().len(), 3);

        engine.clear_undo_history();
        assert_eq!(engine.view().len(), 1);
        assert!(!engine.undo());
    }

    #[test]
    fn select_unknown_style() {
        let mut engine = Engine::default();
        assert!(!engine.select_style("dark"));
    }

    #[test]
    fn drop_unsubscribes() {
        let engine = engine(NodeSpec::new("View"));
        drop(engine);
    }
}
