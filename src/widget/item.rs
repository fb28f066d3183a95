//! The widget tree: one [`WidgetNode`] per view node that produced a widget.
//!
//! A node is either a leaf hosting a [`Widget`] or a [`Container`] laying out
//! its children. Each node keeps a snapshot of everything the cascade told it
//! (decoration, flex item settings, placement, visibility binding) so layout
//! can run again without resolving anything.

use std::collections::HashMap;

use crate::document::NodeId;
use crate::geometry::Region;
use crate::layout::{
    self, FlexContainer, FlexItem, LayoutConfig, LayoutMode, Placement, ScrollMode, ScrollState, Tab, TabBar,
};
use crate::store::{normalize_path, PropertyStore};
use crate::style::names;
use crate::style::properties;
use crate::style::ResolveCx;

use super::decorator::{ClientBounds, Decorator};
use super::lifecycle::{LifecycleTracker, WidgetId};
use super::registry::WidgetRegistry;
use super::traits::{PropertyLookup, VersionCursor, Widget};

/// What the tree needs while creating or refreshing widgets.
pub(crate) struct BuildCx<'a> {
    pub resolve: ResolveCx<'a>,
    pub store: &'a PropertyStore,
    pub registry: &'a WidgetRegistry,
    pub config: &'a LayoutConfig,
    pub lifecycle: &'a mut LifecycleTracker,
}

// ---------------------------------------------------------------------------
// WidgetNode
// ---------------------------------------------------------------------------

/// Leaf widget or container.
pub enum Content {
    Leaf(Box<dyn Widget>),
    Container(Container),
}

/// A positioned, decorated element of the widget tree.
pub struct WidgetNode {
    id: WidgetId,
    node: NodeId,
    node_type: String,
    item_id: String,
    classes: Vec<String>,
    decorator: Decorator,
    flex: FlexItem,
    placement: Placement,
    bounds: Region,
    visibility: Option<String>,
    bound_visible: bool,
    tab_hidden: bool,
    content: Content,
}

impl WidgetNode {
    /// Create the widget for `node` and, for a `View`, its whole subtree.
    ///
    /// Returns `None` when the node's type has no registered factory.
    pub(crate) fn create(cx: &mut BuildCx<'_>, node: NodeId) -> Option<WidgetNode> {
        let node_type = cx.resolve.view.node_type(node)?.to_owned();
        let content = if node_type == names::VIEW {
            Content::Container(Container::default())
        } else {
            Content::Leaf(cx.registry.create(&PropertyLookup::new(cx.resolve, node))?)
        };

        let id = WidgetId::next();
        cx.lifecycle.on_mount(id, node);
        let mut item = WidgetNode {
            id,
            node,
            node_type,
            item_id: String::new(),
            classes: Vec::new(),
            decorator: Decorator::default(),
            flex: FlexItem::default(),
            placement: Placement::default(),
            bounds: Region::EMPTY,
            visibility: None,
            bound_visible: true,
            tab_hidden: false,
            content,
        };
        item.configure(cx);
        item.create_sub_components(cx);
        Some(item)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn widget_id(&self) -> WidgetId {
        self.id
    }

    /// The view node this widget was created for.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// The node's own `id` attribute; empty when unset.
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn decorator(&self) -> &Decorator {
        &self.decorator
    }

    pub fn flex_item(&self) -> &FlexItem {
        &self.flex
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Outer bounds, in the coordinates of the root.
    pub fn bounds(&self) -> Region {
        self.bounds
    }

    /// Bounds minus decoration, and the caption strip.
    pub fn client_bounds(&self) -> ClientBounds {
        self.decorator.client_bounds(self.bounds)
    }

    /// Visible unless hidden by its `visibility` binding or by an unselected
    /// tab.
    pub fn is_visible(&self) -> bool {
        self.bound_visible && !self.tab_hidden
    }

    /// The store path controlling visibility.
    pub fn visibility_binding(&self) -> Option<&str> {
        self.visibility.as_deref()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn widget(&self) -> Option<&dyn Widget> {
        match &self.content {
            Content::Leaf(widget) => Some(widget.as_ref()),
            Content::Container(_) => None,
        }
    }

    pub fn widget_mut(&mut self) -> Option<&mut dyn Widget> {
        match &mut self.content {
            Content::Leaf(widget) => Some(widget.as_mut()),
            Content::Container(_) => None,
        }
    }

    pub fn container(&self) -> Option<&Container> {
        match &self.content {
            Content::Container(container) => Some(container),
            Content::Leaf(_) => None,
        }
    }

    pub(crate) fn container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.content {
            Content::Container(container) => Some(container),
            Content::Leaf(_) => None,
        }
    }

    /// Child widgets; empty for a leaf.
    pub fn children(&self) -> &[WidgetNode] {
        self.container().map(|c| c.children.as_slice()).unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// The widget created for view node `node`, searching this subtree.
    pub fn find(&self, node: NodeId) -> Option<&WidgetNode> {
        if self.node == node {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(node))
    }

    pub(crate) fn find_mut(&mut self, node: NodeId) -> Option<&mut WidgetNode> {
        if self.node == node {
            return Some(self);
        }
        match &mut self.content {
            Content::Container(c) => c.children.iter_mut().find_map(|child| child.find_mut(node)),
            Content::Leaf(_) => None,
        }
    }

    /// The first widget in depth-first order whose `id` attribute is `id`.
    pub fn find_by_item_id(&self, id: &str) -> Option<&WidgetNode> {
        if self.item_id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_by_item_id(id))
    }

    pub fn find_widget(&self, id: WidgetId) -> Option<&WidgetNode> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_widget(id))
    }

    /// Visit this node and its descendants depth-first.
    pub fn walk(&self, f: &mut dyn FnMut(&WidgetNode)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    pub(crate) fn walk_mut(&mut self, f: &mut dyn FnMut(&mut WidgetNode)) {
        f(self);
        if let Content::Container(c) = &mut self.content {
            for child in &mut c.children {
                child.walk_mut(f);
            }
        }
    }

    /// Number of widgets in this subtree.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(WidgetNode::count).sum::<usize>()
    }

    // -----------------------------------------------------------------------
    // Refresh
    // -----------------------------------------------------------------------

    /// Re-resolve this widget and its subtree. Bounds are kept; call
    /// [`update_layout`](Self::update_layout) afterwards.
    pub(crate) fn update_internal(&mut self, cx: &mut BuildCx<'_>) {
        self.configure(cx);
        cx.lifecycle.on_update(self.id);
        if let Content::Container(c) = &mut self.content {
            for child in &mut c.children {
                child.update_internal(cx);
            }
            c.refresh_tabs();
        }
    }

    /// Re-resolve the subtrees of the topmost widgets matching `pred`.
    /// Returns how many subtrees were refreshed.
    pub(crate) fn refresh_matching(
        &mut self,
        cx: &mut BuildCx<'_>,
        pred: &dyn Fn(&WidgetNode) -> bool,
    ) -> usize {
        if pred(self) {
            self.update_internal(cx);
            return 1;
        }
        let Content::Container(c) = &mut self.content else {
            return 0;
        };
        let refreshed: usize = c.children.iter_mut().map(|child| child.refresh_matching(cx, pred)).sum();
        if refreshed > 0 {
            c.refresh_tabs();
        }
        refreshed
    }

    /// Re-resolve only colours of this subtree.
    pub(crate) fn update_colours(&mut self, cx: &ResolveCx<'_>) {
        self.decorator.update_colours(cx, self.node);
        match &mut self.content {
            Content::Leaf(widget) => apply_colours(widget.as_mut(), cx, self.node),
            Content::Container(c) => {
                for child in &mut c.children {
                    child.update_colours(cx);
                }
                c.refresh_tabs();
            }
        }
    }

    /// Drop and recreate all children from the view document. No-op for a
    /// leaf.
    pub(crate) fn create_sub_components(&mut self, cx: &mut BuildCx<'_>) {
        let Content::Container(container) = &mut self.content else {
            return;
        };
        for child in container.children.drain(..) {
            child.unmount(cx.lifecycle);
        }
        container.cursors.clear();

        let nodes = cx.resolve.view.children(self.node).to_vec();
        for node in nodes {
            if let Some(child) = WidgetNode::create(cx, node) {
                container.children.push(child);
            }
        }
        container.refresh_tabs();
    }

    /// Re-read the `visibility` binding of every widget bound to `path`.
    /// Returns whether any widget changed.
    pub(crate) fn refresh_visibility(&mut self, store: &PropertyStore, path: &str) -> bool {
        let mut changed = false;
        self.walk_mut(&mut |item| {
            if item.visibility.as_deref() == Some(path) {
                let visible = read_visibility(store, path);
                changed |= visible != item.bound_visible;
                item.bound_visible = visible;
            }
        });
        changed
    }

    /// Re-read the selected tab of every container bound to `path`.
    /// Returns whether any selection changed.
    pub(crate) fn refresh_tab_selection(&mut self, store: &PropertyStore, path: &str) -> bool {
        let mut changed = false;
        self.walk_mut(&mut |item| {
            if let Some(c) = item.container_mut() {
                if c.tab_binding.as_deref() == Some(path) {
                    let before = c.selected_tab();
                    if let Some(index) = read_tab(store, path) {
                        c.select_tab(index);
                    }
                    changed |= before != c.selected_tab();
                }
            }
        });
        changed
    }

    pub(crate) fn unmount(&self, lifecycle: &mut LifecycleTracker) {
        for child in self.children() {
            child.unmount(lifecycle);
        }
        lifecycle.on_unmount(self.id);
    }

    fn configure(&mut self, cx: &mut BuildCx<'_>) {
        let resolve = cx.resolve;
        let node = self.node;
        let data = resolve.view.get(node);
        self.item_id = properties::text(data.and_then(|d| d.property(names::ID)));
        self.classes = data.map(|d| d.class_names()).unwrap_or_default();

        self.decorator.configure(&resolve, node);
        self.flex = FlexItem::from_cascade(&resolve, node);
        self.placement = Placement::from_cascade(&resolve, node);
        self.visibility = binding(&resolve, node, names::VISIBILITY);
        self.bound_visible = match &self.visibility {
            Some(path) => read_visibility(cx.store, path),
            None => true,
        };

        match &mut self.content {
            Content::Leaf(widget) => {
                widget.configure(&PropertyLookup::new(resolve, node));
                apply_colours(widget.as_mut(), &resolve, node);
            }
            Content::Container(c) => c.configure(&resolve, cx.store, cx.config, node),
        }
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Place this widget at `bounds` and lay out its subtree.
    pub(crate) fn set_bounds(&mut self, bounds: Region, config: &LayoutConfig) {
        self.bounds = bounds;
        self.update_layout(config);
    }

    /// Re-apply the layout inside the current bounds.
    pub(crate) fn update_layout(&mut self, config: &LayoutConfig) {
        let client = self.decorator.client_bounds(self.bounds).client;
        match &mut self.content {
            Content::Leaf(widget) => widget.set_bounds(client),
            Content::Container(c) => c.layout(client, config),
        }
    }

    // -----------------------------------------------------------------------
    // Repaint
    // -----------------------------------------------------------------------

    /// Collect leaf widgets whose data moved since the last poll, below
    /// containers with a `repaint-hz` rate.
    pub(crate) fn poll_repaint(&mut self, out: &mut Vec<WidgetId>) {
        let Content::Container(c) = &mut self.content else {
            return;
        };
        for child in &mut c.children {
            if c.repaint_hz > 0.0 {
                if let Some(version) = child.widget().and_then(|w| w.data_version()) {
                    if c.cursors.entry(child.id).or_default().advance(&version) {
                        out.push(child.id);
                    }
                }
            }
            child.poll_repaint(out);
        }
    }
}

fn apply_colours(widget: &mut dyn Widget, cx: &ResolveCx<'_>, node: NodeId) {
    let colour_names: Vec<&'static str> = widget.colour_names().to_vec();
    for name in colour_names {
        widget.set_colour(name, cx.colour(node, name));
    }
}

/// A non-empty store path named by property `name`.
fn binding(cx: &ResolveCx<'_>, node: NodeId, name: &str) -> Option<String> {
    let path = normalize_path(properties::text(cx.property(node, name).as_ref()).trim());
    (!path.is_empty()).then_some(path)
}

/// Unset paths read as visible.
fn read_visibility(store: &PropertyStore, path: &str) -> bool {
    store.get(path).map_or(true, |v| v.as_bool())
}

fn read_tab(store: &PropertyStore, path: &str) -> Option<usize> {
    store.get(path).map(|v| v.as_i64().max(0) as usize)
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// A widget laying out child widgets with one of the layout strategies.
#[derive(Default)]
pub struct Container {
    children: Vec<WidgetNode>,
    mode: LayoutMode,
    flex: FlexContainer,
    scroll_mode: ScrollMode,
    scroll: ScrollState,
    canvas: Region,
    tab_bar: TabBar,
    tab_height: i32,
    tab_binding: Option<String>,
    selected: usize,
    repaint_hz: f64,
    cursors: HashMap<WidgetId, VersionCursor>,
}

impl Container {
    pub fn children(&self) -> &[WidgetNode] {
        &self.children
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn flex(&self) -> &FlexContainer {
        &self.flex
    }

    pub fn scroll_mode(&self) -> ScrollMode {
        self.scroll_mode
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    /// The area children were laid out on. Larger than the client box when a
    /// scrolling container overflows.
    pub fn canvas(&self) -> Region {
        self.canvas
    }

    pub fn tab_bar(&self) -> &TabBar {
        &self.tab_bar
    }

    pub fn tab_height(&self) -> i32 {
        self.tab_height
    }

    /// The store path holding the selected tab index.
    pub fn tab_binding(&self) -> Option<&str> {
        self.tab_binding.as_deref()
    }

    pub fn selected_tab(&self) -> usize {
        self.selected
    }

    /// Repaint rate for children showing live data; zero disables polling.
    pub fn repaint_hz(&self) -> f64 {
        self.repaint_hz
    }

    /// Show child `index` (clamped). Only meaningful in tabbed mode; other
    /// modes remember the index for when they become tabbed.
    pub(crate) fn select_tab(&mut self, index: usize) -> usize {
        self.selected = index;
        self.refresh_tabs();
        self.selected
    }

    fn configure(&mut self, cx: &ResolveCx<'_>, store: &PropertyStore, config: &LayoutConfig, node: NodeId) {
        let get = |name: &str| cx.property(node, name);
        self.mode = LayoutMode::from_display(&properties::text(get(names::DISPLAY).as_ref()));
        self.flex = FlexContainer::from_cascade(cx, node);
        self.scroll_mode = match get(names::SCROLL_MODE) {
            None => ScrollMode::NoScroll,
            Some(value) => ScrollMode::parse(&value.as_text()).unwrap_or_else(|| {
                log::debug!("unknown scroll-mode {value:?}");
                self.scroll_mode
            }),
        };
        self.tab_height = properties::int(get(names::TAB_HEIGHT).as_ref(), config.tab_height).max(0);
        self.tab_binding = binding(cx, node, names::TAB_SELECTED);
        if let Some(index) = self.tab_binding.as_deref().and_then(|path| read_tab(store, path)) {
            self.selected = index;
        }
        self.repaint_hz = properties::number(get(names::REPAINT_HZ).as_ref(), 0.0).max(0.0);
    }

    /// Rebuild the tab strip from the children and apply tab visibility.
    fn refresh_tabs(&mut self) {
        let tabs = self
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| Tab { caption: child.decorator.tab_title(i), colour: child.decorator.tab_colour })
            .collect();
        let bounds = self.tab_bar.bounds();
        self.tab_bar = TabBar::new(tabs);
        self.tab_bar.set_bounds(bounds);
        self.selected = self.tab_bar.select(self.selected);

        let tabbed = self.mode == LayoutMode::Tabbed;
        for (i, child) in self.children.iter_mut().enumerate() {
            child.tab_hidden = tabbed && i != self.selected;
        }
    }

    fn layout(&mut self, client: Region, config: &LayoutConfig) {
        self.tab_bar.set_bounds(Region::EMPTY);
        match self.mode {
            LayoutMode::FlexBox => self.layout_flex(client, config),
            LayoutMode::Tabbed => {
                let (strip, rest) = client.split_top(self.tab_height);
                self.tab_bar.set_bounds(strip);
                self.reset_scroll(rest);
                for child in &mut self.children {
                    child.set_bounds(rest, config);
                }
            }
            LayoutMode::Contents => {
                self.reset_scroll(client);
                for child in &mut self.children {
                    let bounds = child.placement.resolve(client);
                    child.set_bounds(bounds, config);
                }
            }
        }
    }

    fn layout_flex(&mut self, client: Region, config: &LayoutConfig) {
        let items: Vec<FlexItem> = self.children.iter().map(|c| c.flex.clone()).collect();
        let mut regions = layout::flex::layout(&self.flex, &items, client);

        self.reset_scroll(client);
        if self.scroll_mode.scrolls() {
            let mut canvas = regions.iter().fold(client, |acc, r| acc.union(*r));
            let overflow_x = canvas.width > client.width;
            let overflow_y = canvas.height > client.height;
            if overflow_x || overflow_y {
                match self.scroll_mode {
                    ScrollMode::Horizontal if overflow_x => {
                        canvas.height = (canvas.height - config.scrollbar_thickness).max(0);
                    }
                    ScrollMode::Vertical if overflow_y => {
                        canvas.width = (canvas.width - config.scrollbar_thickness).max(0);
                    }
                    _ => {}
                }
                log::trace!("container overflows {client:?}, second pass on {canvas:?}");
                regions = layout::flex::layout(&self.flex, &items, canvas);
                self.canvas = canvas;
                self.scroll.set_sizes(canvas.size(), client.size());
            }
        }

        for (child, region) in self.children.iter_mut().zip(regions) {
            child.set_bounds(region, config);
        }
    }

    fn reset_scroll(&mut self, canvas: Region) {
        self.canvas = canvas;
        self.scroll.set_sizes(canvas.size(), canvas.size());
    }
}

// ===========================================================================
// Tests
// ===========================================================================
