//! Widget trait: the leaf components hosted by the widget tree.
//!
//! The engine never draws. A `Widget` is the seam where a host toolkit plugs
//! its own components in: the tree tells it which properties resolved to what,
//! which rectangle it occupies and which colours apply. [`Dummy`] is the
//! built-in stand-in used by tests and placeholder layouts.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::document::{NodeId, Value};
use crate::geometry::Region;
use crate::style::properties;
use crate::style::{Colour, ResolveCx};

// ---------------------------------------------------------------------------
// PropertyLookup
// ---------------------------------------------------------------------------

/// Read access to the cascaded properties of one view node.
#[derive(Clone, Copy)]
pub struct PropertyLookup<'a> {
    cx: ResolveCx<'a>,
    node: NodeId,
}

impl<'a> PropertyLookup<'a> {
    pub fn new(cx: ResolveCx<'a>, node: NodeId) -> Self {
        Self { cx, node }
    }

    /// The view node being configured.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The type tag of the view node.
    pub fn node_type(&self) -> &'a str {
        self.cx.view.node_type(self.node).unwrap_or_default()
    }

    /// The resolved value of `name`, including inherited values and defaults.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.cx.property(self.node, name)
    }

    /// The resolved value of `name` as text; empty when unset.
    pub fn text(&self, name: &str) -> String {
        properties::text(self.get(name).as_ref())
    }

    pub fn number(&self, name: &str, default: f64) -> f64 {
        properties::number(self.get(name).as_ref(), default)
    }

    /// The resolved value of `name` passed through the active palette.
    pub fn colour(&self, name: &str) -> Colour {
        self.cx.colour(self.node, name)
    }
}

// ---------------------------------------------------------------------------
// DataVersion
// ---------------------------------------------------------------------------

/// A counter a data source bumps whenever it has new data to show.
///
/// Clones share the counter, so a producer on another thread can hold one
/// while the widget exposes another through [`Widget::data_version`].
#[derive(Debug, Clone, Default)]
pub struct DataVersion(Arc<AtomicU64>);

impl DataVersion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal new data.
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::Release);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }
}

/// The last version a consumer has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionCursor {
    seen: u64,
}

impl VersionCursor {
    /// Whether `version` moved since the last call, advancing the cursor.
    pub fn advance(&mut self, version: &DataVersion) -> bool {
        let current = version.get();
        if current == self.seen {
            return false;
        }
        self.seen = current;
        true
    }
}

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// A leaf component placed by the layout engine.
///
/// Object safe; widgets live as `Box<dyn Widget>` inside the tree and are
/// reached again through [`as_any`](Widget::as_any) downcasts.
pub trait Widget {
    /// The type tag this widget was created for (e.g. "Slider").
    fn widget_type(&self) -> &str;

    /// Re-read widget specific properties. Called on creation and on every
    /// refresh of the node.
    fn configure(&mut self, props: &PropertyLookup<'_>) {
        let _ = props;
    }

    /// The rectangle left for the widget after decoration.
    fn set_bounds(&mut self, bounds: Region);

    fn bounds(&self) -> Region;

    /// Colour properties this widget reads. Each is resolved through the
    /// palette and handed to [`set_colour`](Widget::set_colour).
    fn colour_names(&self) -> &[&'static str] {
        &[]
    }

    fn set_colour(&mut self, name: &str, colour: Colour) {
        let _ = (name, colour);
    }

    /// A data counter for throttled repaints, for widgets showing live data.
    fn data_version(&self) -> Option<DataVersion> {
        None
    }

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// Dummy
// ---------------------------------------------------------------------------

/// Placeholder widget: remembers what it was told and draws nothing.
#[derive(Debug, Clone, Default)]
pub struct Dummy {
    node_type: String,
    text: String,
    bounds: Region,
    colour: Colour,
    configured: usize,
    data: DataVersion,
}

impl Dummy {
    pub const TYPE: &'static str = "Dummy";
    pub const TEXT: &'static str = "text";
    pub const COLOUR: &'static str = "dummy-color";

    pub fn new(node_type: impl Into<String>) -> Self {
        Self { node_type: node_type.into(), ..Default::default() }
    }

    /// The `text` property as of the last configure.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    /// How many times the widget was configured.
    pub fn configured(&self) -> usize {
        self.configured
    }

    /// The shared data counter reported to repaint throttling.
    pub fn data(&self) -> &DataVersion {
        &self.data
    }
}

impl Widget for Dummy {
    fn widget_type(&self) -> &str {
        &self.node_type
    }

    fn configure(&mut self, props: &PropertyLookup<'_>) {
        self.text = props.text(Self::TEXT);
        self.configured += 1;
    }

    fn set_bounds(&mut self, bounds: Region) {
        self.bounds = bounds;
    }

    fn bounds(&self) -> Region {
        self.bounds
    }

    fn colour_names(&self) -> &[&'static str] {
        &[Self::COLOUR]
    }

    fn set_colour(&mut self, name: &str, colour: Colour) {
        if name == Self::COLOUR {
            self.colour = colour;
        }
    }

    fn data_version(&self) -> Option<DataVersion> {
        Some(self.data.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
