//! Factories turning a view node type tag into a widget.

use std::collections::HashMap;
use std::fmt;

use crate::style::names;

use super::traits::{Dummy, PropertyLookup, Widget};

/// Builds a widget for one view node.
pub type WidgetFactory = Box<dyn Fn(&PropertyLookup<'_>) -> Box<dyn Widget>>;

/// Map from type tag to factory.
///
/// `View` is reserved: view nodes always become containers and never reach
/// the registry.
#[derive(Default)]
pub struct WidgetRegistry {
    factories: HashMap<String, WidgetFactory>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in widgets.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Dummy::TYPE, |props| Box::new(Dummy::new(props.node_type())));
        registry
    }

    /// Register `factory` for `node_type`. Returns `false` and keeps the
    /// existing factory when the tag is already taken or reserved.
    pub fn register<F>(&mut self, node_type: &str, factory: F) -> bool
    where
        F: Fn(&PropertyLookup<'_>) -> Box<dyn Widget> + 'static,
    {
        if node_type == names::VIEW {
            log::debug!("cannot register a factory for the reserved type {node_type}");
            return false;
        }
        if self.factories.contains_key(node_type) {
            log::debug!("factory for {node_type} already registered, ignoring");
            return false;
        }
        self.factories.insert(node_type.to_owned(), Box::new(factory));
        true
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.factories.contains_key(node_type)
    }

    /// Create the widget for the node behind `props`, or `None` when its type
    /// has no factory.
    pub fn create(&self, props: &PropertyLookup<'_>) -> Option<Box<dyn Widget>> {
        let node_type = props.node_type();
        match self.factories.get(node_type) {
            Some(factory) => Some(factory(props)),
            None => {
                log::debug!("no factory for widget type {node_type:?}, skipping node");
                None
            }
        }
    }

    /// Registered type tags, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry").field("types", &self.types()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, NodeSpec};
    use crate::store::PropertyStore;
    use crate::style::{ResolveCx, Stylesheet};

    struct Fixture {
        styles: Document,
        view: Document,
        sheet: Stylesheet,
    }

    impl Fixture {
        fn new(tag: &str) -> Self {
            let mut styles = Document::new("Styles");
            let mut sheet = Stylesheet::new();
            sheet.select(&mut styles, &PropertyStore::new());
            let view = Document::from_spec(&NodeSpec::new("View").with_child(NodeSpec::new(tag)));
            Self { styles, view, sheet }
        }

        fn lookup(&self) -> PropertyLookup<'_> {
            let node = self.view.children(self.view.root())[0];
            PropertyLookup::new(ResolveCx::new(&self.sheet, &self.styles, &self.view), node)
        }
    }

    #[test]
    fn creates_registered_types() {
        let f = Fixture::new("Dummy");
        let widget = WidgetRegistry::with_defaults().create(&f.lookup()).unwrap();
        assert_eq!(widget.widget_type(), "Dummy");
    }

    #[test]
    fn unregistered_type_yields_none() {
        let f = Fixture::new("Oscilloscope");
        assert!(WidgetRegistry::with_defaults().create(&f.lookup()).is_none());
    }

    #[test]
    fn duplicate_registration_keeps_first() {
        let mut registry = WidgetRegistry::with_defaults();
        assert!(!registry.register("Dummy", |_| Box::new(Dummy::new("Other"))));
        let f = Fixture::new("Dummy");
        assert_eq!(registry.create(&f.lookup()).unwrap().widget_type(), "Dummy");
    }

    #[test]
    fn view_is_reserved() {
        let mut registry = WidgetRegistry::new();
        assert!(!registry.register("View", |_| Box::new(Dummy::new("View"))));
        assert!(registry.types().is_empty());
    }

    #[test]
    fn one_factory_serves_many_tags() {
        let mut registry = WidgetRegistry::new();
        for tag in ["Slider", "Knob"] {
            registry.register(tag, |props| Box::new(Dummy::new(props.node_type())));
        }
        assert_eq!(registry.types(), vec!["Knob", "Slider"]);
        let f = Fixture::new("Knob");
        assert_eq!(registry.create(&f.lookup()).unwrap().widget_type(), "Knob");
    }
}
