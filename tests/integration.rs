//! Integration tests for magic-layout.
//!
//! These tests exercise the public API from outside the crate: loading
//! documents, building the widget tree, and keeping it in sync with edits to
//! the documents, the property store and the available size.

use magic_layout::controller::Action;
use magic_layout::document::{Document, NodeData, NodeId, NodeSpec, Value};
use magic_layout::geometry::Region;
use magic_layout::style::Source;
use magic_layout::widget::{Dummy, LifecycleEvent, WidgetNode};
use magic_layout::{Engine, EngineConfig};
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A style document with one id entry, a few classes and a type entry.
fn styles() -> NodeSpec {
    NodeSpec::new("Styles").with_child(
        NodeSpec::new("Style")
            .with_property("name", "default")
            .with_child(NodeSpec::new("Nodes").with_child(NodeSpec::new("gain").with_property("caption", "from id")))
            .with_child(
                NodeSpec::new("Classes")
                    .with_child(NodeSpec::new("knob").with_property("caption", "from class"))
                    .with_child(
                        NodeSpec::new("dark")
                            .with_property("recursive", true)
                            .with_property("caption-color", "black"),
                    )
                    .with_child(NodeSpec::new("local-only").with_property("tab-caption", "nope"))
                    .with_child(
                        NodeSpec::new("wide")
                            .with_property("text", "wide")
                            .with_child(NodeSpec::new("media").with_property("min-width", 500)),
                    )
                    .with_child(
                        NodeSpec::new("hot")
                            .with_property("active", "ui:hot")
                            .with_property("text", "hot"),
                    ),
            )
            .with_child(
                NodeSpec::new("Types").with_child(
                    NodeSpec::new("Dummy")
                        .with_property("caption", "from type")
                        .with_property("text", "from type"),
                ),
            )
            .with_child(NodeSpec::new("Palettes").with_child(NodeSpec::new("default").with_property("accent", "ff336699"))),
    )
}

fn engine(view: NodeSpec) -> Engine {
    let mut engine = Engine::with_documents(Document::from_spec(&styles()), Document::from_spec(&view), EngineConfig::default());
    engine.set_bounds(Region::new(0, 0, 400, 300));
    engine.create_gui();
    engine
}

/// The view node with `id`.
fn node(engine: &Engine, id: &str) -> NodeId {
    engine.find_item_with_id(id).map(WidgetNode::node).expect("no item with that id")
}

fn dummy<'a>(engine: &'a Engine, id: &str) -> &'a Dummy {
    engine
        .find_item_with_id(id)
        .and_then(WidgetNode::widget)
        .and_then(|w| w.as_any().downcast_ref::<Dummy>())
        .expect("not a Dummy")
}

fn text(engine: &Engine, node: NodeId, name: &str) -> Option<String> {
    engine.resolve(node, name).map(|v| v.as_text().into_owned())
}

// ---------------------------------------------------------------------------
// Cascade
// ---------------------------------------------------------------------------

#[test]
fn test_cascade_order() {
    let engine = engine(
        NodeSpec::new("View")
            .with_child(NodeSpec::new("Dummy").with_id("plain"))
            .with_child(NodeSpec::new("Dummy").with_id("classed").with_class("knob"))
            .with_child(NodeSpec::new("Dummy").with_id("missed").with_class("wide knob"))
            .with_child(NodeSpec::new("Dummy").with_id("gain").with_class("knob"))
            .with_child(NodeSpec::new("Dummy").with_id("local").with_class("knob").with_property("caption", "mine")),
    );

    assert_eq!(text(&engine, node(&engine, "plain"), "caption").as_deref(), Some("from type"));
    assert_eq!(text(&engine, node(&engine, "classed"), "caption").as_deref(), Some("from class"));
    assert_eq!(text(&engine, node(&engine, "gain"), "caption").as_deref(), Some("from id"));
    assert_eq!(text(&engine, node(&engine, "local"), "caption").as_deref(), Some("mine"));

    // "wide" is out of its media range, so the Dummy type entry answers
    // before "knob" gets a chance.
    let missed = node(&engine, "missed");
    let detailed = engine.resolve_detailed(missed, "caption").unwrap();
    assert!(matches!(detailed.source, Source::Type(_)));
    assert_eq!(detailed.value, Value::from("from type"));

    let local = node(&engine, "local");
    let detailed = engine.resolve_detailed(local, "caption").unwrap();
    assert_eq!(detailed.source, Source::Local(local));
    assert!(!detailed.is_inherited(local));
}

#[test]
fn test_recursive_classes_are_inherited() {
    let engine = engine(
        NodeSpec::new("View").with_class("dark local-only").with_child(NodeSpec::new("Dummy").with_id("child")),
    );
    let child = node(&engine, "child");

    let inherited = engine.resolve_detailed(child, "caption-color").unwrap();
    assert!(matches!(inherited.source, Source::Class(_)));
    assert!(inherited.is_inherited(child));
    assert_eq!(inherited.value, Value::from("black"));

    // Non-recursive classes only apply to the node itself.
    assert_eq!(engine.resolve(child, "tab-caption"), None);
    let root = engine.view().root();
    assert_eq!(text(&engine, root, "tab-caption").as_deref(), Some("nope"));
}

#[test]
fn test_defaults_and_palette() {
    let engine = engine(NodeSpec::new("View").with_child(NodeSpec::new("Dummy").with_id("a")));
    let a = node(&engine, "a");
    let grow = engine.resolve_detailed(a, "flex-grow").unwrap();
    assert_eq!(grow.source, Source::Default);
    assert_eq!(grow.value, Value::Number(1.0));
    assert_eq!(engine.resolve(a, "no-such-property"), None);

    assert_eq!(engine.colour("$accent").to_string(), "ff336699");
    assert_eq!(engine.colour("$missing").to_string(), "ff000000");
}

// ---------------------------------------------------------------------------
// Widget tree and layout
// ---------------------------------------------------------------------------

#[test]
fn test_widgets_are_configured_from_the_cascade() {
    let engine = engine(
        NodeSpec::new("View")
            .with_child(NodeSpec::new("Dummy").with_id("a"))
            .with_child(NodeSpec::new("Dummy").with_id("b").with_property("text", "local")),
    );
    assert_eq!(dummy(&engine, "a").text(), "from type");
    assert_eq!(dummy(&engine, "b").text(), "local");
    assert_eq!(engine.root_item().unwrap().count(), 3);
}

#[test]
fn test_unknown_types_are_skipped() {
    let engine = engine(
        NodeSpec::new("View")
            .with_child(NodeSpec::new("Knob").with_id("k"))
            .with_child(NodeSpec::new("Dummy").with_id("d")),
    );
    assert!(engine.find_item_with_id("k").is_none());
    assert_eq!(engine.root_item().unwrap().children().len(), 1);
}

#[test]
fn test_custom_factory() {
    let mut engine = engine(NodeSpec::new("View").with_child(NodeSpec::new("Knob").with_id("k")));
    assert!(engine.register_factory("Knob", |props| Box::new(Dummy::new(props.node_type()))));
    assert!(!engine.register_factory("Knob", |props| Box::new(Dummy::new(props.node_type()))));
    engine.create_gui();
    let item = engine.find_item_with_id("k").unwrap();
    assert_eq!(item.widget().unwrap().widget_type(), "Knob");
}

#[test]
fn test_flex_row_splits_width() {
    let engine = engine(
        NodeSpec::new("View")
            .with_child(NodeSpec::new("Dummy").with_id("a").with_property("flex-grow", 1))
            .with_child(NodeSpec::new("Dummy").with_id("b").with_property("flex-grow", 3)),
    );
    let a = engine.find_item_with_id("a").unwrap().bounds();
    let b = engine.find_item_with_id("b").unwrap().bounds();
    assert_eq!(a.y, b.y);
    assert_eq!(a.right(), b.x);
    assert!(b.width > 2 * a.width, "{a:?} {b:?}");
}

#[test]
fn test_tabbed_container_follows_store() {
    let mut engine = engine(
        NodeSpec::new("View")
            .with_property("display", "tabbed")
            .with_property("tab-selected", "ui:tab")
            .with_child(NodeSpec::new("Dummy").with_id("one"))
            .with_child(NodeSpec::new("Dummy").with_id("two"))
            .with_child(NodeSpec::new("Dummy").with_id("three")),
    );
    let visible = |engine: &Engine| -> Vec<bool> {
        engine.root_item().unwrap().children().iter().map(WidgetNode::is_visible).collect()
    };
    let highlighted = |engine: &Engine| engine.root_item().unwrap().container().unwrap().tab_bar().selected();
    assert_eq!(visible(&engine), vec![true, false, false]);
    assert_eq!(highlighted(&engine), 0);

    engine.store_mut().set("ui:tab", 1);
    let actions = engine.process_events();
    assert!(actions.contains(&Action::TabSelection("ui:tab".into())));
    assert_eq!(visible(&engine), vec![false, true, false]);
    assert_eq!(highlighted(&engine), 1);

    // Selecting through the engine writes the bound store value.
    let root = engine.view().root();
    assert!(engine.select_tab(root, 2));
    assert_eq!(engine.store().get_f64("ui:tab"), 2.0);
    assert_eq!(visible(&engine), vec![false, false, true]);
    assert_eq!(highlighted(&engine), 2);

    // All pages share the area below the tab strip.
    let pages: Vec<Region> = engine.root_item().unwrap().children().iter().map(WidgetNode::bounds).collect();
    assert!(pages.windows(2).all(|w| w[0] == w[1]));
    let tab_bar = engine.root_item().unwrap().container().unwrap().tab_bar();
    assert_eq!(tab_bar.len(), 3);
}

#[test]
fn test_visibility_binding() {
    let mut engine = engine(
        NodeSpec::new("View")
            .with_child(NodeSpec::new("Dummy").with_id("a").with_property("visibility", "ui:show"))
            .with_child(NodeSpec::new("Dummy").with_id("b")),
    );
    // Unset bindings read as visible.
    assert!(engine.find_item_with_id("a").unwrap().is_visible());

    engine.store_mut().set("ui:show", false);
    engine.process_events();
    assert!(!engine.find_item_with_id("a").unwrap().is_visible());
    assert!(engine.find_item_with_id("b").unwrap().is_visible());

    engine.store_mut().set("ui:show", true);
    engine.process_events();
    assert!(engine.find_item_with_id("a").unwrap().is_visible());
}

// ---------------------------------------------------------------------------
// Media and activation
// ---------------------------------------------------------------------------

#[test]
fn test_resize_inside_media_range_only_relayouts() {
    let mut engine = engine(NodeSpec::new("View").with_child(NodeSpec::new("Dummy").with_id("a").with_class("wide")));
    assert_eq!(dummy(&engine, "a").text(), "from type");
    engine.lifecycle_mut().clear();

    engine.set_bounds(Region::new(0, 0, 450, 300));
    assert!(!engine.lifecycle_mut().has_pending());
    assert_eq!(engine.root_item().unwrap().bounds().width, 450);

    engine.set_bounds(Region::new(0, 0, 600, 300));
    let events = engine.lifecycle_mut().pending_events();
    assert!(events.iter().any(|e| matches!(e, LifecycleEvent::Update { .. })));
    assert_eq!(dummy(&engine, "a").text(), "wide");

    engine.set_bounds(Region::new(0, 0, 300, 300));
    assert_eq!(dummy(&engine, "a").text(), "from type");
}

#[test]
fn test_class_activation_follows_store() {
    let mut engine = engine(NodeSpec::new("View").with_child(NodeSpec::new("Dummy").with_id("a").with_class("hot")));
    assert_eq!(dummy(&engine, "a").text(), "from type");

    engine.store_mut().set("ui:hot", true);
    let actions = engine.process_events();
    assert!(actions.contains(&Action::RefreshActivation));
    assert_eq!(dummy(&engine, "a").text(), "hot");

    engine.store_mut().set("ui:hot", false);
    engine.process_events();
    assert_eq!(dummy(&engine, "a").text(), "from type");
}

// ---------------------------------------------------------------------------
// Incremental updates
// ---------------------------------------------------------------------------

#[test]
fn test_process_events_is_idempotent() {
    let mut engine = engine(
        NodeSpec::new("View")
            .with_child(NodeSpec::new("View").with_id("inner").with_child(NodeSpec::new("Dummy")))
            .with_child(NodeSpec::new("Dummy").with_id("b")),
    );
    let snapshot = |engine: &Engine| {
        let mut out = Vec::new();
        engine.root_item().unwrap().walk(&mut |item| out.push((item.widget_id(), item.bounds())));
        out
    };
    let before = snapshot(&engine);
    assert!(engine.process_events().is_empty());
    engine.set_bounds(Region::new(0, 0, 400, 300));
    assert_eq!(snapshot(&engine), before);
}

#[test]
fn test_structural_change_rebuilds_only_the_parent() {
    let mut engine = engine(
        NodeSpec::new("View")
            .with_child(NodeSpec::new("View").with_id("inner").with_child(NodeSpec::new("Dummy")))
            .with_child(NodeSpec::new("Dummy").with_id("b")),
    );
    let inner = node(&engine, "inner");
    let root_id = engine.root_item().unwrap().widget_id();
    let sibling_id = engine.find_item_with_id("b").unwrap().widget_id();

    engine.edit_view(|view, undo| view.append_child(inner, NodeData::new("Dummy"), Some(undo)));
    let actions = engine.process_events();
    assert_eq!(actions, vec![Action::Rebuild(inner)]);

    assert_eq!(engine.root_item().unwrap().widget_id(), root_id);
    assert_eq!(engine.find_item_with_id("b").unwrap().widget_id(), sibling_id);
    assert_eq!(engine.find_item_with_id("inner").unwrap().children().len(), 2);
}

#[test]
fn test_property_change_relayouts_one_level_up() {
    let mut engine = engine(
        NodeSpec::new("View")
            .with_child(
                NodeSpec::new("View")
                    .with_id("inner")
                    .with_child(NodeSpec::new("Dummy").with_id("x"))
                    .with_child(NodeSpec::new("Dummy").with_id("y")),
            )
            .with_child(NodeSpec::new("Dummy").with_id("b")),
    );
    let x = node(&engine, "x");
    let inner_before = engine.find_item_with_id("inner").unwrap().bounds();
    let b_before = engine.find_item_with_id("b").unwrap().bounds();

    engine.edit_view(|view, undo| view.set_property(x, "flex-grow", 3, Some(undo)));
    let actions = engine.process_events();
    assert_eq!(actions, vec![Action::Refresh(x)]);

    let xb = engine.find_item_with_id("x").unwrap().bounds();
    let yb = engine.find_item_with_id("y").unwrap().bounds();
    assert!(xb.width > 2 * yb.width, "{xb:?} {yb:?}");
    assert_eq!(engine.find_item_with_id("inner").unwrap().bounds(), inner_before);
    assert_eq!(engine.find_item_with_id("b").unwrap().bounds(), b_before);
}

#[test]
fn test_class_edit_refreshes_class_members() {
    let mut engine = engine(
        NodeSpec::new("View")
            .with_child(NodeSpec::new("Dummy").with_id("a").with_class("knob"))
            .with_child(NodeSpec::new("Dummy").with_id("b")),
    );
    let knob = {
        let classes = engine.stylesheet().section(engine.styles(), "Classes").unwrap();
        engine.styles().child_with_type(classes, "knob").unwrap()
    };
    let configured_b = dummy(&engine, "b").configured();

    engine.edit_styles(|styles, undo| styles.set_property(knob, "text", "knobbed", Some(undo)));
    let actions = engine.process_events();
    assert_eq!(actions, vec![Action::ReindexClasses, Action::RefreshClass("knob".into())]);
    assert_eq!(dummy(&engine, "a").text(), "knobbed");
    assert_eq!(dummy(&engine, "b").configured(), configured_b);
}

#[test]
fn test_palette_edit_refreshes_colours_only() {
    let mut engine = engine(NodeSpec::new("View").with_child(NodeSpec::new("Dummy").with_id("a")));
    assert!(engine.add_palette_entry("accent", "ff00ff00", false));
    let actions = engine.process_events();
    assert_eq!(actions, vec![Action::RefreshColours]);
    assert_eq!(engine.colour("$accent").to_string(), "ff00ff00");
    assert!(!engine.add_palette_entry("accent", "ff0000ff", true));
}

#[test]
fn test_select_style() {
    let mut styles = styles();
    styles.children.push(
        NodeSpec::new("Style")
            .with_property("name", "dark")
            .with_child(NodeSpec::new("Types").with_child(NodeSpec::new("Dummy").with_property("text", "dark"))),
    );
    let mut engine = Engine::with_documents(
        Document::from_spec(&styles),
        Document::from_spec(&NodeSpec::new("View").with_child(NodeSpec::new("Dummy").with_id("a"))),
        EngineConfig::default(),
    );
    engine.set_bounds(Region::new(0, 0, 200, 100));
    engine.create_gui();
    assert_eq!(engine.style_names(), vec!["default".to_owned(), "dark".to_owned()]);

    assert!(engine.select_style("dark"));
    assert_eq!(dummy(&engine, "a").text(), "dark");
    assert!(engine.select_style("default"));
    assert_eq!(dummy(&engine, "a").text(), "from type");
}

// ---------------------------------------------------------------------------
// Undo
// ---------------------------------------------------------------------------

#[test]
fn test_undo_redo_across_documents() {
    let mut engine = engine(NodeSpec::new("View").with_child(NodeSpec::new("Dummy").with_id("a").with_class("knob")));
    let a = node(&engine, "a");

    engine.edit_view(|view, undo| {
        undo.begin_transaction("edit caption");
        view.set_property(a, "caption", "edited", Some(undo))
    });
    engine.process_events();
    assert_eq!(text(&engine, a, "caption").as_deref(), Some("edited"));

    assert!(engine.delete_style_class("knob"));
    engine.process_events();
    assert_eq!(engine.view().property(a, "class"), None);

    assert!(engine.undo());
    assert_eq!(engine.view().property(a, "class"), Some(&Value::from("knob")));
    let classes = engine.stylesheet().section(engine.styles(), "Classes").unwrap();
    assert!(engine.styles().child_with_type(classes, "knob").is_some());

    assert!(engine.undo());
    assert_eq!(text(&engine, a, "caption").as_deref(), Some("from class"));

    assert!(engine.redo());
    assert_eq!(text(&engine, a, "caption").as_deref(), Some("edited"));
}

// ---------------------------------------------------------------------------
// Markup
// ---------------------------------------------------------------------------

const SAVED: &str = r#"<magic>
  <Styles selected="default">
    <Style name="default">
      <Nodes/>
      <Classes>
        <knob border="2"/>
      </Classes>
      <Types/>
      <Palettes>
        <default accent="ff336699"/>
      </Palettes>
    </Style>
  </Styles>
  <View display="tabbed">
    <Dummy id="gain" class="knob" tab-caption="Gain"/>
    <Dummy id="mix"/>
  </View>
</magic>
"#;

#[test]
fn test_markup_round_trip() {
    let mut engine = Engine::from_markup(SAVED, EngineConfig::default()).unwrap();
    engine.set_bounds(Region::new(0, 0, 300, 200));
    engine.create_gui();

    let tab_bar = engine.root_item().unwrap().container().unwrap().tab_bar();
    let titles: Vec<String> = tab_bar.tabs().iter().map(|t| t.caption.clone()).collect();
    assert_eq!(titles, vec!["Gain".to_owned(), "Tab 1".to_owned()]);
    assert_eq!(engine.to_markup(), SAVED);

    let gain = node(&engine, "gain");
    engine.edit_view(|view, undo| view.set_property(gain, "flex-grow", 2, Some(undo)));
    insta::assert_snapshot!(engine.to_markup(), @r###"
    <magic>
      <Styles selected="default">
        <Style name="default">
          <Nodes/>
          <Classes>
            <knob border="2"/>
          </Classes>
          <Types/>
          <Palettes>
            <default accent="ff336699"/>
          </Palettes>
        </Style>
      </Styles>
      <View display="tabbed">
        <Dummy id="gain" class="knob" tab-caption="Gain" flex-grow="2"/>
        <Dummy id="mix"/>
      </View>
    </magic>
    "###);
}

#[test]
fn test_markup_errors() {
    assert!(Engine::from_markup("<View/>", EngineConfig::default()).is_err());
    assert!(Engine::from_markup("<magic><View>", EngineConfig::default()).is_err());
}

#[cfg(feature = "macros")]
#[test]
fn test_view_macro_builds_specs() {
    use magic_layout::view;

    let title = "Main";
    let spec = view! {
        <View display="tabbed" caption={ title }>
            <Dummy id="a" flex_grow=2 />
        </View>
    };
    assert_eq!(
        spec,
        NodeSpec::new("View")
            .with_property("display", "tabbed")
            .with_property("caption", "Main")
            .with_child(NodeSpec::new("Dummy").with_property("id", "a").with_property("flex-grow", 2.0))
    );
}
