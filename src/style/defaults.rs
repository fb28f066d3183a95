//! Built-in property defaults and the default stylesheet.

use crate::document::{NodeSpec, Value};

use super::names;

/// The value a property takes when no scope of the cascade defines it.
pub fn default_value(name: &str) -> Option<Value> {
    let value = match name {
        names::FLEX_DIRECTION => Value::from("row"),
        names::FLEX_WRAP => Value::from("nowrap"),
        names::FLEX_ALIGN_CONTENT => Value::from("stretch"),
        names::FLEX_ALIGN_ITEMS => Value::from("stretch"),
        names::FLEX_JUSTIFY_CONTENT => Value::from("start"),
        names::FLEX_ALIGN_SELF => Value::from("stretch"),
        names::FLEX_ORDER => Value::Number(0.0),
        names::FLEX_GROW => Value::Number(1.0),
        names::FLEX_SHRINK => Value::Number(1.0),
        names::MIN_WIDTH => Value::Number(0.0),
        names::MIN_HEIGHT => Value::Number(0.0),
        names::DISPLAY => Value::from(names::DISPLAY_FLEXBOX),
        names::CAPTION_PLACEMENT => Value::from("centred-top"),
        names::LOOK_AND_FEEL => Value::from("FoleysFinest"),
        names::FONT_SIZE => Value::Number(12.0),
        _ => return None,
    };
    Some(value)
}

/// The style created when a style document has none.
pub fn default_style() -> NodeSpec {
    let plot_like = |tag: &str| {
        NodeSpec::new(tag)
            .with_property(names::BORDER, 0)
            .with_property(names::MARGIN, 0)
            .with_property(names::PADDING, 0)
            .with_property(names::BACKGROUND_COLOR, "00000000")
            .with_property(names::RADIUS, 0)
    };
    let compact = |tag: &str| {
        NodeSpec::new(tag)
            .with_property(names::BORDER, 0)
            .with_property(names::MAX_HEIGHT, 50)
            .with_property(names::CAPTION_SIZE, 0)
    };

    NodeSpec::new(names::STYLE)
        .with_property(names::NAME, "default")
        .with_child(NodeSpec::new(names::NODES))
        .with_child(
            NodeSpec::new(names::CLASSES)
                .with_child(
                    NodeSpec::new("plot-view")
                        .with_property(names::BORDER, 2)
                        .with_property(names::BACKGROUND_COLOR, "black")
                        .with_property(names::BORDER_COLOR, "silver")
                        .with_property(names::DISPLAY, names::DISPLAY_CONTENTS),
                )
                .with_child(
                    NodeSpec::new("nomargin")
                        .with_property(names::MARGIN, 0)
                        .with_property(names::PADDING, 0)
                        .with_property(names::BORDER, 0),
                )
                .with_child(
                    NodeSpec::new("group")
                        .with_property(names::MARGIN, 5)
                        .with_property(names::PADDING, 5)
                        .with_property(names::BORDER, 2)
                        .with_property(names::FLEX_DIRECTION, "column"),
                )
                .with_child(
                    NodeSpec::new("transparent")
                        .with_property(names::BACKGROUND_COLOR, "transparentblack"),
                ),
        )
        .with_child(
            NodeSpec::new(names::TYPES)
                .with_child(
                    NodeSpec::new("Slider")
                        .with_property(names::BORDER, 0)
                        .with_property("slider-textbox", "textbox-below"),
                )
                .with_child(compact("ToggleButton").with_property("text", "Active"))
                .with_child(compact("TextButton"))
                .with_child(compact("ComboBox"))
                .with_child(plot_like("Plot"))
                .with_child(plot_like("XYDragComponent")),
        )
        .with_child(
            NodeSpec::new(names::PALETTES).with_child(NodeSpec::new("default")),
        )
}
