//! Decoration around every widget: margin, border, padding and caption.
//!
//! The engine only computes where things go. The decorator snapshot is what a
//! host painter needs to draw the frame and what layout needs to find the
//! client rectangle inside it.

use crate::document::NodeId;
use crate::geometry::{Region, Spacing};
use crate::style::names;
use crate::style::properties;
use crate::style::{Colour, ResolveCx};

/// Where a caption sits relative to the decorated box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CaptionPlacement {
    #[default]
    CentredTop,
    TopLeft,
    TopRight,
    Centred,
    CentredLeft,
    CentredRight,
    BottomLeft,
    BottomRight,
    CentredBottom,
}

impl CaptionPlacement {
    /// Parse a `caption-placement` value; unknown values fall back to
    /// centred-top.
    pub fn parse(value: &str) -> Self {
        match value {
            "top-left" => CaptionPlacement::TopLeft,
            "top-right" => CaptionPlacement::TopRight,
            "centred" => CaptionPlacement::Centred,
            "centred-left" => CaptionPlacement::CentredLeft,
            "centred-right" => CaptionPlacement::CentredRight,
            "bottom-left" => CaptionPlacement::BottomLeft,
            "bottom-right" => CaptionPlacement::BottomRight,
            "centred-bottom" => CaptionPlacement::CentredBottom,
            _ => CaptionPlacement::CentredTop,
        }
    }
}

/// The client rectangle and the caption rectangle of a decorated box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientBounds {
    pub client: Region,
    pub caption: Region,
}

/// Resolved decoration properties of one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub margin: Spacing,
    pub padding: Spacing,
    pub border: i32,
    pub radius: f64,
    pub caption: String,
    pub caption_placement: CaptionPlacement,
    pub caption_size: i32,
    pub tab_caption: String,
    pub background_colour: Colour,
    pub border_colour: Colour,
    pub caption_colour: Colour,
    pub tab_colour: Colour,
    pub background_alpha: f64,
    pub background_image: Option<String>,
    pub image_placement: String,
    pub background_gradient: Option<String>,
}

impl Default for Decorator {
    fn default() -> Self {
        Self {
            margin: Spacing::all(5),
            padding: Spacing::all(5),
            border: 0,
            radius: 5.0,
            caption: String::new(),
            caption_placement: CaptionPlacement::CentredTop,
            caption_size: 20,
            tab_caption: String::new(),
            background_colour: Colour::from_argb(0xff, 0xa9, 0xa9, 0xa9),
            border_colour: Colour::from_argb(0xff, 0xc0, 0xc0, 0xc0),
            caption_colour: Colour::from_argb(0xff, 0xc0, 0xc0, 0xc0),
            tab_colour: Colour::from_argb(0xff, 0xa9, 0xa9, 0xa9),
            background_alpha: 1.0,
            background_image: None,
            image_placement: String::new(),
            background_gradient: None,
        }
    }
}

impl Decorator {
    /// Reset to the defaults and re-read every decoration property of `node`.
    pub fn configure(&mut self, cx: &ResolveCx<'_>, node: NodeId) {
        *self = Decorator::default();
        let get = |name: &str| cx.property(node, name);
        let optional = |name: &str| Some(properties::text(get(name).as_ref())).filter(|s| !s.is_empty());

        self.margin = properties::spacing(names::MARGIN, get(names::MARGIN).as_ref(), self.margin);
        self.padding = properties::spacing(names::PADDING, get(names::PADDING).as_ref(), self.padding);
        self.border = properties::int(get(names::BORDER).as_ref(), self.border).max(0);
        self.radius = properties::number(get(names::RADIUS).as_ref(), self.radius);
        self.caption = properties::text(get(names::CAPTION).as_ref());
        self.caption_placement =
            CaptionPlacement::parse(&properties::text(get(names::CAPTION_PLACEMENT).as_ref()));
        self.caption_size = properties::int(get(names::CAPTION_SIZE).as_ref(), self.caption_size).max(0);
        self.tab_caption = properties::text(get(names::TAB_CAPTION).as_ref());
        self.background_alpha =
            properties::number(get(names::BACKGROUND_ALPHA).as_ref(), self.background_alpha).clamp(0.0, 1.0);
        self.background_image = optional(names::BACKGROUND_IMAGE);
        self.image_placement = properties::text(get(names::IMAGE_PLACEMENT).as_ref());
        self.background_gradient = optional(names::BACKGROUND_GRADIENT);
        self.update_colours(cx, node);
    }

    /// Re-resolve only the colours, e.g. after a palette edit.
    pub fn update_colours(&mut self, cx: &ResolveCx<'_>, node: NodeId) {
        let defaults = Decorator::default();
        self.background_colour = cx.colour_or(node, names::BACKGROUND_COLOR, defaults.background_colour);
        self.border_colour = cx.colour_or(node, names::BORDER_COLOR, defaults.border_colour);
        self.caption_colour = cx.colour_or(node, names::CAPTION_COLOR, defaults.caption_colour);
        self.tab_colour = cx.colour_or(node, names::TAB_COLOR, defaults.tab_colour);
    }

    /// The background colour with `background-alpha` applied.
    pub fn effective_background(&self) -> Colour {
        self.background_colour.with_multiplied_alpha(self.background_alpha)
    }

    /// The text to show on this widget's tab in a tabbed parent.
    pub fn tab_title(&self, index: usize) -> String {
        if !self.tab_caption.is_empty() {
            self.tab_caption.clone()
        } else if !self.caption.is_empty() {
            self.caption.clone()
        } else {
            format!("Tab {index}")
        }
    }

    /// Split `bounds` into the caption strip and the client rectangle.
    ///
    /// Margin, border and padding are removed first. Without a caption the
    /// caption rectangle is empty. A centred caption overlays the client area.
    pub fn client_bounds(&self, bounds: Region) -> ClientBounds {
        let inner = bounds
            .shrink(self.margin)
            .shrink(Spacing::all(self.border))
            .shrink(self.padding);
        if self.caption.is_empty() {
            return ClientBounds { client: inner, caption: Region::EMPTY };
        }

        let size = self.caption_size;
        // No text metrics here; estimate a side caption at half an em per char.
        let side = (self.caption.chars().count() as i32 * size / 2).min(inner.width.max(0));
        let (caption, client) = match self.caption_placement {
            CaptionPlacement::CentredTop | CaptionPlacement::TopLeft | CaptionPlacement::TopRight => {
                inner.split_top(size)
            }
            CaptionPlacement::CentredBottom | CaptionPlacement::BottomLeft | CaptionPlacement::BottomRight => {
                inner.split_bottom(size)
            }
            CaptionPlacement::CentredLeft => inner.split_left(side),
            CaptionPlacement::CentredRight => inner.split_right(side),
            CaptionPlacement::Centred => (inner, inner),
        };
        ClientBounds { client, caption }
    }
}
