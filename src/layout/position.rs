//! Absolute placement for the `contents` layout mode.

use crate::document::NodeId;
use crate::geometry::Region;
use crate::style::names;
use crate::style::properties::{self, Length};
use crate::style::ResolveCx;

/// A child's `pos-x`, `pos-y`, `pos-width` and `pos-height`, each absolute or
/// a percentage of the parent's content box. Defaults fill the parent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: Length::Absolute(0.0),
            y: Length::Absolute(0.0),
            width: Length::Percent(100.0),
            height: Length::Percent(100.0),
        }
    }
}

impl Placement {
    /// Read the placement of `node` from the cascade.
    pub fn from_cascade(cx: &ResolveCx<'_>, node: NodeId) -> Self {
        let defaults = Placement::default();
        let read = |name: &str, default: Length| {
            properties::length(name, cx.property(node, name).as_ref(), default)
        };
        Self {
            x: read(names::POS_X, defaults.x),
            y: read(names::POS_Y, defaults.y),
            width: read(names::POS_WIDTH, defaults.width),
            height: read(names::POS_HEIGHT, defaults.height),
        }
    }

    /// Bounds inside `parent`. Offsets are relative to the parent's origin.
    pub fn resolve(&self, parent: Region) -> Region {
        Region::new(
            parent.x + self.x.resolve(parent.width),
            parent.y + self.y.resolve(parent.height),
            self.width.resolve(parent.width),
            self.height.resolve(parent.height),
        )
    }
}
