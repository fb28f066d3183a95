//! Layout strategies of a container: flex (taffy), tabbed, absolute contents.

pub mod flex;
pub mod position;
pub mod scroll;
pub mod tabbed;

pub use flex::{FlexContainer, FlexItem};
pub use position::Placement;
pub use scroll::ScrollState;
pub use tabbed::{Tab, TabBar};

use crate::style::names;

/// Engine-wide layout settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Tab strip height when a tabbed container sets no `tab-height`.
    pub tab_height: i32,
    /// Space given up for a scrollbar in the second scroll pass.
    pub scrollbar_thickness: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { tab_height: 30, scrollbar_thickness: 8 }
    }
}

/// How a container places its children, selected by `display`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Flex-box over the content box.
    #[default]
    FlexBox,
    /// Each child placed by its own `pos-*` properties.
    Contents,
    /// One child visible at a time under a tab strip.
    Tabbed,
}

impl LayoutMode {
    pub fn from_display(display: &str) -> Self {
        match display {
            names::DISPLAY_CONTENTS => LayoutMode::Contents,
            names::DISPLAY_TABBED => LayoutMode::Tabbed,
            _ => LayoutMode::FlexBox,
        }
    }
}

/// Which axes of a flex container may scroll, from `scroll-mode`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScrollMode {
    #[default]
    NoScroll,
    Horizontal,
    Vertical,
    Both,
}

impl ScrollMode {
    /// Parse a `scroll-mode` value. Unknown values yield `None` so the caller
    /// keeps its previous mode.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            names::SCROLL_NONE => Some(ScrollMode::NoScroll),
            names::SCROLL_HORIZONTAL => Some(ScrollMode::Horizontal),
            names::SCROLL_VERTICAL => Some(ScrollMode::Vertical),
            names::SCROLL_BOTH => Some(ScrollMode::Both),
            _ => None,
        }
    }

    pub fn scrolls(self) -> bool {
        self != ScrollMode::NoScroll
    }
}
