//! Scroll state of a flex container whose children overflow.
//!
//! `ScrollState` tracks the scroll position for a scrollable container,
//! handling clamping against the content and viewport sizes.

use crate::geometry::{Offset, Region, Size};

/// Tracks the scroll position of a container.
///
/// The scroll offset is always clamped to `[0, max_scroll]` where
/// `max_scroll = content_size - viewport_size` (clamped to zero).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    /// Current scroll offset (always >= 0, clamped to max).
    pub offset: Offset,
    /// Size of the virtual canvas holding all children.
    pub content_size: Size,
    /// Size of the visible client area.
    pub viewport_size: Size,
}

impl ScrollState {
    /// Create a new scroll state with zero offset.
    pub fn new(content_size: Size, viewport_size: Size) -> Self {
        Self { offset: Offset::new(0, 0), content_size, viewport_size }
    }

    /// The maximum scroll offset for each axis.
    pub fn max_scroll(&self) -> Offset {
        Offset::new(
            (self.content_size.width - self.viewport_size.width).max(0),
            (self.content_size.height - self.viewport_size.height).max(0),
        )
    }

    /// Scroll to an absolute position, clamping to valid range.
    pub fn scroll_to(&mut self, x: i32, y: i32) {
        let max = self.max_scroll();
        self.offset = Offset::new(x.clamp(0, max.x), y.clamp(0, max.y));
    }

    /// Whether the content is wider than the viewport.
    pub fn is_scrollable_x(&self) -> bool {
        self.content_size.width > self.viewport_size.width
    }

    /// Whether the content is taller than the viewport.
    pub fn is_scrollable_y(&self) -> bool {
        self.content_size.height > self.viewport_size.height
    }

    /// The currently visible part of the canvas, in canvas coordinates.
    pub fn visible_region(&self) -> Region {
        Region::new(self.offset.x, self.offset.y, self.viewport_size.width, self.viewport_size.height)
    }

    /// Update both sizes and re-clamp the offset.
    pub fn set_sizes(&mut self, content: Size, viewport: Size) {
        self.content_size = content;
        self.viewport_size = viewport;
        self.scroll_to(self.offset.x, self.offset.y);
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(Size::ZERO, Size::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_content() {
        let mut s = ScrollState::new(Size::new(300, 100), Size::new(100, 100));
        s.scroll_to(500, 50);
        assert_eq!(s.offset, Offset::new(200, 0));
        assert!(s.is_scrollable_x());
        assert!(!s.is_scrollable_y());
    }

    #[test]
    fn shrinking_content_reclamps() {
        let mut s = ScrollState::new(Size::new(300, 100), Size::new(100, 100));
        s.scroll_to(150, 0);
        s.set_sizes(Size::new(120, 100), Size::new(100, 100));
        assert_eq!(s.offset, Offset::new(20, 0));
        assert_eq!(s.visible_region(), Region::new(20, 0, 100, 100));
    }
}
