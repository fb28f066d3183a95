//! The tab strip of a tabbed container.

use crate::geometry::Region;
use crate::style::Colour;

/// One tab: the caption and colour taken from the child's decoration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub caption: String,
    pub colour: Colour,
}

/// A synthesized tab strip with one tab per child.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabBar {
    tabs: Vec<Tab>,
    selected: usize,
    bounds: Region,
}

impl TabBar {
    pub fn new(tabs: Vec<Tab>) -> Self {
        Self { tabs, selected: 0, bounds: Region::EMPTY }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// The highlighted tab.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Highlight `index`, clamped to the last tab. Returns the index used.
    pub fn select(&mut self, index: usize) -> usize {
        self.selected = index.min(self.tabs.len().saturating_sub(1));
        self.selected
    }

    pub fn bounds(&self) -> Region {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Region) {
        self.bounds = bounds;
    }

    /// Bounds of tab `index`: the strip split into equal widths, the last tab
    /// taking the remainder.
    pub fn tab_bounds(&self, index: usize) -> Option<Region> {
        let count = self.tabs.len() as i32;
        if index >= self.tabs.len() {
            return None;
        }
        let width = self.bounds.width / count;
        let x = self.bounds.x + width * index as i32;
        let w = if index as i32 == count - 1 { self.bounds.right() - x } else { width };
        Some(Region::new(x, self.bounds.y, w, self.bounds.height))
    }

    /// The tab at point (x, y), if any.
    pub fn tab_at(&self, x: i32, y: i32) -> Option<usize> {
        (0..self.tabs.len()).find(|&i| self.tab_bounds(i).is_some_and(|r| r.contains(x, y)))
    }
}
