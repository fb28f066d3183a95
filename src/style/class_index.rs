//! Style class index: activation, recursion and media ranges per class.
//!
//! The index is derived from the `Classes` section of the current style and
//! rebuilt whenever that section changes. It also computes the aggregate
//! [`MediaRange`]: the box of media sizes around the current size in which no
//! class changes validity, so a resize that stays inside it needs no restyle.

use crate::document::{Document, NodeId};
use crate::geometry::Size;
use crate::store::{normalize_path, PropertyStore};

use super::names;
use super::properties;

// ---------------------------------------------------------------------------
// Interval / MediaRange
// ---------------------------------------------------------------------------

/// An inclusive integer interval. `i32::MIN`/`i32::MAX` mean unbounded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    pub start: i32,
    pub end: i32,
}

impl Interval {
    pub const UNBOUNDED: Interval = Interval { start: i32::MIN, end: i32::MAX };

    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub const fn contains(self, value: i32) -> bool {
        value >= self.start && value <= self.end
    }

    /// Narrow `self` so that it still contains `value` but does not cross any
    /// boundary of `class`.
    fn clip_around(&mut self, class: Interval, value: i32) {
        if value < class.start {
            self.end = self.end.min(class.start.saturating_sub(1));
        } else if value <= class.end {
            self.start = self.start.max(class.start);
            self.end = self.end.min(class.end);
        } else {
            self.start = self.start.max(class.end.saturating_add(1));
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::UNBOUNDED
    }
}

/// A 2D media range: one interval per axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaRange {
    pub width: Interval,
    pub height: Interval,
}

impl MediaRange {
    pub const UNBOUNDED: MediaRange =
        MediaRange { width: Interval::UNBOUNDED, height: Interval::UNBOUNDED };

    pub const fn contains(self, size: Size) -> bool {
        self.width.contains(size.width) && self.height.contains(size.height)
    }
}

// ---------------------------------------------------------------------------
// StyleClass
// ---------------------------------------------------------------------------

/// One entry of the index.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleClass {
    pub name: String,
    /// The class node in the style document.
    pub node: NodeId,
    /// Property store path of the activation flag. `None` means always active.
    pub active_binding: Option<String>,
    /// Snapshot of the activation flag.
    pub is_active: bool,
    pub is_recursive: bool,
    pub media: MediaRange,
}

impl StyleClass {
    /// Whether the class applies at `size`.
    pub fn applies(&self, size: Size) -> bool {
        self.is_active && self.media.contains(size)
    }
}

// ---------------------------------------------------------------------------
// ClassIndex
// ---------------------------------------------------------------------------

/// Class name -> [`StyleClass`], in document order.
#[derive(Clone, Debug, Default)]
pub struct ClassIndex {
    classes: Vec<StyleClass>,
}

impl ClassIndex {
    /// Build the index from a `Classes` node.
    pub fn build(styles: &Document, classes_node: Option<NodeId>, store: &PropertyStore) -> Self {
        let Some(classes_node) = classes_node else {
            return Self::default();
        };
        let classes = styles
            .children(classes_node)
            .iter()
            .filter_map(|&node| {
                let data = styles.get(node)?;
                let active_binding = data
                    .property(names::ACTIVE)
                    .map(|v| normalize_path(v.as_text().trim()))
                    .filter(|p| !p.is_empty());
                let is_active = active_binding
                    .as_deref()
                    .map(|path| store.get_bool(path))
                    .unwrap_or(true);
                Some(StyleClass {
                    name: data.node_type.clone(),
                    node,
                    is_active,
                    active_binding,
                    is_recursive: properties::boolean(data.property(names::RECURSIVE), false),
                    media: media_range(styles, node),
                })
            })
            .collect();
        Self { classes }
    }

    /// Look up a class by name.
    pub fn get(&self, name: &str) -> Option<&StyleClass> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// All classes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleClass> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Whether any class's activation is bound to `path`.
    pub fn binds(&self, path: &str) -> bool {
        self.classes.iter().any(|c| c.active_binding.as_deref() == Some(path))
    }

    /// Re-read activation flags from the store. Returns whether any changed.
    pub fn refresh_activation(&mut self, store: &PropertyStore) -> bool {
        let mut changed = false;
        for class in &mut self.classes {
            if let Some(path) = &class.active_binding {
                let active = store.get_bool(path);
                if active != class.is_active {
                    class.is_active = active;
                    changed = true;
                }
            }
        }
        changed
    }

    /// The aggregate media range around `size`.
    ///
    /// Per axis: classes containing the size are intersected; classes not
    /// containing it clip the range at their nearest boundary.
    pub fn valid_range(&self, size: Size) -> MediaRange {
        let mut range = MediaRange::UNBOUNDED;
        for class in &self.classes {
            range.width.clip_around(class.media.width, size.width);
            range.height.clip_around(class.media.height, size.height);
        }
        range
    }
}

/// Media range of a class from its `media` child.
fn media_range(styles: &Document, class_node: NodeId) -> MediaRange {
    let Some(media) = styles.child_with_type(class_node, names::MEDIA) else {
        return MediaRange::UNBOUNDED;
    };
    let bound = |name: &str, default: i32| {
        styles
            .property(media, name)
            .and_then(|v| v.try_f64())
            .map(|n| n.round() as i32)
            .unwrap_or(default)
    };
    MediaRange {
        width: Interval::new(bound(names::MIN_WIDTH, i32::MIN), bound(names::MAX_WIDTH, i32::MAX)),
        height: Interval::new(bound(names::MIN_HEIGHT, i32::MIN), bound(names::MAX_HEIGHT, i32::MAX)),
    }
}
