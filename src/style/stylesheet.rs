//! The stylesheet: current style and palette, class index, media state, and
//! editing helpers for the style document.

use crate::document::{Document, NodeData, NodeId, UndoLog, Value};
use crate::geometry::Size;
use crate::store::PropertyStore;

use super::class_index::{ClassIndex, MediaRange};
use super::defaults;
use super::names;
use super::palette::{self, Colour};

/// Which section of the current style a style-document node belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleScope {
    /// A class node, or a node below one (its `media` child). Carries the
    /// class name.
    Class(String),
    /// A `Types` entry, carrying the view type tag it styles.
    Type(String),
    /// A `Nodes` entry, carrying the view id it styles.
    Id(String),
    /// A palette of the current style.
    Palette,
    /// A section node, another style, or the `Styles` root.
    Other,
}

/// Explicit, non-global style state.
///
/// Holds the ids of the current `Style` and palette inside the style
/// document, the derived [`ClassIndex`], and the media size with its
/// aggregate validity range. Passed by reference to every resolution.
#[derive(Debug, Default)]
pub struct Stylesheet {
    style: Option<NodeId>,
    palette: Option<NodeId>,
    classes: ClassIndex,
    media: Size,
    valid: MediaRange,
}

impl Stylesheet {
    /// Create an empty stylesheet. Call [`Stylesheet::select`] before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the current style and palette and rebuild the class index.
    ///
    /// The style is the `Style` child whose `name` matches the root's
    /// `selected` property, else the first one. A default style is inserted
    /// when there is none, and a `default` palette when the style has no
    /// palette. These bootstrap insertions are not recorded for undo.
    pub fn select(&mut self, styles: &mut Document, store: &PropertyStore) {
        let root = styles.root();
        let selected = styles.property(root, names::SELECTED).cloned();
        let by_name = selected.and_then(|name| styles.child_with_property(root, names::NAME, &name));
        let style = match by_name.or_else(|| styles.child_with_type(root, names::STYLE)) {
            Some(style) => style,
            None => {
                log::debug!("style document has no style, creating the default one");
                match styles.insert_spec(root, usize::MAX, &defaults::default_style(), None) {
                    Some(style) => style,
                    None => return,
                }
            }
        };
        self.style = Some(style);
        self.palette = select_palette(styles, style);
        self.rebuild_classes(styles, store);
    }

    /// Rebuild the class index from the current style and recompute the
    /// aggregate media range.
    pub fn rebuild_classes(&mut self, styles: &Document, store: &PropertyStore) {
        let classes = self.section(styles, names::CLASSES);
        self.classes = ClassIndex::build(styles, classes, store);
        self.valid = self.classes.valid_range(self.media);
    }

    /// Re-read class activation flags. Returns whether any flag changed.
    pub fn refresh_activation(&mut self, store: &PropertyStore) -> bool {
        self.classes.refresh_activation(store)
    }

    /// Update the media size.
    ///
    /// Returns `true` when the new size lies inside the current validity
    /// range, so every resolved value is still correct. Otherwise the range
    /// is recomputed around the new size and `false` is returned; the caller
    /// must re-resolve.
    pub fn set_media_size(&mut self, size: Size) -> bool {
        self.media = size;
        if self.valid.contains(size) {
            return true;
        }
        self.valid = self.classes.valid_range(size);
        false
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The current `Style` node.
    pub fn style(&self) -> Option<NodeId> {
        self.style
    }

    /// The current palette node.
    pub fn palette(&self) -> Option<NodeId> {
        self.palette
    }

    pub fn classes(&self) -> &ClassIndex {
        &self.classes
    }

    pub fn media_size(&self) -> Size {
        self.media
    }

    /// The aggregate validity range around the current media size.
    pub fn valid_range(&self) -> MediaRange {
        self.valid
    }

    /// A section (`Nodes`, `Classes`, `Types`, `Palettes`) of the current style.
    pub fn section(&self, styles: &Document, section: &str) -> Option<NodeId> {
        styles.child_with_type(self.style?, section)
    }

    /// Resolve a colour token against the current palette.
    pub fn colour(&self, styles: &Document, token: &str) -> Colour {
        palette::resolve_colour(styles, self.palette, token)
    }

    // -----------------------------------------------------------------------
    // Scope classification
    // -----------------------------------------------------------------------

    /// Which scope of the current style `node` belongs to, or `None` if it is
    /// not part of the current style at all.
    pub fn scope_of(&self, styles: &Document, node: NodeId) -> Option<StyleScope> {
        let style = self.style?;
        if node == style {
            return Some(StyleScope::Other);
        }
        let mut path = styles.ancestors(node);
        path.insert(0, node);
        // path: node, parent, ..., root. Find the section directly below style.
        let section_pos = path.iter().position(|&n| styles.parent(n) == Some(style))?;
        let section = path[section_pos];
        if section_pos == 0 {
            return Some(StyleScope::Other);
        }
        let entry = path[section_pos - 1];
        let entry_name = styles.node_type(entry).unwrap_or_default().to_owned();
        Some(match styles.node_type(section) {
            Some(names::CLASSES) => StyleScope::Class(entry_name),
            Some(names::TYPES) if section_pos == 1 => StyleScope::Type(entry_name),
            Some(names::NODES) if section_pos == 1 => StyleScope::Id(entry_name),
            Some(names::PALETTES) if Some(entry) == self.palette => StyleScope::Palette,
            _ => StyleScope::Other,
        })
    }

    /// Whether `node` is a class entry of the current style.
    pub fn is_class_node(&self, styles: &Document, node: NodeId) -> bool {
        self.is_entry_of(styles, node, names::CLASSES)
    }

    /// Whether `node` is a type entry of the current style.
    pub fn is_type_node(&self, styles: &Document, node: NodeId) -> bool {
        self.is_entry_of(styles, node, names::TYPES)
    }

    /// Whether `node` is an id entry of the current style.
    pub fn is_id_node(&self, styles: &Document, node: NodeId) -> bool {
        self.is_entry_of(styles, node, names::NODES)
    }

    /// Whether `node` is a palette of the current style.
    pub fn is_palette_node(&self, styles: &Document, node: NodeId) -> bool {
        self.is_entry_of(styles, node, names::PALETTES)
    }

    fn is_entry_of(&self, styles: &Document, node: NodeId, section: &str) -> bool {
        let Some(parent) = styles.parent(node) else {
            return false;
        };
        self.section(styles, section) == Some(parent)
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Names of all styles in the document.
    pub fn style_names(styles: &Document) -> Vec<String> {
        styles
            .children(styles.root())
            .iter()
            .filter_map(|&s| styles.property(s, names::NAME))
            .map(|v| v.as_text().into_owned())
            .collect()
    }

    /// Class names of the current style, in document order.
    pub fn style_class_names(&self, styles: &Document) -> Vec<String> {
        self.entry_names(styles, names::CLASSES)
    }

    /// Entry names of the current palette.
    pub fn palette_entry_names(&self, styles: &Document) -> Vec<String> {
        self.palette
            .and_then(|p| styles.get(p))
            .map(|data| data.properties().map(|(n, _)| n.to_owned()).collect())
            .unwrap_or_default()
    }

    fn entry_names(&self, styles: &Document, section: &str) -> Vec<String> {
        self.section(styles, section)
            .map(|s| {
                styles
                    .children(s)
                    .iter()
                    .filter_map(|&c| styles.node_type(c))
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Add a class to the current style, or return the existing one.
    pub fn add_style_class(
        &self,
        styles: &mut Document,
        name: &str,
        mut undo: Option<&mut UndoLog>,
    ) -> Option<NodeId> {
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            log::debug!("invalid class name {name:?}");
            return None;
        }
        let classes = styles.get_or_create_child(self.style?, names::CLASSES, undo.as_deref_mut())?;
        styles.get_or_create_child(classes, name, undo)
    }

    /// Delete a class from the current style and remove its token from every
    /// view node that references it.
    pub fn delete_style_class(
        &self,
        styles: &mut Document,
        view: &mut Document,
        name: &str,
        mut undo: Option<&mut UndoLog>,
    ) -> bool {
        let Some(class) = self
            .section(styles, names::CLASSES)
            .and_then(|c| styles.child_with_type(c, name))
        else {
            return false;
        };
        styles.remove_child(class, undo.as_deref_mut());
        remove_class_references(view, name, undo);
        true
    }

    /// Add (or overwrite, unless `keep_if_exists`) a palette entry.
    pub fn add_palette_entry(
        &self,
        styles: &mut Document,
        name: &str,
        colour: &str,
        keep_if_exists: bool,
        undo: Option<&mut UndoLog>,
    ) -> bool {
        let Some(palette) = self.palette else {
            return false;
        };
        if keep_if_exists && styles.property(palette, name).is_some() {
            return false;
        }
        styles.set_property(palette, name, colour, undo)
    }
}

/// Pick the palette of `style`: by `selected` on the `Palettes` node, else
/// the first one. Creates the section and a `default` palette if needed.
fn select_palette(styles: &mut Document, style: NodeId) -> Option<NodeId> {
    let palettes = styles.get_or_create_child(style, names::PALETTES, None)?;
    if styles.children(palettes).is_empty() {
        styles.append_child(palettes, NodeData::new("default"), None);
    }
    let selected = styles
        .property(palettes, names::SELECTED)
        .map(|v| v.as_text().into_owned())
        .and_then(|name| styles.child_with_type(palettes, &name));
    selected.or_else(|| styles.children(palettes).first().copied())
}

/// Remove `class` from the `class` property of every view node.
pub fn remove_class_references(view: &mut Document, class: &str, mut undo: Option<&mut UndoLog>) {
    for node in view.walk_depth_first(view.root()) {
        let Some(data) = view.get(node) else {
            continue;
        };
        if !data.has_class(class) {
            continue;
        }
        let remaining: Vec<String> = data.class_names().into_iter().filter(|c| c != class).collect();
        if remaining.is_empty() {
            view.remove_property(node, names::CLASS, undo.as_deref_mut());
        } else {
            view.set_property(node, names::CLASS, Value::from(remaining.join(" ")), undo.as_deref_mut());
        }
    }
}
