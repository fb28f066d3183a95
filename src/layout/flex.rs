//! Flex-box layout of a container's children, computed with taffy.
//!
//! The container and each child are described by plain snapshots
//! ([`FlexContainer`], [`FlexItem`]) read from the cascade. [`layout`] builds a
//! throwaway [`TaffyTree`] with a fixed-size root and one leaf per item, runs
//! taffy's flexbox algorithm and returns one [`Region`] per item.

use taffy::prelude::*;

use crate::document::NodeId as DocNodeId;
use crate::geometry::Region;
use crate::style::names;
use crate::style::properties;
use crate::style::ResolveCx;

// ---------------------------------------------------------------------------
// FlexContainer
// ---------------------------------------------------------------------------

/// Container-level flex settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexContainer {
    pub direction: FlexDirection,
    pub wrap: FlexWrap,
    pub align_content: AlignContent,
    pub align_items: AlignItems,
    pub justify_content: JustifyContent,
}

impl Default for FlexContainer {
    fn default() -> Self {
        Self {
            direction: FlexDirection::Row,
            wrap: FlexWrap::NoWrap,
            align_content: AlignContent::Stretch,
            align_items: AlignItems::Stretch,
            justify_content: JustifyContent::FlexStart,
        }
    }
}

impl FlexContainer {
    /// Read the container settings of `node` from the cascade.
    pub fn from_cascade(cx: &ResolveCx<'_>, node: DocNodeId) -> Self {
        let text = |name: &str| properties::text(cx.property(node, name).as_ref());
        Self {
            direction: match text(names::FLEX_DIRECTION).as_str() {
                "row-reverse" => FlexDirection::RowReverse,
                "column" => FlexDirection::Column,
                "column-reverse" => FlexDirection::ColumnReverse,
                _ => FlexDirection::Row,
            },
            wrap: match text(names::FLEX_WRAP).as_str() {
                "wrap" => FlexWrap::Wrap,
                "wrap-reverse" => FlexWrap::WrapReverse,
                _ => FlexWrap::NoWrap,
            },
            align_content: match text(names::FLEX_ALIGN_CONTENT).as_str() {
                "start" | "flex-start" => AlignContent::FlexStart,
                "end" | "flex-end" => AlignContent::FlexEnd,
                "center" => AlignContent::Center,
                "space-around" => AlignContent::SpaceAround,
                "space-between" => AlignContent::SpaceBetween,
                _ => AlignContent::Stretch,
            },
            align_items: match text(names::FLEX_ALIGN_ITEMS).as_str() {
                "start" | "flex-start" => AlignItems::FlexStart,
                "end" | "flex-end" => AlignItems::FlexEnd,
                "center" => AlignItems::Center,
                _ => AlignItems::Stretch,
            },
            justify_content: match text(names::FLEX_JUSTIFY_CONTENT).as_str() {
                "end" | "flex-end" => JustifyContent::FlexEnd,
                "center" => JustifyContent::Center,
                "space-around" => JustifyContent::SpaceAround,
                "space-between" => JustifyContent::SpaceBetween,
                _ => JustifyContent::FlexStart,
            },
        }
    }

    fn is_row(&self) -> bool {
        matches!(self.direction, FlexDirection::Row | FlexDirection::RowReverse)
    }
}

// ---------------------------------------------------------------------------
// FlexItem
// ---------------------------------------------------------------------------

/// Per-child flex settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexItem {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub min_width: f32,
    pub min_height: f32,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
    pub grow: f32,
    pub shrink: f32,
    pub order: i32,
    /// `None` means `auto`: follow the container's `align-items`.
    pub align_self: Option<AlignSelf>,
}

impl Default for FlexItem {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            min_width: 0.0,
            min_height: 0.0,
            max_width: None,
            max_height: None,
            grow: 1.0,
            shrink: 1.0,
            order: 0,
            align_self: Some(AlignSelf::Stretch),
        }
    }
}

impl FlexItem {
    /// Read the item settings of `node` from the cascade.
    pub fn from_cascade(cx: &ResolveCx<'_>, node: DocNodeId) -> Self {
        let opt = |name: &str| cx.property(node, name).and_then(|v| v.try_f64()).map(|n| n as f32);
        let num = |name: &str, default: f32| opt(name).unwrap_or(default);
        let align = properties::text(cx.property(node, names::FLEX_ALIGN_SELF).as_ref());
        Self {
            width: opt(names::WIDTH),
            height: opt(names::HEIGHT),
            min_width: num(names::MIN_WIDTH, 0.0),
            min_height: num(names::MIN_HEIGHT, 0.0),
            max_width: opt(names::MAX_WIDTH),
            max_height: opt(names::MAX_HEIGHT),
            grow: num(names::FLEX_GROW, 1.0),
            shrink: num(names::FLEX_SHRINK, 1.0),
            order: num(names::FLEX_ORDER, 0.0).round() as i32,
            align_self: match align.as_str() {
                "start" | "flex-start" => Some(AlignSelf::FlexStart),
                "end" | "flex-end" => Some(AlignSelf::FlexEnd),
                "center" => Some(AlignSelf::Center),
                "auto" => None,
                _ => Some(AlignSelf::Stretch),
            },
        }
    }

    fn to_taffy(&self, row: bool) -> Style {
        let dim = |v: Option<f32>| v.map(Dimension::from_length).unwrap_or(Dimension::AUTO);
        let main_size = if row { self.width } else { self.height };
        Style {
            size: Size { width: dim(self.width), height: dim(self.height) },
            min_size: Size {
                width: Dimension::from_length(self.min_width),
                height: Dimension::from_length(self.min_height),
            },
            max_size: Size { width: dim(self.max_width), height: dim(self.max_height) },
            flex_grow: self.grow.max(0.0),
            flex_shrink: self.shrink.max(0.0),
            // Items without an explicit main size start from zero and share
            // the space through grow.
            flex_basis: match main_size {
                Some(_) => Dimension::AUTO,
                None => Dimension::from_length(0.0),
            },
            align_self: self.align_self,
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Lay out `items` inside `area`. Returns one region per item, in the order of
/// `items`; visual order follows `order` (stable for equal values).
pub fn layout(container: &FlexContainer, items: &[FlexItem], area: Region) -> Vec<Region> {
    if items.is_empty() {
        return Vec::new();
    }
    compute(container, items, area).unwrap_or_else(|err| {
        log::debug!("flex layout failed: {err}");
        vec![area; items.len()]
    })
}

fn compute(container: &FlexContainer, items: &[FlexItem], area: Region) -> taffy::TaffyResult<Vec<Region>> {
    let mut tree: TaffyTree<()> = TaffyTree::new();
    let row = container.is_row();

    let mut leaves = Vec::with_capacity(items.len());
    for item in items {
        leaves.push(tree.new_leaf(item.to_taffy(row))?);
    }

    let mut visual: Vec<usize> = (0..items.len()).collect();
    visual.sort_by_key(|&i| items[i].order);
    let ordered: Vec<NodeId> = visual.iter().map(|&i| leaves[i]).collect();

    let width = area.width.max(0) as f32;
    let height = area.height.max(0) as f32;
    let root = tree.new_with_children(
        Style {
            display: Display::Flex,
            size: Size { width: Dimension::from_length(width), height: Dimension::from_length(height) },
            flex_direction: container.direction,
            flex_wrap: container.wrap,
            align_content: Some(container.align_content),
            align_items: Some(container.align_items),
            justify_content: Some(container.justify_content),
            ..Default::default()
        },
        &ordered,
    )?;
    tree.compute_layout(
        root,
        Size { width: AvailableSpace::Definite(width), height: AvailableSpace::Definite(height) },
    )?;

    leaves
        .iter()
        .map(|&leaf| {
            let l = tree.layout(leaf)?;
            Ok(Region::new(
                area.x + l.location.x.round() as i32,
                area.y + l.location.y.round() as i32,
                l.size.width.round() as i32,
                l.size.height.round() as i32,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn items(n: usize) -> Vec<FlexItem> {
        vec![FlexItem::default(); n]
    }

    #[test]
    fn empty_container() {
        assert!(layout(&FlexContainer::default(), &[], Region::new(0, 0, 100, 100)).is_empty());
    }

    #[test]
    fn row_shares_width_equally() {
        let regions = layout(&FlexContainer::default(), &items(2), Region::new(10, 20, 200, 50));
        assert_eq!(regions, vec![Region::new(10, 20, 100, 50), Region::new(110, 20, 100, 50)]);
    }

    #[test]
    fn column_shares_height() {
        let container = FlexContainer { direction: FlexDirection::Column, ..Default::default() };
        let regions = layout(&container, &items(4), Region::new(0, 0, 80, 400));
        assert_eq!(regions[0], Region::new(0, 0, 80, 100));
        assert_eq!(regions[3], Region::new(0, 300, 80, 100));
    }

    #[test]
    fn grow_weights() {
        let mut it = items(2);
        it[1].grow = 3.0;
        let regions = layout(&FlexContainer::default(), &it, Region::new(0, 0, 400, 10));
        assert_eq!(regions[0].width, 100);
        assert_eq!(regions[1].width, 300);
    }

    #[test]
    fn fixed_width_item_keeps_size() {
        let mut it = items(2);
        it[0].width = Some(50.0);
        it[0].grow = 0.0;
        let regions = layout(&FlexContainer::default(), &it, Region::new(0, 0, 300, 10));
        assert_eq!(regions[0], Region::new(0, 0, 50, 10));
        assert_eq!(regions[1], Region::new(50, 0, 250, 10));
    }

    #[test]
    fn max_height_limits_cross_axis_stretch() {
        let container = FlexContainer { direction: FlexDirection::Column, ..Default::default() };
        let mut it = items(2);
        it[0].max_height = Some(50.0);
        let regions = layout(&container, &it, Region::new(0, 0, 100, 300));
        assert_eq!(regions[0].height, 50);
        assert_eq!(regions[1].height, 250);
    }

    #[test]
    fn order_changes_visual_position_only() {
        let mut it = items(2);
        it[0].order = 1;
        let regions = layout(&FlexContainer::default(), &it, Region::new(0, 0, 200, 10));
        assert_eq!(regions[0].x, 100);
        assert_eq!(regions[1].x, 0);
    }

    #[test]
    fn layout_is_idempotent() {
        let it = items(3);
        let area = Region::new(0, 0, 301, 77);
        let a = layout(&FlexContainer::default(), &it, area);
        let b = layout(&FlexContainer::default(), &it, area);
        assert_eq!(a, b);
    }

    #[test]
    fn min_width_overflows_area() {
        let mut it = items(2);
        for item in &mut it {
            item.min_width = 150.0;
        }
        let regions = layout(&FlexContainer::default(), &it, Region::new(0, 0, 200, 10));
        assert_eq!(regions[1].right(), 300);
    }
}
