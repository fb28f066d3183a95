//! # magic-layout
//!
//! A style-cascade and layout engine for declarative user interfaces.
//!
//! A GUI is described by two documents: a **view** document (a tree of
//! typed nodes with attributes) and a **style** document (styles holding
//! per-id, per-class and per-type property sets plus colour palettes).
//! The engine resolves every property of every view node through the
//! cascade, builds a widget tree with flexbox, tabbed and absolute layout,
//! and keeps that tree in sync with edits to either document, the property
//! store, or the available size.
//!
//! ## Core Systems
//!
//! - **[`document`]**: Slotmap-backed property trees with change events and undo
//! - **[`store`]**: The application property store that classes and widgets bind to
//! - **[`style`]**: Stylesheet selection, class index with media ranges, cascade, palettes
//! - **[`layout`]**: Taffy-powered flex layout, tab strips, scroll canvases, placements
//! - **[`widget`]**: Widget trait, factories, decorators, the widget tree
//! - **[`controller`]**: Turns document and store changes into scoped refresh actions
//! - **[`engine`]**: Ties everything together
//! - **[`markup`]**: Loading and saving the `<magic>` document format
//! - **[`geometry`]**: Offset, Size, Region, Spacing primitives
//!
//! ## Example
//!
//! ```
//! use magic_layout::geometry::Region;
//! use magic_layout::{Engine, EngineConfig};
//!
//! let mut engine = Engine::from_markup(
//!     r#"<magic><View><Dummy id="a"/><Dummy id="b"/></View></magic>"#,
//!     EngineConfig::default(),
//! )
//! .unwrap();
//! engine.set_bounds(Region::new(0, 0, 400, 300));
//! engine.create_gui();
//! assert!(engine.find_item_with_id("b").is_some());
//! ```

// Foundation
pub mod geometry;

// Documents
pub mod document;
pub mod store;

// Core systems
pub mod layout;
pub mod style;

// Widget system
pub mod controller;
pub mod widget;

// Application
pub mod engine;
pub mod markup;

pub use engine::{Engine, EngineConfig};

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use magic_layout_macros::view;
