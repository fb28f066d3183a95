//! Style cascade: stylesheet state, class index, resolution, colours.
//!
//! The style document holds one or more `Style` nodes, each with `Nodes`
//! (per-id), `Classes`, `Types` and `Palettes` sections. [`Stylesheet`] tracks
//! which style and palette are current; [`ResolveCx`] answers property
//! lookups for view nodes against it.

pub mod class_index;
pub mod defaults;
pub mod names;
pub mod palette;
pub mod properties;
pub mod resolve;
pub mod stylesheet;

pub use class_index::{ClassIndex, Interval, MediaRange, StyleClass};
pub use palette::Colour;
pub use properties::{Length, PropertyError};
pub use resolve::{ResolveCx, Resolved, Source};
pub use stylesheet::{StyleScope, Stylesheet};
