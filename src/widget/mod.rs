//! Widget tree: decoration, leaf widgets, containers, lifecycle.

pub mod decorator;
pub mod item;
pub mod lifecycle;
pub mod registry;
pub mod traits;

pub use decorator::{CaptionPlacement, ClientBounds, Decorator};
pub use item::{Container, Content, WidgetNode};
pub use lifecycle::{LifecycleEvent, LifecycleTracker, WidgetId};
pub use registry::{WidgetFactory, WidgetRegistry};
pub use traits::{DataVersion, Dummy, PropertyLookup, VersionCursor, Widget};
