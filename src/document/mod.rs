//! Document trees: slotmap-backed arena, change events, undo log.
//!
//! Both the style document and the view document are [`Document`]s. Nodes are
//! addressed by [`NodeId`]; properties are loosely typed [`Value`]s.

pub mod events;
pub mod node;
pub mod tree;
pub mod undo;

pub use events::{DocumentEvent, ListenerId};
pub use node::{NodeData, NodeId, NodeSpec, Value};
pub use tree::Document;
pub use undo::{DocId, DocumentSet, UndoLog};
