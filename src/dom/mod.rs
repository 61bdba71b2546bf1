//! The rendering surface: an in-memory node tree plus the element
//! constructors that render into it.

pub mod elements;
pub mod tree;

pub use elements::{button, div, element, input, label, p, span, Element, Prop};
pub use tree::{Dom, NodeId, NodeKind};
