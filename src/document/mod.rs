//! Headless stand-in for the rendered page: element boxes, classes and text.
pub mod selector;

mod tree;

pub use tree::{Document, Element, ElementDef, SplitDef};
