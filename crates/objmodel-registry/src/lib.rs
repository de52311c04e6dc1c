//! Class registry, inheritance graph, completion and layout.
//!
//! ## Modules
//!
//! - [`registry`]: Storage for classes and functions
//! - [`class_graph`]: Inheritance graph and topological ordering
//! - [`completion`]: Implicit special members, vtables and abstractness
//! - [`layout`]: Object size, alignment and member offsets
//!
//! Classes are declared into a [`SymbolRegistry`], then finalized with a
//! single [`TypeCompletionPass`]. Resolution and layout only read a
//! completed registry.

pub mod class_graph;
pub mod completion;
pub mod layout;
pub mod registry;

pub use class_graph::ClassGraph;
pub use completion::{CompletionOutput, TypeCompletionPass, destructor_signature};
pub use layout::{FieldLayout, LayoutCalculator, ObjectLayout, compute_layout};
pub use registry::SymbolRegistry;
