//! Utility functions for rule implementations.

pub mod nodes;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use nodes::{first_child_of_kind, named_children, preorder, statements, Preorder};
