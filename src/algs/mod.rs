//! Whole-graph algorithms built on the node substrate.

pub mod copy;
pub mod excision;

pub use copy::{copy_into, deep_copy};
pub use excision::{free_marked_edges, free_nonmarked_edges};
