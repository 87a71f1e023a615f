//! Top-level module for rotation-graph storage.
//!
//! This module provides the node substrate every topology operator builds on:
//! - `NodeId` handles and `VuNode` records
//! - The block arena, free list and enumeration cycle behind them
//! - The mask pool and companion array cache
//! - `VuGraph`, the header owning all of the above
//!
//! Most users will interact with [`VuGraph`] and the rotation queries on it
//! (`fsucc`, `vsucc`, `edge_mate`, `vertex_twist`).

pub mod arena;
pub mod array_cache;
pub mod enumeration;
pub mod free_list;
pub mod graph;
pub mod loops;
pub mod mask;
pub mod node;
pub mod primitive;
pub mod stats;

pub use graph::{Nodes, VuGraph};
pub use loops::{LoopIter, LoopKind};
pub use mask::{Mask, MaskPool};
pub use node::{NodeId, NodeLink, VuNode};
pub use primitive::{Periods, PrimitiveData, PropagationFlags};
pub use stats::GraphStats;
