//! # vu-graph
//!
//! vu-graph is the node-storage and lifecycle layer beneath a planar
//! rotation-system graph: the half-edge style mesh that triangulation,
//! polygon boolean operations and mesh traversal are written against.
//!
//! ## Features
//! - Block arena: nodes come from blocks of [`topology::arena::BLOCK_COUNT`]
//!   slots and are recycled through an O(1) free list
//! - Generation-checked [`NodeId`] handles; using a freed node is detected
//! - Enumeration cycle visiting every live node in splice order
//! - A pool of 16 borrowable mask bits with strictly paired grab/drop
//! - Bulk deletion of marked edges in two linear passes
//! - Deep copy into a fresh or recycled graph
//!
//! ## Usage
//!
//! ```rust
//! use vu_graph::prelude::*;
//!
//! let mut graph = VuGraph::new(0);
//! let (a, b) = graph.make_pair().unwrap();
//! let (c, _d) = graph.make_pair().unwrap();
//! graph.vertex_twist(a, c);
//! assert_eq!(graph.edge_mate(a), b);
//!
//! let doomed = graph.grab_mask();
//! graph.set_mask(c, doomed);
//! assert_eq!(free_marked_edges(&mut graph, doomed), 2);
//! graph.drop_mask(doomed);
//!
//! assert_eq!(graph.node_count(), 2);
//! graph.free_graph();
//! ```
//!
//! ## Errors
//! Environmental failures (the host allocator refusing a block, copying
//! between graphs with different node layouts) are [`MeshError`]s.
//! Contract violations (mask pool exhaustion, masks leaked at teardown,
//! stale handles) panic with a `[contract]` message; see
//! [`mesh_error::ContractViolation`].
//!
//! ## Threading
//! A graph and its nodes belong to one thread of control. Nothing is
//! synchronized and no operation suspends.

pub mod algs;
pub mod config;
pub mod debug_invariants;
pub mod mesh_error;
pub mod topology;

pub use config::GraphConfig;
pub use debug_invariants::DebugInvariants;
pub use mesh_error::{ContractViolation, MeshError};
pub use topology::{Mask, NodeId, VuGraph};

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::copy::{copy_into, deep_copy};
    pub use crate::algs::excision::{free_marked_edges, free_nonmarked_edges};
    pub use crate::config::GraphConfig;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::{ContractViolation, MeshError};
    pub use crate::topology::loops::LoopKind;
    pub use crate::topology::mask::{Mask, MaskPool};
    pub use crate::topology::node::NodeId;
    pub use crate::topology::primitive::{Periods, PrimitiveData};
    pub use crate::topology::graph::VuGraph;
}
