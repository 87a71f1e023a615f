//! Bulk deletion of marked edges.
//!
//! Deletion runs in two linear passes over the enumeration cycle:
//!
//! 1. every marked node marks its edge mate, and both are pulled out of
//!    their vertex loops with [`VuGraph::vertex_twist`]. Afterwards no
//!    unmarked node's `fsucc`/`vsucc` refers to a marked node.
//! 2. the cycle is partitioned in one walk: unmarked nodes are re-linked
//!    in their original order, marked nodes go to the free list.

use crate::debug_invariants::debug_invariants;
use crate::topology::graph::VuGraph;
use crate::topology::mask::Mask;

/// Delete every edge with at least one node carrying any bit of `mask`.
///
/// Returns the number of nodes freed. Handles to freed nodes become stale.
pub fn free_marked_edges(graph: &mut VuGraph, mask: Mask) -> usize {
    let mut cursor = graph.first_node();
    while let Some(node) = cursor {
        if graph.has_mask(node, mask) {
            let mate = graph.edge_mate(node);
            graph.set_mask(mate, mask);
            graph.detach_from_vertex(node);
            graph.detach_from_vertex(mate);
        }
        cursor = graph.next_node(node);
    }

    let freed = graph.reclaim(mask);
    log::trace!(
        "vu excision: freed {freed} node(s), {} remain",
        graph.node_count()
    );
    debug_invariants!(&*graph);
    freed
}

/// Delete every edge with a node that does *not* carry `mask`.
///
/// Borrows a pool mask to hold the complement for the duration of the call.
pub fn free_nonmarked_edges(graph: &mut VuGraph, mask: Mask) -> usize {
    let doomed = graph.grab_mask();
    let mut cursor = graph.first_node();
    while let Some(node) = cursor {
        if graph.has_mask(node, mask) {
            graph.clear_mask(node, doomed);
        } else {
            graph.set_mask(node, doomed);
        }
        cursor = graph.next_node(node);
    }
    let freed = free_marked_edges(graph, doomed);
    graph.drop_mask(doomed);
    freed
}
