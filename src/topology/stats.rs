//! Graph-scoped allocation telemetry.

/// Counters accumulated over a graph's lifetime. `reinitialize` does not
/// reset them; they describe the arena, not the current contents.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub blocks_allocated: usize,
    /// Successful `allocate_node` calls.
    pub nodes_allocated: usize,
    /// Allocations served by a slot that had been used and freed before.
    pub nodes_reused: usize,
    /// Nodes returned to the free list.
    pub nodes_freed: usize,
    pub masks_grabbed: usize,
    /// Highest simultaneous node count observed.
    pub peak_live: usize,
}
