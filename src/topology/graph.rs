//! `VuGraph`: the graph header owning arena, free list, enumeration cycle and mask pool.
//!
//! Nodes are created with [`VuGraph::allocate_node`] (raw, unlinked) or
//! [`VuGraph::new_vertex_use`] / [`VuGraph::make_pair`] (numbered, spliced
//! into the enumeration cycle). Rotation links are rewired only through
//! [`VuGraph::vertex_twist`], which preserves the mate relation
//! `edge_mate(n) == vsucc(fsucc(n))` for every node.
//!
//! Handles are checked on every access; a handle to a freed node is a
//! contract violation.

use bytemuck::Pod;
use hashbrown::HashSet;
use itertools::Itertools;

use crate::config::GraphConfig;
use crate::debug_invariants::{DebugInvariants, INVARIANTS_ENABLED};
use crate::mesh_error::{ContractViolation, MeshError, fatal};

use super::arena::NodeArena;
use super::array_cache::ArrayCache;
use super::enumeration::{CycleIter, Enumeration, cycle_next};
use super::free_list::FreeList;
use super::mask::{Mask, MaskPool};
use super::node::{NodeId, NodeLink, VuNode};
use super::primitive::{Periods, PrimitiveData};
use super::stats::GraphStats;

/// A rotation-system graph and the storage of all its nodes.
#[derive(Debug)]
pub struct VuGraph {
    pub(crate) config: GraphConfig,
    pub(crate) arena: NodeArena,
    pub(crate) free: FreeList,
    pub(crate) cycle: Enumeration,
    pub(crate) masks: MaskPool,
    pub(crate) arrays: ArrayCache,
    pub(crate) primitive: PrimitiveData,
    pub(crate) next_id: u32,
    /// Nodes not in the free list (live plus transiently unlinked).
    pub(crate) node_count: usize,
    pub(crate) stats: GraphStats,
}

impl VuGraph {
    /// An empty graph whose nodes carry `extra_bytes_per_node` bytes of
    /// application data. No memory is allocated until the first node.
    pub fn new(extra_bytes_per_node: usize) -> Self {
        Self::with_config(GraphConfig::new(extra_bytes_per_node))
    }

    pub fn with_config(config: GraphConfig) -> Self {
        VuGraph {
            arena: NodeArena::new(config.extra_bytes_per_node, config.max_blocks),
            config,
            free: FreeList::new(),
            cycle: Enumeration::new(),
            masks: MaskPool::new(),
            arrays: ArrayCache::new(),
            primitive: PrimitiveData::default(),
            next_id: 0,
            node_count: 0,
            stats: GraphStats::default(),
        }
    }

    /// Tear the graph down, releasing every arena block.
    ///
    /// # Panics
    /// With [`ContractViolation::LeakedMasks`] or
    /// [`ContractViolation::LeakedArrays`] if anything borrowed from the
    /// graph was not returned.
    pub fn free_graph(mut self) {
        self.check_all_returned();
        self.arena.release_all();
    }

    /// Reset to an empty graph, keeping the arena blocks for reuse.
    ///
    /// Every outstanding node handle becomes stale.
    ///
    /// # Panics
    /// As [`free_graph`](Self::free_graph) when masks or arrays are still out.
    pub fn reinitialize(&mut self) {
        self.check_all_returned();
        self.free.clear();
        for slot in (0..self.arena.slot_count() as u32).rev() {
            self.free.push(&mut self.arena, slot);
        }
        self.cycle.clear();
        self.stats.nodes_freed += self.node_count;
        self.node_count = 0;
        self.next_id = 0;
        log::debug!(
            "vu graph: reinitialized, {} slot(s) retained in {} block(s)",
            self.free.len(),
            self.arena.block_count()
        );
    }

    fn check_all_returned(&self) {
        if !self.masks.is_full() {
            fatal(ContractViolation::LeakedMasks {
                outstanding: self.masks.outstanding(),
            });
        }
        if self.arrays.outstanding() > 0 {
            fatal(ContractViolation::LeakedArrays {
                outstanding: self.arrays.outstanding(),
            });
        }
    }

    // ---------------------------------------------------------------------
    // Allocation front end
    // ---------------------------------------------------------------------

    /// Make sure at least `n` nodes can be allocated without touching the
    /// host allocator.
    pub fn reserve_nodes(&mut self, n: usize) -> Result<(), MeshError> {
        while self.free.len() < n {
            self.grow()?;
        }
        Ok(())
    }

    fn grow(&mut self) -> Result<(), MeshError> {
        let (_, run) = self.arena.allocate_block()?;
        self.free.prepend_run(&mut self.arena, run);
        self.stats.blocks_allocated += 1;
        Ok(())
    }

    /// Take a cleared node from the free list, growing the arena by one
    /// block if the list is empty.
    ///
    /// The node is *not* in the enumeration cycle; pass it to
    /// [`splice_new_node`](Self::splice_new_node) or give it back with
    /// [`return_to_free_list`](Self::return_to_free_list).
    pub fn allocate_node(&mut self) -> Result<NodeId, MeshError> {
        if self.free.is_empty() {
            self.grow()?;
        }
        let Some(slot) = self.free.pop(&mut self.arena) else {
            return Err(MeshError::FreeListCorrupted(
                "empty after block allocation".to_string(),
            ));
        };
        let node = self.arena.slot_mut(slot);
        let id = NodeId::new(slot, node.generation);
        if node.generation > 0 {
            self.stats.nodes_reused += 1;
        }
        node.clear(id);
        self.arena.extra_mut(slot).fill(0);

        self.node_count += 1;
        self.stats.nodes_allocated += 1;
        self.stats.peak_live = self.stats.peak_live.max(self.node_count);
        Ok(id)
    }

    /// Give an unlinked node back to the free list. Its handle becomes stale.
    ///
    /// Rotation links are not inspected; the caller guarantees no other
    /// node refers to this one.
    ///
    /// # Panics
    /// With [`ContractViolation::NodeStillLinked`] if the node is in the
    /// enumeration cycle, [`ContractViolation::StaleHandle`] if it is
    /// already free.
    pub fn return_to_free_list(&mut self, id: NodeId) {
        if self.node(id).link.is_live() {
            fatal(ContractViolation::NodeStillLinked(id));
        }
        self.free.push(&mut self.arena, id.slot());
        self.node_count -= 1;
        self.stats.nodes_freed += 1;
    }

    /// Append an unlinked node to the enumeration cycle, after the current tail.
    ///
    /// # Panics
    /// With [`ContractViolation::NodeAlreadyLinked`] if the node is live.
    pub fn splice_new_node(&mut self, id: NodeId) {
        if self.node(id).link != NodeLink::Unlinked {
            fatal(ContractViolation::NodeAlreadyLinked(id));
        }
        self.cycle.splice(&mut self.arena, id.slot());
    }

    /// Allocate a numbered node with default payload, spliced into the
    /// cycle, forming its own face and vertex loop.
    pub fn new_vertex_use(&mut self) -> Result<NodeId, MeshError> {
        let id = self.allocate_node()?;
        let node = self.arena.slot_mut(id.slot());
        node.id = self.next_id;
        node.user_data = self.primitive.default_user_data;
        node.user_int = self.primitive.default_user_int;
        self.next_id += 1;
        self.cycle.splice(&mut self.arena, id.slot());
        Ok(id)
    }

    /// Create an isolated edge: two nodes that are each other's face
    /// successor and edge mate, each alone around its vertex.
    ///
    /// The two nodes get consecutive ids and are adjacent in enumeration
    /// order. Either both are created or neither is.
    pub fn make_pair(&mut self) -> Result<(NodeId, NodeId), MeshError> {
        self.reserve_nodes(2)?;
        let first_id = self.next_id;
        let a = self.new_vertex_use()?;
        let b = self.new_vertex_use()?;
        self.node_mut(a).fsucc = b;
        self.node_mut(b).fsucc = a;
        if INVARIANTS_ENABLED {
            self.check_pair_enumeration(a, b, first_id);
        }
        Ok((a, b))
    }

    fn check_pair_enumeration(&self, a: NodeId, b: NodeId, first_id: u32) {
        let found_a = self.node(a).id;
        if found_a != first_id {
            fatal(ContractViolation::EnumerationCorrupted {
                expected: first_id,
                found: found_a,
            });
        }
        let after_a = cycle_next(&self.arena, a.slot());
        let found_b = self.arena.slot(after_a).id;
        if after_a != b.slot()
            || self.cycle.tail() != Some(b.slot())
            || found_b != first_id + 1
        {
            fatal(ContractViolation::EnumerationCorrupted {
                expected: first_id + 1,
                found: found_b,
            });
        }
    }

    // ---------------------------------------------------------------------
    // Enumeration
    // ---------------------------------------------------------------------

    #[inline]
    fn handle(&self, slot: u32) -> NodeId {
        NodeId::new(slot, self.arena.slot(slot).generation)
    }

    /// First node of the enumeration, `None` for an empty graph.
    pub fn first_node(&self) -> Option<NodeId> {
        self.cycle.first(&self.arena).map(|s| self.handle(s))
    }

    /// Node after `id` in the enumeration; `None` after the last one, and
    /// for a node not yet spliced into the cycle.
    pub fn next_node(&self, id: NodeId) -> Option<NodeId> {
        if !self.node(id).link.is_live() {
            return None;
        }
        self.cycle.next(&self.arena, id.slot()).map(|s| self.handle(s))
    }

    /// Iterate the live nodes in enumeration order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            graph: self,
            inner: self.cycle.iter(&self.arena),
        }
    }

    /// Number of nodes handed out and not yet freed.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of nodes in the enumeration cycle.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.cycle.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node_count == 0
    }

    #[inline]
    pub fn block_count(&self) -> usize {
        self.arena.block_count()
    }

    /// Nodes available without growing the arena.
    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    #[inline]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    #[inline]
    pub fn extra_bytes_per_node(&self) -> usize {
        self.arena.extra_bytes_per_node()
    }

    // ---------------------------------------------------------------------
    // Node access
    // ---------------------------------------------------------------------

    /// The node named by `id`, or [`MeshError::StaleHandle`].
    pub fn try_node(&self, id: NodeId) -> Result<&VuNode, MeshError> {
        match self.arena.get(id.slot()) {
            Some(node) if node.generation == id.generation() && !node.link.is_free() => Ok(node),
            _ => Err(MeshError::StaleHandle(id)),
        }
    }

    /// True if `id` names a node that has not been freed.
    pub fn contains(&self, id: NodeId) -> bool {
        self.try_node(id).is_ok()
    }

    /// The node named by `id`.
    ///
    /// # Panics
    /// With [`ContractViolation::StaleHandle`] if the node was freed.
    pub fn node(&self, id: NodeId) -> &VuNode {
        match self.try_node(id) {
            Ok(node) => node,
            Err(_) => fatal(ContractViolation::StaleHandle(id)),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut VuNode {
        if self.try_node(id).is_err() {
            fatal(ContractViolation::StaleHandle(id));
        }
        self.arena.slot_mut(id.slot())
    }

    #[inline]
    pub fn id(&self, node: NodeId) -> u32 {
        self.node(node).id
    }

    #[inline]
    pub fn user_data(&self, node: NodeId) -> isize {
        self.node(node).user_data
    }

    /// Set `user_data`, returning the previous value.
    pub fn set_user_data(&mut self, node: NodeId, value: isize) -> isize {
        std::mem::replace(&mut self.node_mut(node).user_data, value)
    }

    #[inline]
    pub fn user_int(&self, node: NodeId) -> i32 {
        self.node(node).user_int
    }

    /// Set `user_int`, returning the previous value.
    pub fn set_user_int(&mut self, node: NodeId, value: i32) -> i32 {
        std::mem::replace(&mut self.node_mut(node).user_int, value)
    }

    /// The node's extra byte region.
    pub fn extra(&self, node: NodeId) -> &[u8] {
        self.node(node);
        self.arena.extra(node.slot())
    }

    pub fn extra_mut(&mut self, node: NodeId) -> &mut [u8] {
        self.node(node);
        self.arena.extra_mut(node.slot())
    }

    /// Read a plain-old-data value from the start of the extra region.
    pub fn read_extra<T: Pod>(&self, node: NodeId) -> Result<T, MeshError> {
        let needed = std::mem::size_of::<T>();
        let bytes = self.extra(node);
        if needed > bytes.len() {
            return Err(MeshError::ExtraRegionTooSmall {
                needed,
                available: bytes.len(),
            });
        }
        Ok(bytemuck::pod_read_unaligned(&bytes[..needed]))
    }

    /// Write a plain-old-data value to the start of the extra region.
    pub fn write_extra<T: Pod>(&mut self, node: NodeId, value: &T) -> Result<(), MeshError> {
        let src = bytemuck::bytes_of(value);
        let dst = self.extra_mut(node);
        if src.len() > dst.len() {
            return Err(MeshError::ExtraRegionTooSmall {
                needed: src.len(),
                available: dst.len(),
            });
        }
        dst[..src.len()].copy_from_slice(src);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Masks
    // ---------------------------------------------------------------------

    #[inline]
    pub fn mask(&self, node: NodeId) -> Mask {
        self.node(node).mask
    }

    /// True if any bit of `mask` is set on the node.
    #[inline]
    pub fn has_mask(&self, node: NodeId, mask: Mask) -> bool {
        self.node(node).mask.intersects(mask)
    }

    #[inline]
    pub fn set_mask(&mut self, node: NodeId, mask: Mask) {
        self.node_mut(node).mask |= mask;
    }

    #[inline]
    pub fn clear_mask(&mut self, node: NodeId, mask: Mask) {
        let n = self.node_mut(node);
        n.mask = n.mask & !mask;
    }

    /// Flip the node between having and not having `mask`.
    pub fn toggle_mask(&mut self, node: NodeId, mask: Mask) {
        if self.has_mask(node, mask) {
            self.clear_mask(node, mask);
        } else {
            self.set_mask(node, mask);
        }
    }

    /// Set `mask` on every live node.
    pub fn set_mask_in_all(&mut self, mask: Mask) {
        let mut cursor = self.cycle.first(&self.arena);
        while let Some(slot) = cursor {
            self.arena.slot_mut(slot).mask |= mask;
            cursor = self.cycle.next(&self.arena, slot);
        }
    }

    /// Clear `mask` on every live node.
    pub fn clear_mask_in_all(&mut self, mask: Mask) {
        let mut cursor = self.cycle.first(&self.arena);
        while let Some(slot) = cursor {
            let node = self.arena.slot_mut(slot);
            node.mask = node.mask & !mask;
            cursor = self.cycle.next(&self.arena, slot);
        }
    }

    /// Number of live nodes carrying any bit of `mask`.
    pub fn count_mask(&self, mask: Mask) -> usize {
        self.cycle
            .iter(&self.arena)
            .filter(|&s| self.arena.slot(s).mask.intersects(mask))
            .count()
    }

    /// Borrow a mask bit from the pool. Return it with [`drop_mask`](Self::drop_mask).
    ///
    /// # Panics
    /// With [`ContractViolation::MaskPoolExhausted`] if all
    /// [`MaskPool::CAPACITY`] bits are out.
    pub fn grab_mask(&mut self) -> Mask {
        self.stats.masks_grabbed += 1;
        self.masks.grab()
    }

    /// # Panics
    /// With [`ContractViolation::MaskNotGranted`] if `mask` is not borrowed.
    pub fn drop_mask(&mut self, mask: Mask) {
        self.masks.drop_mask(mask);
    }

    #[inline]
    pub fn available_masks(&self) -> usize {
        self.masks.available()
    }

    /// Borrow a scratch node array from the companion cache.
    pub fn grab_array(&mut self) -> Vec<NodeId> {
        self.arrays.grab()
    }

    pub fn drop_array(&mut self, array: Vec<NodeId>) {
        self.arrays.drop_array(array);
    }

    // ---------------------------------------------------------------------
    // Rotation system
    // ---------------------------------------------------------------------

    /// Next node around the face.
    #[inline]
    pub fn fsucc(&self, node: NodeId) -> NodeId {
        self.node(node).fsucc
    }

    /// Next node around the vertex.
    #[inline]
    pub fn vsucc(&self, node: NodeId) -> NodeId {
        self.node(node).vsucc
    }

    /// The node at the other end of the same edge.
    #[inline]
    pub fn edge_mate(&self, node: NodeId) -> NodeId {
        self.vsucc(self.fsucc(node))
    }

    /// Previous node around the face.
    #[inline]
    pub fn fpred(&self, node: NodeId) -> NodeId {
        self.edge_mate(self.vsucc(node))
    }

    /// Previous node around the vertex.
    #[inline]
    pub fn vpred(&self, node: NodeId) -> NodeId {
        self.fsucc(self.edge_mate(node))
    }

    /// Swap the vertex successors of `a` and `b`, repairing the face
    /// successors of their face predecessors so every edge keeps its mate.
    ///
    /// Two distinct vertex loops are joined; two nodes of one loop split it.
    pub fn vertex_twist(&mut self, a: NodeId, b: NodeId) {
        let pa = self.fpred(a);
        let pb = self.fpred(b);
        let va = self.vsucc(a);
        let vb = self.vsucc(b);
        self.node_mut(a).vsucc = vb;
        self.node_mut(b).vsucc = va;
        self.node_mut(pa).fsucc = b;
        self.node_mut(pb).fsucc = a;
    }

    /// Pull `node` out of its vertex loop into a loop of its own.
    pub(crate) fn detach_from_vertex(&mut self, node: NodeId) {
        if self.vsucc(node) != node {
            let prev = self.vpred(node);
            self.vertex_twist(node, prev);
        }
    }

    /// Unlink every live node carrying any bit of `doomed` and return it to
    /// the free list. Rotation links must already be cut.
    pub(crate) fn reclaim(&mut self, doomed: Mask) -> usize {
        let freed = self.cycle.reclaim(&mut self.arena, &mut self.free, doomed);
        self.node_count -= freed;
        self.stats.nodes_freed += freed;
        freed
    }

    // ---------------------------------------------------------------------
    // Primitive data
    // ---------------------------------------------------------------------

    #[inline]
    pub fn primitive_data(&self) -> &PrimitiveData {
        &self.primitive
    }

    #[inline]
    pub fn primitive_data_mut(&mut self) -> &mut PrimitiveData {
        &mut self.primitive
    }

    pub fn set_primitive_data(&mut self, data: PrimitiveData) {
        self.primitive = data;
    }

    pub fn set_tolerances(&mut self, abs_tol: f64, rel_tol: f64) {
        self.primitive.abs_tol = abs_tol;
        self.primitive.rel_tol = rel_tol;
    }

    /// `(abs_tol, rel_tol)`
    pub fn tolerances(&self) -> (f64, f64) {
        (self.primitive.abs_tol, self.primitive.rel_tol)
    }

    pub fn set_periods(&mut self, periods: Periods) {
        self.primitive.periods = periods;
    }

    pub fn periods(&self) -> Periods {
        self.primitive.periods
    }

    /// Payload given to every subsequently created vertex use.
    pub fn set_default_user_data(&mut self, user_data: isize, user_int: i32) {
        self.primitive.default_user_data = user_data;
        self.primitive.default_user_int = user_int;
    }
}

impl Drop for VuGraph {
    fn drop(&mut self) {
        if !self.masks.is_full() || self.arrays.outstanding() > 0 {
            log::warn!(
                "vu graph dropped with {} mask(s) and {} array(s) outstanding",
                self.masks.outstanding(),
                self.arrays.outstanding()
            );
        }
        self.arena.release_all();
    }
}

/// Live nodes in enumeration order.
pub struct Nodes<'a> {
    graph: &'a VuGraph,
    inner: CycleIter<'a>,
}

impl Iterator for Nodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.inner.next().map(|s| self.graph.handle(s))
    }
}

impl DebugInvariants for VuGraph {
    fn debug_assert_invariants(&self) {
        if let Err(e) = self.validate_invariants() {
            panic!("[invariants] vu graph: {e}");
        }
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        let slots = self.arena.slot_count();

        // Enumeration cycle: only live slots, each once, length matches.
        let mut visited = Vec::with_capacity(self.cycle.len());
        if let Some(tail) = self.cycle.tail() {
            let mut slot = tail;
            loop {
                let Some(NodeLink::Live(next)) = self.arena.get(slot).map(|n| n.link) else {
                    return Err(MeshError::CycleLengthMismatch {
                        expected: self.cycle.len(),
                        found: visited.len(),
                    });
                };
                slot = next;
                visited.push(slot);
                if slot == tail || visited.len() > slots {
                    break;
                }
            }
        }
        if visited.len() != self.cycle.len() || !visited.iter().all_unique() {
            return Err(MeshError::CycleLengthMismatch {
                expected: self.cycle.len(),
                found: visited.len(),
            });
        }

        // Free list: only free slots, disjoint from the cycle.
        let live: HashSet<u32> = visited.into_iter().collect();
        let mut free_seen = 0usize;
        for slot in self.free.iter(&self.arena) {
            free_seen += 1;
            if free_seen > slots {
                return Err(MeshError::FreeListCorrupted("free list does not terminate".into()));
            }
            match self.arena.get(slot).map(|n| n.link) {
                Some(NodeLink::Free(_)) if !live.contains(&slot) => {}
                other => {
                    return Err(MeshError::FreeListCorrupted(format!(
                        "slot {slot} in free list has state {other:?}"
                    )));
                }
            }
        }
        if free_seen != self.free.len() || free_seen + self.node_count != slots {
            return Err(MeshError::FreeListCorrupted(format!(
                "{free_seen} free + {} allocated != {slots} slots",
                self.node_count
            )));
        }

        self.masks.validate()
    }
}
