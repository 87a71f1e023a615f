//! Block arena backing every node of a graph.
//!
//! Nodes are never allocated one at a time. The arena grows by whole blocks
//! of [`BLOCK_COUNT`] slots, formats every slot of a new block into a linear
//! free run, and keeps the blocks until the whole arena is released. Slots
//! are addressed by a flat `u32` index: `block * BLOCK_COUNT + offset`.

use crate::mesh_error::MeshError;

use super::node::VuNode;

/// Number of node slots per block.
pub const BLOCK_COUNT: usize = 128;

/// Per-node extra byte regions are padded to a multiple of this.
pub const PAD_INCREMENT: usize = 8;

/// Size of the fixed part of a node record.
pub const BASE_NODE_SIZE: usize = std::mem::size_of::<VuNode>();

/// Round an extra byte count up to the padding increment.
#[inline]
pub const fn padded_extra(extra_bytes: usize) -> usize {
    extra_bytes.div_ceil(PAD_INCREMENT) * PAD_INCREMENT
}

/// Index of a block inside its arena, retained until release.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockHandle(usize);

impl BlockHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A freshly formatted block's slots, threaded `head -> ... -> tail -> None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FreeRun {
    pub head: u32,
    pub tail: u32,
    pub len: usize,
}

#[derive(Debug)]
struct Block {
    nodes: Vec<VuNode>,
    extra: Vec<u8>,
}

/// Owner of all node blocks of one graph.
#[derive(Debug)]
pub struct NodeArena {
    blocks: Vec<Block>,
    extra_bytes: usize,
    stride: usize,
    max_blocks: Option<usize>,
}

impl NodeArena {
    /// An empty arena; no block is allocated until the first request.
    pub fn new(extra_bytes_per_node: usize, max_blocks: Option<usize>) -> Self {
        NodeArena {
            blocks: Vec::new(),
            extra_bytes: extra_bytes_per_node,
            stride: padded_extra(extra_bytes_per_node),
            max_blocks,
        }
    }

    /// Bytes occupied by one node: the fixed record plus the padded extra region.
    #[inline]
    pub fn unit_size(&self) -> usize {
        BASE_NODE_SIZE + self.stride
    }

    #[inline]
    pub fn extra_bytes_per_node(&self) -> usize {
        self.extra_bytes
    }

    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of slots across all blocks.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.blocks.len() * BLOCK_COUNT
    }

    /// Allocate and format one block.
    ///
    /// Every slot of the block comes back zeroed and threaded into a linear
    /// free run. Failure to obtain memory (or reaching the configured block
    /// limit) is reported, never a panic.
    pub fn allocate_block(&mut self) -> Result<(BlockHandle, FreeRun), MeshError> {
        if let Some(max_blocks) = self.max_blocks {
            if self.blocks.len() >= max_blocks {
                return Err(MeshError::BlockLimitReached { max_blocks });
            }
        }
        let alloc_failed = || MeshError::AllocationFailed {
            requested_nodes: BLOCK_COUNT,
            blocks: self.blocks.len(),
        };
        let first = self.slot_count();
        if first + BLOCK_COUNT > u32::MAX as usize {
            return Err(alloc_failed());
        }

        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(BLOCK_COUNT)
            .map_err(|_| alloc_failed())?;
        let mut extra = Vec::new();
        extra
            .try_reserve_exact(BLOCK_COUNT * self.stride)
            .map_err(|_| alloc_failed())?;
        extra.resize(BLOCK_COUNT * self.stride, 0u8);

        let first = first as u32;
        let last = first + BLOCK_COUNT as u32 - 1;
        nodes.extend((first..=last).map(|slot| {
            let next = (slot < last).then_some(slot + 1);
            VuNode::formatted(slot, next)
        }));

        let handle = BlockHandle(self.blocks.len());
        self.blocks.push(Block { nodes, extra });
        log::debug!(
            "vu arena: block {} allocated ({} slots of {} bytes)",
            handle.0,
            BLOCK_COUNT,
            self.unit_size()
        );
        Ok((
            handle,
            FreeRun {
                head: first,
                tail: last,
                len: BLOCK_COUNT,
            },
        ))
    }

    /// Free every block. Returns how many blocks were released.
    pub fn release_all(&mut self) -> usize {
        let n = self.blocks.len();
        self.blocks.clear();
        self.blocks.shrink_to_fit();
        if n > 0 {
            log::debug!("vu arena: released {n} block(s)");
        }
        n
    }

    #[inline]
    fn locate(slot: u32) -> (usize, usize) {
        let slot = slot as usize;
        (slot / BLOCK_COUNT, slot % BLOCK_COUNT)
    }

    /// The node in `slot`, if the slot exists.
    #[inline]
    pub fn get(&self, slot: u32) -> Option<&VuNode> {
        let (b, o) = Self::locate(slot);
        self.blocks.get(b).map(|block| &block.nodes[o])
    }

    /// Slots handed to this method come from the arena's own links and
    /// are in range by construction.
    #[inline]
    pub(crate) fn slot(&self, slot: u32) -> &VuNode {
        let (b, o) = Self::locate(slot);
        &self.blocks[b].nodes[o]
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, slot: u32) -> &mut VuNode {
        let (b, o) = Self::locate(slot);
        &mut self.blocks[b].nodes[o]
    }

    /// The extra byte region of `slot` (exactly `extra_bytes_per_node` long).
    #[inline]
    pub fn extra(&self, slot: u32) -> &[u8] {
        let (b, o) = Self::locate(slot);
        let start = o * self.stride;
        &self.blocks[b].extra[start..start + self.extra_bytes]
    }

    #[inline]
    pub fn extra_mut(&mut self, slot: u32) -> &mut [u8] {
        let (b, o) = Self::locate(slot);
        let start = o * self.stride;
        &mut self.blocks[b].extra[start..start + self.extra_bytes]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::node::NodeLink;

    #[test]
    fn padding_rounds_up() {
        assert_eq!(padded_extra(0), 0);
        assert_eq!(padded_extra(1), PAD_INCREMENT);
        assert_eq!(padded_extra(PAD_INCREMENT), PAD_INCREMENT);
        assert_eq!(padded_extra(PAD_INCREMENT + 1), 2 * PAD_INCREMENT);
    }

    #[test]
    fn block_is_threaded_linear_run() {
        let mut arena = NodeArena::new(3, None);
        let (h, run) = arena.allocate_block().unwrap();
        assert_eq!(h.index(), 0);
        assert_eq!(run.head, 0);
        assert_eq!(run.tail, BLOCK_COUNT as u32 - 1);
        assert_eq!(run.len, BLOCK_COUNT);

        let mut cursor = Some(run.head);
        let mut seen = 0;
        while let Some(slot) = cursor {
            let NodeLink::Free(next) = arena.slot(slot).link() else {
                panic!("formatted slot {slot} is not free");
            };
            assert!(arena.extra(slot).iter().all(|&b| b == 0));
            assert_eq!(arena.extra(slot).len(), 3);
            seen += 1;
            cursor = next;
        }
        assert_eq!(seen, BLOCK_COUNT);
    }

    #[test]
    fn second_block_continues_slot_numbering() {
        let mut arena = NodeArena::new(0, None);
        arena.allocate_block().unwrap();
        let (h, run) = arena.allocate_block().unwrap();
        assert_eq!(h.index(), 1);
        assert_eq!(run.head, BLOCK_COUNT as u32);
        assert_eq!(arena.slot_count(), 2 * BLOCK_COUNT);
        assert!(arena.get(run.tail).is_some());
        assert!(arena.get(run.tail + 1).is_none());
    }

    #[test]
    fn block_limit_is_recoverable() {
        let mut arena = NodeArena::new(0, Some(1));
        arena.allocate_block().unwrap();
        assert_eq!(
            arena.allocate_block().unwrap_err(),
            MeshError::BlockLimitReached { max_blocks: 1 }
        );
        assert_eq!(arena.block_count(), 1);
    }

    #[test]
    fn extra_regions_do_not_overlap() {
        let mut arena = NodeArena::new(5, None);
        arena.allocate_block().unwrap();
        arena.extra_mut(0).copy_from_slice(&[1, 2, 3, 4, 5]);
        arena.extra_mut(1).copy_from_slice(&[9; 5]);
        assert_eq!(arena.extra(0), &[1, 2, 3, 4, 5]);
        assert_eq!(arena.extra(1), &[9; 5]);
        assert_eq!(arena.unit_size(), BASE_NODE_SIZE + PAD_INCREMENT);
    }

    #[test]
    fn release_all_drops_blocks() {
        let mut arena = NodeArena::new(0, None);
        arena.allocate_block().unwrap();
        arena.allocate_block().unwrap();
        assert_eq!(arena.release_all(), 2);
        assert_eq!(arena.block_count(), 0);
        assert!(arena.get(0).is_none());
    }
}
