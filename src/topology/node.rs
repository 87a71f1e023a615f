//! `NodeId` and `VuNode`: handles and records for rotation-graph nodes.
//!
//! Every node lives in a slot of the graph's [`NodeArena`](super::arena::NodeArena).
//! A [`NodeId`] names the slot *and* the generation the slot had when the
//! handle was issued. Slots bump their generation each time their node goes
//! back to the free list, so a handle kept past the node's deletion is
//! detected instead of silently aliasing whatever node reuses the slot.
//!
//! This module provides:
//! - [`NodeId`], a `Copy` 8-byte handle.
//! - [`NodeLink`], the explicit state of a slot's enumeration link.
//! - [`VuNode`], the fixed part of a node record.

use std::fmt;

use super::mask::Mask;

/// Generation-checked handle to a node of one graph.
///
/// # Memory layout
/// Two `u32`s; the type is the same size as a `u64`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId {
    slot: u32,
    generation: u32,
}

impl NodeId {
    #[inline]
    pub(crate) const fn new(slot: u32, generation: u32) -> Self {
        NodeId { slot, generation }
    }

    /// Arena slot index of this handle.
    #[inline]
    pub const fn slot(self) -> u32 {
        self.slot
    }

    /// Generation of the slot when this handle was issued.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId")
            .field(&self.slot)
            .field(&self.generation)
            .finish()
    }
}

/// Prints `slot@generation`.
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.slot, self.generation)
    }
}

/// State of a slot's enumeration link.
///
/// A free node threads the linear free list, a live node threads the
/// enumeration cycle; `Unlinked` is the transient state between
/// allocation and splicing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeLink {
    /// In the free list; the payload is the next free slot.
    Free(Option<u32>),
    /// Allocated but not yet spliced into the enumeration cycle.
    Unlinked,
    /// In the enumeration cycle; the payload is the next live slot.
    Live(u32),
}

impl NodeLink {
    #[inline]
    pub fn is_free(self) -> bool {
        matches!(self, NodeLink::Free(_))
    }

    #[inline]
    pub fn is_live(self) -> bool {
        matches!(self, NodeLink::Live(_))
    }
}

/// Fixed fields of a node record.
///
/// The per-graph extra byte region is stored beside the record in the
/// owning block, not inline.
#[derive(Clone, Debug)]
pub struct VuNode {
    pub(crate) link: NodeLink,
    pub(crate) generation: u32,
    /// Next node around the face.
    pub(crate) fsucc: NodeId,
    /// Next node around the vertex.
    pub(crate) vsucc: NodeId,
    pub(crate) mask: Mask,
    pub(crate) id: u32,
    pub(crate) user_data: isize,
    pub(crate) user_int: i32,
}

impl VuNode {
    /// A freshly formatted slot: free, generation 0, rotation loops on itself.
    pub(crate) fn formatted(slot: u32, next_free: Option<u32>) -> Self {
        let me = NodeId::new(slot, 0);
        VuNode {
            link: NodeLink::Free(next_free),
            generation: 0,
            fsucc: me,
            vsucc: me,
            mask: Mask::NONE,
            id: 0,
            user_data: 0,
            user_int: 0,
        }
    }

    /// Reset every field but the generation to the cleared state.
    pub(crate) fn clear(&mut self, me: NodeId) {
        self.link = NodeLink::Unlinked;
        self.fsucc = me;
        self.vsucc = me;
        self.mask = Mask::NONE;
        self.id = 0;
        self.user_data = 0;
        self.user_int = 0;
    }

    #[inline]
    pub fn link(&self) -> NodeLink {
        self.link
    }

    #[inline]
    pub fn fsucc(&self) -> NodeId {
        self.fsucc
    }

    #[inline]
    pub fn vsucc(&self) -> NodeId {
        self.vsucc
    }

    #[inline]
    pub fn mask(&self) -> Mask {
        self.mask
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn user_data(&self) -> isize {
        self.user_data
    }

    #[inline]
    pub fn user_int(&self) -> i32 {
        self.user_int
    }
}
