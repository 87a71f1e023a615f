//! Singly linked list of unused node slots, threaded through [`NodeLink::Free`].

use super::arena::{FreeRun, NodeArena};
use super::node::NodeLink;

/// Head of the free list plus its length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FreeList {
    head: Option<u32>,
    len: usize,
}

impl FreeList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn head(&self) -> Option<u32> {
        self.head
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Prepend a freshly formatted block run.
    pub fn prepend_run(&mut self, arena: &mut NodeArena, run: FreeRun) {
        arena.slot_mut(run.tail).link = NodeLink::Free(self.head);
        self.head = Some(run.head);
        self.len += run.len;
    }

    /// Pop the head slot. The slot comes back in the `Unlinked` state with
    /// its other fields untouched.
    pub fn pop(&mut self, arena: &mut NodeArena) -> Option<u32> {
        let slot = self.head?;
        let node = arena.slot_mut(slot);
        let NodeLink::Free(next) = node.link else {
            unreachable!("free list head {slot} is not free: {:?}", node.link);
        };
        node.link = NodeLink::Unlinked;
        self.head = next;
        self.len -= 1;
        Some(slot)
    }

    /// Push `slot` and retire every handle issued for it.
    ///
    /// The caller has already removed the node from the enumeration cycle
    /// and from every rotation loop.
    pub fn push(&mut self, arena: &mut NodeArena, slot: u32) {
        let node = arena.slot_mut(slot);
        node.generation = node.generation.wrapping_add(1);
        node.link = NodeLink::Free(self.head);
        self.head = Some(slot);
        self.len += 1;
    }

    /// Forget every entry. Slot states are left to the caller.
    pub fn clear(&mut self) {
        self.head = None;
        self.len = 0;
    }

    /// Walk the list from the head. Stops early on a non-free slot, which
    /// [`DebugInvariants`](crate::DebugInvariants) reports as corruption.
    pub fn iter<'a>(&self, arena: &'a NodeArena) -> FreeIter<'a> {
        FreeIter {
            arena,
            cursor: self.head,
        }
    }
}

/// Iterator over free slots, head first.
pub struct FreeIter<'a> {
    arena: &'a NodeArena,
    cursor: Option<u32>,
}

impl Iterator for FreeIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let slot = self.cursor?;
        self.cursor = match self.arena.get(slot).map(|n| n.link) {
            Some(NodeLink::Free(next)) => next,
            _ => None,
        };
        Some(slot)
    }
}
