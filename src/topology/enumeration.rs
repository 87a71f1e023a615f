//! The enumeration cycle: one cyclic singly linked list through every live node.
//!
//! The header keeps a single pointer, the *tail*. Traversal starts at the
//! node after the tail and stops after visiting the tail. New nodes are
//! spliced in right after the tail and become the new tail, so nodes
//! appear in the order they were spliced.

use super::arena::NodeArena;
use super::free_list::FreeList;
use super::mask::Mask;
use super::node::NodeLink;

#[inline]
pub(crate) fn cycle_next(arena: &NodeArena, slot: u32) -> u32 {
    match arena.slot(slot).link {
        NodeLink::Live(next) => next,
        other => unreachable!("slot {slot} walked as live but is {other:?}"),
    }
}

/// Tail pointer and length of the enumeration cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Enumeration {
    tail: Option<u32>,
    len: usize,
}

impl Enumeration {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn tail(&self) -> Option<u32> {
        self.tail
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tail.is_none()
    }

    /// The node after the tail, or `None` for an empty cycle.
    #[inline]
    pub fn first(&self, arena: &NodeArena) -> Option<u32> {
        self.tail.map(|t| cycle_next(arena, t))
    }

    /// The node after `slot`, or `None` when `slot` is the tail.
    #[inline]
    pub fn next(&self, arena: &NodeArena, slot: u32) -> Option<u32> {
        if Some(slot) == self.tail {
            None
        } else {
            Some(cycle_next(arena, slot))
        }
    }

    /// Merge the single unlinked node `slot` into the cycle after the tail
    /// and make it the tail.
    pub fn splice(&mut self, arena: &mut NodeArena, slot: u32) {
        let link = match self.tail {
            None => slot,
            Some(tail) => {
                let after = cycle_next(arena, tail);
                arena.slot_mut(tail).link = NodeLink::Live(slot);
                after
            }
        };
        arena.slot_mut(slot).link = NodeLink::Live(link);
        self.tail = Some(slot);
        self.len += 1;
    }

    /// Single pass over the cycle: every node carrying any bit of `doomed`
    /// is unlinked and pushed onto `free`; the survivors are re-linked in
    /// their original relative order. Returns the number of freed nodes.
    pub fn reclaim(&mut self, arena: &mut NodeArena, free: &mut FreeList, doomed: Mask) -> usize {
        let Some(tail) = self.tail else {
            return 0;
        };
        let mut head = None;
        let mut last: Option<u32> = None;
        let mut freed = 0;
        let mut cursor = cycle_next(arena, tail);
        loop {
            let slot = cursor;
            let next = cycle_next(arena, slot);
            if arena.slot(slot).mask.intersects(doomed) {
                free.push(arena, slot);
                freed += 1;
            } else {
                match last {
                    Some(prev) => arena.slot_mut(prev).link = NodeLink::Live(slot),
                    None => head = Some(slot),
                }
                last = Some(slot);
            }
            if slot == tail {
                break;
            }
            cursor = next;
        }
        self.tail = match (head, last) {
            (Some(head), Some(last)) => {
                arena.slot_mut(last).link = NodeLink::Live(head);
                Some(last)
            }
            _ => None,
        };
        self.len -= freed;
        freed
    }

    /// Forget the cycle. Slot states are left to the caller.
    pub fn clear(&mut self) {
        self.tail = None;
        self.len = 0;
    }

    /// Slots in enumeration order.
    pub fn iter<'a>(&self, arena: &'a NodeArena) -> CycleIter<'a> {
        CycleIter {
            arena,
            cursor: self.first(arena),
            tail: self.tail,
        }
    }
}

pub struct CycleIter<'a> {
    arena: &'a NodeArena,
    cursor: Option<u32>,
    tail: Option<u32>,
}

impl Iterator for CycleIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let slot = self.cursor?;
        self.cursor = if Some(slot) == self.tail {
            None
        } else {
            Some(cycle_next(self.arena, slot))
        };
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(n: usize) -> (NodeArena, FreeList, Enumeration) {
        let mut arena = NodeArena::new(0, None);
        let mut free = FreeList::new();
        let (_, run) = arena.allocate_block().unwrap();
        free.prepend_run(&mut arena, run);
        let mut cycle = Enumeration::new();
        for _ in 0..n {
            let slot = free.pop(&mut arena).unwrap();
            cycle.splice(&mut arena, slot);
        }
        (arena, free, cycle)
    }

    #[test]
    fn empty_cycle_has_no_first() {
        let (arena, _, cycle) = setup(0);
        assert_eq!(cycle.first(&arena), None);
        assert_eq!(cycle.iter(&arena).count(), 0);
    }

    #[test]
    fn single_node_is_its_own_cycle() {
        let (arena, _, cycle) = setup(1);
        assert_eq!(cycle.first(&arena), Some(0));
        assert_eq!(cycle.next(&arena, 0), None);
        assert_eq!(arena.slot(0).link(), NodeLink::Live(0));
    }

    #[test]
    fn splice_preserves_insertion_order() {
        let (arena, _, cycle) = setup(5);
        assert_eq!(cycle.iter(&arena).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert_eq!(cycle.tail(), Some(4));
        assert_eq!(cycle.len(), 5);
    }

    #[test]
    fn reclaim_keeps_survivor_order() {
        let (mut arena, mut free, mut cycle) = setup(6);
        let doomed = Mask::RULE_EDGE;
        for slot in [0, 3, 5] {
            arena.slot_mut(slot).mask = doomed;
        }
        let before = free.len();
        assert_eq!(cycle.reclaim(&mut arena, &mut free, doomed), 3);
        assert_eq!(cycle.iter(&arena).collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(cycle.tail(), Some(4));
        assert_eq!(cycle.len(), 3);
        assert_eq!(free.len(), before + 3);
        assert!(arena.slot(5).link().is_free());
    }

    #[test]
    fn reclaim_everything_empties_cycle() {
        let (mut arena, mut free, mut cycle) = setup(3);
        for slot in 0..3 {
            arena.slot_mut(slot).mask = Mask::NULL_FACE;
        }
        assert_eq!(cycle.reclaim(&mut arena, &mut free, Mask::NULL_FACE), 3);
        assert!(cycle.is_empty());
        assert_eq!(cycle.first(&arena), None);
    }
}
