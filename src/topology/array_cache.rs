//! Reusable node arrays lent to algorithms for scratch work.
//!
//! Like masks, arrays are borrowed and must be returned; the graph refuses
//! to tear down or reinitialize while any array is out.

use crate::mesh_error::{ContractViolation, fatal};

use super::node::NodeId;

#[derive(Clone, Debug, Default)]
pub struct ArrayCache {
    spare: Vec<Vec<NodeId>>,
    outstanding: usize,
}

impl ArrayCache {
    /// Spare arrays kept beyond this are dropped on return.
    pub const MAX_SPARE: usize = 16;

    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out an empty array, reusing a returned one when available.
    pub fn grab(&mut self) -> Vec<NodeId> {
        self.outstanding += 1;
        self.spare.pop().unwrap_or_default()
    }

    /// Take an array back.
    ///
    /// # Panics
    /// With [`ContractViolation::ArrayNotGranted`] if no array is out.
    pub fn drop_array(&mut self, mut array: Vec<NodeId>) {
        if self.outstanding == 0 {
            fatal(ContractViolation::ArrayNotGranted);
        }
        self.outstanding -= 1;
        if self.spare.len() < Self::MAX_SPARE {
            array.clear();
            self.spare.push(array);
        }
    }

    #[inline]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returned_arrays_are_reused_empty() {
        let mut cache = ArrayCache::new();
        let mut a = cache.grab();
        a.push(NodeId::new(1, 0));
        let cap = a.capacity();
        cache.drop_array(a);
        let b = cache.grab();
        assert!(b.is_empty());
        assert_eq!(b.capacity(), cap);
        assert_eq!(cache.outstanding(), 1);
        cache.drop_array(b);
        assert_eq!(cache.outstanding(), 0);
    }

    #[test]
    #[should_panic(expected = "none is grabbed")]
    fn unbalanced_return_is_fatal() {
        let mut cache = ArrayCache::new();
        cache.drop_array(Vec::new());
    }
}
