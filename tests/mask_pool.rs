use proptest::prelude::*;

use vu_graph::prelude::*;

#[test]
fn every_pool_mask_can_be_held_at_once() {
    let mut g = VuGraph::new(0);
    let held: Vec<Mask> = (0..MaskPool::CAPACITY).map(|_| g.grab_mask()).collect();
    assert_eq!(g.available_masks(), 0);
    let union = held.iter().fold(Mask::NONE, |acc, &m| acc | m);
    assert_eq!(union, Mask::POOL_BITS);
    for m in held.into_iter().rev() {
        g.drop_mask(m);
    }
    g.free_graph();
}

#[test]
#[should_panic(expected = "[contract] mask pool exhausted")]
fn one_grab_too_many_is_fatal() {
    let mut g = VuGraph::new(0);
    for _ in 0..=MaskPool::CAPACITY {
        g.grab_mask();
    }
}

#[test]
#[should_panic(expected = "was not borrowed")]
fn dropping_an_ungranted_mask_is_fatal() {
    let mut g = VuGraph::new(0);
    let m = g.grab_mask();
    g.drop_mask(m);
    g.drop_mask(m);
}

#[test]
#[should_panic(expected = "mask(s) still borrowed")]
fn reinitialize_with_borrowed_mask_is_fatal() {
    let mut g = VuGraph::new(0);
    g.grab_mask();
    g.reinitialize();
}

proptest! {
    /// Balanced grab/drop sequences always return the pool to full.
    #[test]
    fn balanced_sequences_conserve_the_pool(ops in proptest::collection::vec(any::<bool>(), 0..200)) {
        let mut g = VuGraph::new(0);
        let mut held = Vec::new();
        for grab in ops {
            if grab && held.len() < MaskPool::CAPACITY {
                held.push(g.grab_mask());
            } else if let Some(m) = held.pop() {
                g.drop_mask(m);
            }
            prop_assert_eq!(g.available_masks() + held.len(), MaskPool::CAPACITY);
        }
        while let Some(m) = held.pop() {
            g.drop_mask(m);
        }
        prop_assert_eq!(g.available_masks(), MaskPool::CAPACITY);
        g.free_graph();
    }
}
