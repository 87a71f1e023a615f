use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use vu_graph::prelude::*;

/// Random rotation graph: `edges` isolated edges wired together by
/// `twists` random vertex twists. Twists keep every edge's mate intact.
fn random_graph(seed: u64, edges: usize, twists: usize) -> (VuGraph, Vec<NodeId>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut g = VuGraph::new(0);
    let mut nodes = Vec::with_capacity(2 * edges);
    for _ in 0..edges {
        let (a, b) = g.make_pair().unwrap();
        nodes.push(a);
        nodes.push(b);
    }
    for _ in 0..twists {
        let a = nodes[rng.gen_range(0..nodes.len())];
        let b = nodes[rng.gen_range(0..nodes.len())];
        g.vertex_twist(a, b);
    }
    (g, nodes)
}

fn assert_rotation_consistent(g: &VuGraph) {
    for n in g.nodes() {
        assert_eq!(g.fsucc(g.fpred(n)), n);
        assert_eq!(g.vsucc(g.vpred(n)), n);
        assert_eq!(g.edge_mate(g.edge_mate(n)), n);
        assert_ne!(g.edge_mate(n), n);
    }
}

#[test]
fn seeded_random_deletions() {
    for seed in 0..50u64 {
        let (mut g, nodes) = random_graph(seed, 40, 120);
        assert_rotation_consistent(&g);
        let mut rng = SmallRng::seed_from_u64(seed ^ 0xA5A5);
        let m = g.grab_mask();
        let mut doomed = HashSet::new();
        for &n in &nodes {
            if rng.gen_bool(0.25) {
                g.set_mask(n, m);
                doomed.insert(n);
                doomed.insert(g.edge_mate(n));
            }
        }
        let before = g.node_count();
        assert_eq!(free_marked_edges(&mut g, m), doomed.len());
        g.drop_mask(m);

        assert_eq!(g.node_count(), before - doomed.len());
        assert_eq!(g.nodes().count(), g.node_count());
        for n in g.nodes() {
            assert!(!doomed.contains(&n));
            assert!(!doomed.contains(&g.fsucc(n)));
            assert!(!doomed.contains(&g.vsucc(n)));
        }
        for n in &doomed {
            assert!(!g.contains(*n));
        }
        assert_rotation_consistent(&g);
        g.validate_invariants().unwrap();
        g.free_graph();
    }
}

proptest! {
    #[test]
    fn marked_and_nonmarked_partition_the_edges(
        seed in any::<u64>(),
        edges in 1usize..60,
        twists in 0usize..150,
        ratio in 0.0f64..1.0,
    ) {
        let (g, nodes) = random_graph(seed, edges, twists);
        let mut rng = SmallRng::seed_from_u64(seed.rotate_left(7));
        let marked: Vec<NodeId> = nodes.iter().copied().filter(|_| rng.gen_bool(ratio)).collect();

        // Edges touched by the marking, identified by their lower-slot node.
        let edge_key = |g: &VuGraph, n: NodeId| n.slot().min(g.edge_mate(n).slot());
        let touched: HashSet<u32> = marked.iter().map(|&n| edge_key(&g, n)).collect();

        let mut kept = vu_graph::algs::deep_copy(None, &g).unwrap();
        let mut removed = vu_graph::algs::deep_copy(None, &g).unwrap();

        // Mark the same nodes (by enumeration position) in both copies.
        let position: Vec<NodeId> = g.nodes().collect();
        let marked_pos: HashSet<usize> = marked
            .iter()
            .map(|m| position.iter().position(|p| p == m).unwrap())
            .collect();
        for (copy, tag) in [(&mut kept, Mask::RULE_EDGE), (&mut removed, Mask::RULE_EDGE)] {
            let list: Vec<NodeId> = copy.nodes().collect();
            for &i in &marked_pos {
                copy.set_mask(list[i], tag);
            }
        }

        let freed_marked = free_marked_edges(&mut removed, Mask::RULE_EDGE);
        let freed_other = free_nonmarked_edges(&mut kept, Mask::RULE_EDGE);
        prop_assert_eq!(freed_marked, 2 * touched.len());
        prop_assert_eq!(removed.node_count(), g.node_count() - freed_marked);
        prop_assert!(freed_other <= g.node_count());
        prop_assert!(removed.validate_invariants().is_ok());
        prop_assert!(kept.validate_invariants().is_ok());
        prop_assert_eq!(removed.available_masks(), MaskPool::CAPACITY);
        prop_assert_eq!(kept.available_masks(), MaskPool::CAPACITY);

        // Every surviving edge of the complement deletion has both sides marked.
        for n in kept.nodes() {
            prop_assert!(kept.has_mask(n, Mask::RULE_EDGE));
            prop_assert!(kept.has_mask(kept.edge_mate(n), Mask::RULE_EDGE));
        }
        assert_rotation_consistent(&removed);
        assert_rotation_consistent(&kept);
    }
}
