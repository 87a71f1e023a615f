//! Walking and marking the face and vertex loops around a node.

use super::graph::VuGraph;
use super::mask::Mask;
use super::node::{NodeId, VuNode};

/// Which rotation a loop follows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopKind {
    Face,
    Vertex,
    /// Around the face against its orientation, following `fpred`.
    ReverseFace,
    /// Around the vertex following `vpred`.
    ReverseVertex,
}

/// Nodes of one loop, starting at the seed.
pub struct LoopIter<'a> {
    graph: &'a VuGraph,
    kind: LoopKind,
    seed: NodeId,
    cursor: Option<NodeId>,
}

impl Iterator for LoopIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.cursor?;
        let next = self.graph.loop_step(node, self.kind);
        self.cursor = (next != self.seed).then_some(next);
        Some(node)
    }
}

impl VuGraph {
    #[inline]
    fn loop_step(&self, node: NodeId, kind: LoopKind) -> NodeId {
        match kind {
            LoopKind::Face => self.fsucc(node),
            LoopKind::Vertex => self.vsucc(node),
            LoopKind::ReverseFace => self.fpred(node),
            LoopKind::ReverseVertex => self.vpred(node),
        }
    }

    pub fn loop_iter(&self, seed: NodeId, kind: LoopKind) -> LoopIter<'_> {
        LoopIter {
            graph: self,
            kind,
            seed,
            cursor: Some(seed),
        }
    }

    /// Nodes around the vertex of `seed`, following `vsucc`.
    pub fn vertex_loop(&self, seed: NodeId) -> LoopIter<'_> {
        self.loop_iter(seed, LoopKind::Vertex)
    }

    /// Nodes around the face of `seed`, following `fsucc`.
    pub fn face_loop(&self, seed: NodeId) -> LoopIter<'_> {
        self.loop_iter(seed, LoopKind::Face)
    }

    fn update_around(&mut self, seed: NodeId, kind: LoopKind, mut f: impl FnMut(&mut VuNode)) {
        let mut node = seed;
        loop {
            let next = self.loop_step(node, kind);
            f(self.node_mut(node));
            node = next;
            if node == seed {
                break;
            }
        }
    }

    pub fn set_mask_around_vertex(&mut self, seed: NodeId, mask: Mask) {
        self.update_around(seed, LoopKind::Vertex, |n| n.mask |= mask);
    }

    pub fn clear_mask_around_vertex(&mut self, seed: NodeId, mask: Mask) {
        self.update_around(seed, LoopKind::Vertex, |n| n.mask = n.mask & !mask);
    }

    pub fn set_mask_around_face(&mut self, seed: NodeId, mask: Mask) {
        self.update_around(seed, LoopKind::Face, |n| n.mask |= mask);
    }

    pub fn clear_mask_around_face(&mut self, seed: NodeId, mask: Mask) {
        self.update_around(seed, LoopKind::Face, |n| n.mask = n.mask & !mask);
    }

    /// Set `mask` on `node` and its edge mate.
    pub fn set_mask_around_edge(&mut self, node: NodeId, mask: Mask) {
        let mate = self.edge_mate(node);
        self.set_mask(node, mask);
        self.set_mask(mate, mask);
    }

    pub fn clear_mask_around_edge(&mut self, node: NodeId, mask: Mask) {
        let mate = self.edge_mate(node);
        self.clear_mask(node, mask);
        self.clear_mask(mate, mask);
    }

    pub fn set_user_int_around_vertex(&mut self, seed: NodeId, value: i32) {
        self.update_around(seed, LoopKind::Vertex, |n| n.user_int = value);
    }

    pub fn set_user_int_around_face(&mut self, seed: NodeId, value: i32) {
        self.update_around(seed, LoopKind::Face, |n| n.user_int = value);
    }

    pub fn count_mask_around_vertex(&self, seed: NodeId, mask: Mask) -> usize {
        self.vertex_loop(seed)
            .filter(|&n| self.has_mask(n, mask))
            .count()
    }

    pub fn count_mask_around_face(&self, seed: NodeId, mask: Mask) -> usize {
        self.face_loop(seed).filter(|&n| self.has_mask(n, mask)).count()
    }

    /// First node around the vertex (starting at `seed`) carrying `mask`.
    pub fn find_mask_around_vertex(&self, seed: NodeId, mask: Mask) -> Option<NodeId> {
        self.vertex_loop(seed).find(|&n| self.has_mask(n, mask))
    }

    pub fn find_mask_around_face(&self, seed: NodeId, mask: Mask) -> Option<NodeId> {
        self.face_loop(seed).find(|&n| self.has_mask(n, mask))
    }

    /// First node carrying `mask` walking backwards around the vertex from
    /// `seed`, so `vpred(seed)` is tested right after `seed`.
    pub fn find_mask_around_reverse_vertex(&self, seed: NodeId, mask: Mask) -> Option<NodeId> {
        self.loop_iter(seed, LoopKind::ReverseVertex)
            .find(|&n| self.has_mask(n, mask))
    }

    pub fn find_mask_around_reverse_face(&self, seed: NodeId, mask: Mask) -> Option<NodeId> {
        self.loop_iter(seed, LoopKind::ReverseFace)
            .find(|&n| self.has_mask(n, mask))
    }

    /// `Some(target)` if `target` is one of the nodes around the vertex of `seed`.
    pub fn find_node_around_vertex(&self, seed: NodeId, target: NodeId) -> Option<NodeId> {
        self.vertex_loop(seed).find(|&n| n == target)
    }

    pub fn find_node_around_face(&self, seed: NodeId, target: NodeId) -> Option<NodeId> {
        self.face_loop(seed).find(|&n| n == target)
    }

    /// Number of nodes around the vertex of `seed`.
    pub fn vertex_degree(&self, seed: NodeId) -> usize {
        self.vertex_loop(seed).count()
    }

    /// Number of nodes around the face of `seed`.
    pub fn face_size(&self, seed: NodeId) -> usize {
        self.face_loop(seed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three edges meeting at one vertex: `hub[i]` at the centre, `tip[i]` outside.
    fn star3(g: &mut VuGraph) -> ([NodeId; 3], [NodeId; 3]) {
        let (h0, t0) = g.make_pair().unwrap();
        let (h1, t1) = g.make_pair().unwrap();
        let (h2, t2) = g.make_pair().unwrap();
        g.vertex_twist(h0, h1);
        g.vertex_twist(h1, h2);
        ([h0, h1, h2], [t0, t1, t2])
    }

    #[test]
    fn star_loops() {
        let mut g = VuGraph::new(0);
        let (hub, tip) = star3(&mut g);
        assert_eq!(g.vertex_degree(hub[0]), 3);
        assert_eq!(g.vertex_degree(tip[1]), 1);
        // A tree has a single face visiting every node.
        assert_eq!(g.face_size(hub[0]), 6);
        for i in 0..3 {
            assert_eq!(g.edge_mate(hub[i]), tip[i]);
        }
    }

    #[test]
    fn masks_around_loops() {
        let mut g = VuGraph::new(0);
        let (hub, tip) = star3(&mut g);
        g.set_mask_around_vertex(hub[1], Mask::GRID_EDGE);
        assert_eq!(g.count_mask(Mask::GRID_EDGE), 3);
        assert_eq!(g.count_mask_around_face(tip[0], Mask::GRID_EDGE), 3);
        assert_eq!(g.find_mask_around_vertex(tip[2], Mask::GRID_EDGE), None);
        g.clear_mask_around_vertex(hub[0], Mask::GRID_EDGE);
        assert_eq!(g.count_mask(Mask::GRID_EDGE), 0);

        g.set_mask_around_edge(tip[2], Mask::BOUNDARY_EDGE);
        assert!(g.has_mask(hub[2], Mask::BOUNDARY_EDGE));
        assert_eq!(
            g.find_mask_around_vertex(hub[0], Mask::BOUNDARY_EDGE),
            Some(hub[2])
        );
        g.clear_mask_around_edge(hub[2], Mask::BOUNDARY_EDGE);
        assert_eq!(g.count_mask(Mask::BOUNDARY_EDGE), 0);

        g.set_mask_around_face(hub[0], Mask::EXTERIOR_EDGE);
        assert_eq!(g.count_mask_around_vertex(hub[0], Mask::EXTERIOR_EDGE), 3);
        g.clear_mask_around_face(tip[1], Mask::EXTERIOR_EDGE);
        assert_eq!(g.find_mask_around_face(hub[0], Mask::EXTERIOR_EDGE), None);
    }

    #[test]
    fn reverse_search_meets_the_other_marked_node_first() {
        let mut g = VuGraph::new(0);
        let (hub, _) = star3(&mut g);
        assert_eq!(g.vertex_loop(hub[0]).collect::<Vec<_>>(), hub.to_vec());
        g.set_mask(hub[1], Mask::SEAM_EDGE);
        g.set_mask(hub[2], Mask::SEAM_EDGE);
        assert_eq!(g.find_mask_around_vertex(hub[0], Mask::SEAM_EDGE), Some(hub[1]));
        assert_eq!(
            g.find_mask_around_reverse_vertex(hub[0], Mask::SEAM_EDGE),
            Some(hub[2])
        );
        assert_eq!(
            g.loop_iter(hub[0], LoopKind::ReverseVertex).collect::<Vec<_>>(),
            vec![hub[0], hub[2], hub[1]]
        );

        let face: Vec<NodeId> = g.face_loop(hub[0]).collect();
        assert_eq!(face.len(), 6);
        g.set_mask(face[2], Mask::GRID_EDGE);
        g.set_mask(face[4], Mask::GRID_EDGE);
        assert_eq!(g.find_mask_around_face(hub[0], Mask::GRID_EDGE), Some(face[2]));
        assert_eq!(
            g.find_mask_around_reverse_face(hub[0], Mask::GRID_EDGE),
            Some(face[4])
        );
        assert_eq!(
            g.find_mask_around_reverse_face(hub[0], Mask::NULL_FACE),
            None
        );
    }

    #[test]
    fn node_membership_in_loops() {
        let mut g = VuGraph::new(0);
        let (hub, tip) = star3(&mut g);
        assert_eq!(g.find_node_around_vertex(hub[0], hub[2]), Some(hub[2]));
        assert_eq!(g.find_node_around_vertex(hub[0], tip[0]), None);
        assert_eq!(g.find_node_around_vertex(tip[1], tip[1]), Some(tip[1]));
        assert_eq!(g.find_node_around_face(hub[0], tip[2]), Some(tip[2]));

        let (lone, _) = g.make_pair().unwrap();
        assert_eq!(g.find_node_around_face(hub[0], lone), None);
    }

    #[test]
    fn user_int_around_vertex() {
        let mut g = VuGraph::new(0);
        let (hub, tip) = star3(&mut g);
        g.set_user_int_around_vertex(hub[2], 11);
        assert!(hub.iter().all(|&h| g.user_int(h) == 11));
        assert!(tip.iter().all(|&t| g.user_int(t) == 0));
        g.set_user_int_around_face(tip[0], 4);
        assert!(tip.iter().all(|&t| g.user_int(t) == 4));
    }
}
