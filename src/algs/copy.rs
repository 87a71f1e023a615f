//! Whole-graph deep copy.
//!
//! The copy gets its own arena. Source-to-destination correspondence is
//! kept in a side table for the duration of the copy, so the source is
//! only ever read.

use hashbrown::HashMap;

use crate::mesh_error::MeshError;
use crate::topology::graph::VuGraph;
use crate::topology::node::NodeId;

/// Copy `source` into `dest`, replacing whatever `dest` held.
///
/// The copy's enumeration order, ids, payloads, extra bytes, masks,
/// primitive data and mask pool state match the source's.
///
/// Fails without changing `dest`'s nodes when the extra byte sizes differ,
/// when a live source node links to a node outside the enumeration cycle,
/// or when `dest` cannot grow to hold the copy. Capacity reserved before
/// such a failure stays in `dest`'s free list.
///
/// # Panics
/// As [`VuGraph::reinitialize`] if `dest` has masks or arrays borrowed.
pub fn copy_into(dest: &mut VuGraph, source: &VuGraph) -> Result<(), MeshError> {
    if dest.extra_bytes_per_node() != source.extra_bytes_per_node() {
        return Err(MeshError::ExtraBytesMismatch {
            source_bytes: source.extra_bytes_per_node(),
            destination_bytes: dest.extra_bytes_per_node(),
        });
    }
    check_links_live(source)?;
    // Reinitialize hands every allocated node back to the free list.
    dest.reserve_nodes(source.live_count().saturating_sub(dest.node_count()))?;
    dest.reinitialize();

    let mut alias: HashMap<NodeId, NodeId> = HashMap::with_capacity(source.live_count());
    for s in source.nodes() {
        let d = dest.allocate_node()?;
        dest.splice_new_node(d);
        alias.insert(s, d);
    }

    let remap = |n: NodeId| alias.get(&n).copied().ok_or(MeshError::StaleHandle(n));
    for s in source.nodes() {
        let d = alias[&s];
        let src = source.node(s);
        let (fsucc, vsucc) = (remap(src.fsucc())?, remap(src.vsucc())?);
        let dst = dest.node_mut(d);
        dst.fsucc = fsucc;
        dst.vsucc = vsucc;
        dst.mask = src.mask();
        dst.id = src.id();
        dst.user_data = src.user_data();
        dst.user_int = src.user_int();
        dest.extra_mut(d).copy_from_slice(source.extra(s));
    }

    dest.next_id = source.next_id;
    dest.primitive = source.primitive.clone();
    dest.masks = source.masks.clone();
    log::trace!(
        "vu copy: {} node(s) into {} block(s)",
        dest.live_count(),
        dest.block_count()
    );
    Ok(())
}

/// Every rotation link of a live node must name another live node.
fn check_links_live(source: &VuGraph) -> Result<(), MeshError> {
    for s in source.nodes() {
        let node = source.node(s);
        for target in [node.fsucc(), node.vsucc()] {
            match source.try_node(target) {
                Ok(t) if t.link().is_live() => {}
                _ => return Err(MeshError::StaleHandle(target)),
            }
        }
    }
    Ok(())
}

/// Deep copy `source`, reusing `dest`'s arena when one is given.
///
/// Without a destination a new graph is created with the source's
/// configuration. A mismatched destination is dropped with the error.
pub fn deep_copy(dest: Option<VuGraph>, source: &VuGraph) -> Result<VuGraph, MeshError> {
    let mut dest = dest.unwrap_or_else(|| VuGraph::with_config(source.config().clone()));
    copy_into(&mut dest, source)?;
    Ok(dest)
}
