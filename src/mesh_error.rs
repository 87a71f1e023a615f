//! MeshError: recoverable errors, and ContractViolation: fatal misuse.
//!
//! Environmental conditions (the host allocator refusing a block, a copy
//! between graphs with different node layouts) are reported as
//! [`MeshError`] through `Result`. Caller bugs (leaking a mask, using a
//! handle after its node was freed) are [`ContractViolation`]s and abort the
//! current thread through [`fatal`].

use thiserror::Error;

use crate::topology::mask::Mask;
use crate::topology::node::NodeId;

/// Recoverable error type for vu-graph operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The host allocator could not satisfy a node block request.
    #[error("allocation failed: could not reserve a block of {requested_nodes} nodes ({blocks} blocks live)")]
    AllocationFailed {
        requested_nodes: usize,
        blocks: usize,
    },
    /// The configured arena growth limit was reached.
    #[error("allocation failed: arena block limit of {max_blocks} reached")]
    BlockLimitReached { max_blocks: usize },
    /// Source and destination graphs carry different per-node extra byte counts.
    #[error("extra byte size mismatch: source has {source_bytes} bytes per node, destination has {destination_bytes}")]
    ExtraBytesMismatch {
        source_bytes: usize,
        destination_bytes: usize,
    },
    /// A typed extra-region access does not fit the per-node extra bytes.
    #[error("extra region too small: need {needed} bytes, nodes carry {available}")]
    ExtraRegionTooSmall { needed: usize, available: usize },
    /// The handle refers to a node that has been freed (or never existed), or
    /// a copied link leads outside the enumeration cycle.
    #[error("stale node handle {0}")]
    StaleHandle(NodeId),
    /// Walking the enumeration cycle did not visit exactly the live nodes.
    #[error("enumeration cycle length mismatch: expected {expected}, found {found}")]
    CycleLengthMismatch { expected: usize, found: usize },
    /// The free list is inconsistent with the node states.
    #[error("free list corrupted: {0}")]
    FreeListCorrupted(String),
    /// The mask pool holds duplicate or foreign bits.
    #[error("mask pool corrupted: {0}")]
    MaskPoolCorrupted(String),
}

/// Contract violations. These signal a bug in the calling code, never an
/// environmental condition, and are raised with [`fatal`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("mask pool exhausted: all {capacity} masks are borrowed")]
    MaskPoolExhausted { capacity: usize },
    #[error("mask {0:?} returned to the pool but was not borrowed")]
    MaskNotGranted(Mask),
    #[error("{outstanding} mask(s) still borrowed at graph teardown or reinitialize")]
    LeakedMasks { outstanding: usize },
    #[error("{outstanding} array(s) still grabbed at graph teardown or reinitialize")]
    LeakedArrays { outstanding: usize },
    #[error("array returned to the cache but none is grabbed")]
    ArrayNotGranted,
    #[error("stale node handle {0}")]
    StaleHandle(NodeId),
    #[error("node {0} is still linked into the enumeration cycle")]
    NodeStillLinked(NodeId),
    #[error("node {0} is already linked into the enumeration cycle")]
    NodeAlreadyLinked(NodeId),
    #[error("enumeration corrupted: expected id {expected}, found {found}")]
    EnumerationCorrupted { expected: u32, found: u32 },
}

/// Abort on a contract violation.
///
/// The panic message always starts with `[contract]` followed by the
/// violation's display text.
#[cold]
#[track_caller]
pub fn fatal(violation: ContractViolation) -> ! {
    panic!("[contract] {violation}")
}
