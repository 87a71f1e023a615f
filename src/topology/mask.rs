//! Attribute bits carried by every node, and the pool that lends them out.
//!
//! The low half of the mask word holds fixed, well-known edge properties
//! that topology operators set and test directly. The high half is owned by
//! the [`MaskPool`]: algorithms borrow one bit for private bookkeeping with
//! [`MaskPool::grab`] and hand it back with [`MaskPool::drop_mask`].

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use crate::mesh_error::{ContractViolation, fatal};

/// A set of node attribute bits.
#[derive(
    Copy, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct Mask(u32);

impl Mask {
    pub const NONE: Mask = Mask(0);

    pub const BOUNDARY_EDGE: Mask = Mask(0x0000_0001);
    pub const EXTERIOR_EDGE: Mask = Mask(0x0000_0002);
    pub const SEAM_EDGE: Mask = Mask(0x0000_0004);
    pub const RULE_EDGE: Mask = Mask(0x0000_0008);
    pub const NULL_FACE: Mask = Mask(0x0000_0010);
    pub const KNOT_EDGE: Mask = Mask(0x0000_0020);
    pub const GRID_EDGE: Mask = Mask(0x0000_0040);
    pub const DISCONTINUITY_EDGE: Mask = Mask(0x0000_0080);
    pub const SILHOUETTE_EDGE: Mask = Mask(0x0000_0100);
    pub const PRIMARY_EDGE: Mask = Mask(0x0000_0200);
    pub const CONSTRAINED_EDGE: Mask = Mask(0x0000_0400);

    /// Bits reserved for the pool.
    pub const POOL_BITS: Mask = Mask(0xFFFF_0000);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Mask(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any bit of `other` is also set in `self`.
    #[inline]
    pub const fn intersects(self, other: Mask) -> bool {
        self.0 & other.0 != 0
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask({:#010x})", self.0)
    }
}

impl BitOr for Mask {
    type Output = Mask;
    #[inline]
    fn bitor(self, rhs: Mask) -> Mask {
        Mask(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    #[inline]
    fn bitor_assign(&mut self, rhs: Mask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Mask {
    type Output = Mask;
    #[inline]
    fn bitand(self, rhs: Mask) -> Mask {
        Mask(self.0 & rhs.0)
    }
}

impl Not for Mask {
    type Output = Mask;
    #[inline]
    fn not(self) -> Mask {
        Mask(!self.0)
    }
}

/// Fixed-capacity stack of borrowable mask bits.
///
/// Every grant is tracked: returning a bit that is not currently borrowed
/// is a contract violation, as is borrowing from an empty pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskPool {
    free: Vec<Mask>,
    borrowed: u32,
}

impl MaskPool {
    /// Number of masks the pool lends out.
    pub const CAPACITY: usize = 16;

    /// A full pool.
    pub fn new() -> Self {
        // Pushed high-to-low so the first grab yields the lowest pool bit.
        let free = (0..Self::CAPACITY as u32)
            .rev()
            .map(|i| Mask(0x0001_0000 << i))
            .collect();
        MaskPool { free, borrowed: 0 }
    }

    /// Borrow one mask bit.
    ///
    /// # Panics
    /// With [`ContractViolation::MaskPoolExhausted`] if every bit is borrowed.
    pub fn grab(&mut self) -> Mask {
        let Some(mask) = self.free.pop() else {
            fatal(ContractViolation::MaskPoolExhausted {
                capacity: Self::CAPACITY,
            });
        };
        self.borrowed |= mask.0;
        mask
    }

    /// Return a borrowed bit.
    ///
    /// # Panics
    /// With [`ContractViolation::MaskNotGranted`] if `mask` is not exactly
    /// one currently borrowed pool bit.
    pub fn drop_mask(&mut self, mask: Mask) {
        if mask.0.count_ones() != 1 || self.borrowed & mask.0 == 0 {
            fatal(ContractViolation::MaskNotGranted(mask));
        }
        self.borrowed &= !mask.0;
        self.free.push(mask);
    }

    /// Number of masks available to grab.
    #[inline]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Number of masks currently borrowed.
    #[inline]
    pub fn outstanding(&self) -> usize {
        Self::CAPACITY - self.free.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.free.len() == Self::CAPACITY
    }

    /// Check that the free stack holds distinct pool bits disjoint from the
    /// borrowed set, and that together they cover the whole pool.
    pub(crate) fn validate(&self) -> Result<(), crate::mesh_error::MeshError> {
        use crate::mesh_error::MeshError;
        let mut seen = 0u32;
        for m in &self.free {
            if m.0.count_ones() != 1 || !m.intersects(Mask::POOL_BITS) {
                return Err(MeshError::MaskPoolCorrupted(format!(
                    "foreign entry {m:?}"
                )));
            }
            if seen & m.0 != 0 {
                return Err(MeshError::MaskPoolCorrupted(format!(
                    "duplicate entry {m:?}"
                )));
            }
            seen |= m.0;
        }
        if seen & self.borrowed != 0 || (seen | self.borrowed) != Mask::POOL_BITS.0 {
            return Err(MeshError::MaskPoolCorrupted(format!(
                "free {seen:#010x} and borrowed {:#010x} do not partition the pool",
                self.borrowed
            )));
        }
        Ok(())
    }
}

impl Default for MaskPool {
    fn default() -> Self {
        Self::new()
    }
}
