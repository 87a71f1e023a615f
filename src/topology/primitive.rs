//! Small value-type settings consumed by topology operators and geometric
//! predicates. The graph stores them and copies them; it never interprets them.

use serde::{Deserialize, Serialize};

use super::mask::Mask;

/// Period lengths along each axis. Zero means "not periodic".
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Periods {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Periods {
    pub const NONE: Periods = Periods {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Periods { x, y, z }
    }

    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.x != 0.0 || self.y != 0.0 || self.z != 0.0
    }
}

/// Which node properties an operator carries over to nodes it creates by
/// splitting an existing edge or vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationFlags {
    /// Mask bits copied from the parent node.
    pub edge_masks: Mask,
    /// Copy `user_data` from the parent node.
    pub user_data: bool,
    /// Copy `user_int` from the parent node.
    pub user_int: bool,
}

impl Default for PropagationFlags {
    fn default() -> Self {
        PropagationFlags {
            edge_masks: Mask::BOUNDARY_EDGE | Mask::EXTERIOR_EDGE,
            user_data: false,
            user_int: false,
        }
    }
}

/// Per-graph primitive configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveData {
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub periods: Periods,
    /// Initial `user_data` of every new vertex use.
    pub default_user_data: isize,
    /// Initial `user_int` of every new vertex use.
    pub default_user_int: i32,
    pub propagation: PropagationFlags,
}

impl Default for PrimitiveData {
    fn default() -> Self {
        PrimitiveData {
            abs_tol: 0.0,
            rel_tol: 1.0e-10,
            periods: Periods::NONE,
            default_user_data: 0,
            default_user_int: 0,
            propagation: PropagationFlags::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let data = PrimitiveData {
            abs_tol: 1.0e-6,
            periods: Periods::new(360.0, 0.0, 0.0),
            default_user_int: -1,
            ..Default::default()
        };
        let s = serde_json::to_string(&data).unwrap();
        let back: PrimitiveData = serde_json::from_str(&s).unwrap();
        assert_eq!(back, data);
        assert!(back.periods.is_periodic());
    }

    #[test]
    fn defaults_are_not_periodic() {
        assert!(!PrimitiveData::default().periods.is_periodic());
    }
}
