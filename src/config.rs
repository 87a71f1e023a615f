//! Construction-time configuration of a graph.

use serde::{Deserialize, Serialize};

/// Layout and growth settings fixed for a graph's whole lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Bytes of application data attached to every node.
    pub extra_bytes_per_node: usize,
    /// Upper bound on arena blocks; `None` grows until the host allocator refuses.
    #[serde(default)]
    pub max_blocks: Option<usize>,
}

impl GraphConfig {
    pub fn new(extra_bytes_per_node: usize) -> Self {
        GraphConfig {
            extra_bytes_per_node,
            max_blocks: None,
        }
    }

    /// Cap arena growth at `max_blocks` blocks.
    pub fn with_max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = Some(max_blocks);
        self
    }
}
