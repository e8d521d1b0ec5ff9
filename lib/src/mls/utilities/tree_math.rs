//! Index arithmetic for the heap-indexed ratchet tree.
//!
//! The root is node 1; node `i` has children `2i` and `2i + 1`, so the parent
//! of `i` is `i / 2` and its sibling is `i + 1` when `i` is even, `i - 1` when
//! it is odd. A tree of depth `d` keeps its leaves on the last level: leaf `k`
//! is node `2^d + k`.

use serde::{Deserialize, Serialize};

/// Position of a member among the leaves, in join order (the creator is 0).
#[derive(
    Default, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub struct LeafIndex(pub u32);

/// Position of any node in the tree, root included.
#[derive(
    Default, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub struct NodeIndex(pub u64);

impl LeafIndex {
    pub fn node_index(self, depth: u8) -> NodeIndex {
        NodeIndex((1u64 << depth) | u64::from(self.0))
    }
}

impl std::fmt::Display for LeafIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "leaf {}", self.0)
    }
}

impl NodeIndex {
    pub const ROOT: NodeIndex = NodeIndex(1);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    pub fn is_left(self) -> bool {
        self.0 % 2 == 0
    }

    pub fn parent(self) -> NodeIndex {
        NodeIndex(self.0 / 2)
    }

    pub fn sibling(self) -> NodeIndex {
        if self.is_left() {
            NodeIndex(self.0 + 1)
        } else {
            NodeIndex(self.0 - 1)
        }
    }

    /// Strict ancestors of this node, nearest first, ending with the root.
    pub fn direct_path(self) -> DirectPath {
        DirectPath { current: self }
    }
}

/// Iterator returned by [`NodeIndex::direct_path`].
#[derive(Debug, Clone)]
pub struct DirectPath {
    current: NodeIndex,
}

impl Iterator for DirectPath {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.0 <= 1 {
            return None;
        }
        self.current = self.current.parent();
        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_sit_on_the_last_level() {
        assert_eq!(LeafIndex(0).node_index(3), NodeIndex(8), "first leaf");
        assert_eq!(LeafIndex(7).node_index(3), NodeIndex(15), "last leaf");
        assert_eq!(LeafIndex(1).node_index(1), NodeIndex(3), "depth one");
    }

    #[test]
    fn parent_and_sibling_arithmetic() {
        assert_eq!(NodeIndex(8).parent(), NodeIndex(4), "i / 2");
        assert_eq!(NodeIndex(9).parent(), NodeIndex(4), "i / 2 rounds down");
        assert_eq!(NodeIndex(8).sibling(), NodeIndex(9), "even nodes pair with i + 1");
        assert_eq!(NodeIndex(9).sibling(), NodeIndex(8), "odd nodes pair with i - 1");
        assert!(NodeIndex(8).is_left(), "even nodes are left children");
        assert!(NodeIndex::ROOT.is_root(), "root is node 1");
    }

    #[test]
    fn direct_path_climbs_to_the_root() {
        let path: Vec<NodeIndex> = LeafIndex(5).node_index(3).direct_path().collect();

        assert_eq!(
            path,
            vec![NodeIndex(6), NodeIndex(3), NodeIndex(1)],
            "node 13 climbs through 6 and 3"
        );
        assert_eq!(
            NodeIndex::ROOT.direct_path().count(),
            0,
            "the root has no ancestors"
        );
    }
}
