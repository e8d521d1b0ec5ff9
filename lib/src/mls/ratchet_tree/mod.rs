//! The ratchet tree: one secret per tree node, reduced to a single root
//! secret shared by the whole group.
//!
//! Every parent holds `Hash(left ‖ right)` of its two children (a missing
//! child reads as 32 zero bytes), so changing one leaf only requires
//! recomputing the `depth` nodes on that leaf's path to the root.
//!
//! Leaves are handed out in join order and never reused. Removing a member
//! deletes its leaf and blanks every ancestor without recomputing them: the
//! root stays undefined until the next add or update path repopulates it.
//! This is weaker than the remove of
//! [RFC9420 Sec.12.1.3](https://www.rfc-editor.org/rfc/rfc9420.html#section-12.1.3),
//! which re-randomizes the path immediately. Remaining members are expected to
//! rotate their key (see [`RatchetTree::generate_update_path`]) right after a
//! remove to get a fresh, forward-secure root.

#[cfg(test)]
mod ratchet_tree_test;

use std::collections::BTreeMap;

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_TREE_DEPTH, NODE_SECRET_SIZE};
use crate::mls::crypto::provider::Hash;
use crate::mls::crypto::NodeSecret;
use crate::mls::utilities::{
    error::{Error, Result},
    serde::{serialize_opaque_vec, serialize_vector, Serializer},
    tree_math::{LeafIndex, NodeIndex},
};

/// A rotated leaf and the new secrets of all its ancestors, nearest first and
/// root last. Other members apply it to refresh their copy of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePath {
    pub leaf_index: LeafIndex,
    pub leaf_secret: NodeSecret,
    pub nodes: Vec<NodeSecret>,
}

impl UpdatePath {
    /// The root secret this path installs.
    pub fn root(&self) -> Option<&NodeSecret> {
        self.nodes.last()
    }
}

impl Serializer for UpdatePath {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        buf.put_u32(self.leaf_index.0);
        serialize_opaque_vec(self.leaf_secret.as_bytes(), buf)?;
        serialize_vector(self.nodes.len(), buf, |i, b| {
            serialize_opaque_vec(self.nodes[i].as_bytes(), b)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatchetTree {
    depth: u8,
    nodes: BTreeMap<NodeIndex, NodeSecret>,
    next_leaf: u64,
}

impl RatchetTree {
    /// An empty tree with room for `2^depth` leaves.
    pub fn new(depth: u8) -> Result<Self> {
        if depth == 0 || depth > MAX_TREE_DEPTH {
            return Err(Error::InvalidConfig(format!(
                "tree depth must be between 1 and {MAX_TREE_DEPTH}, got {depth}"
            )));
        }

        Ok(Self {
            depth,
            nodes: BTreeMap::new(),
            next_leaf: 0,
        })
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Maximum number of leaves ever allocated in this tree.
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    /// Number of occupied leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes.range(NodeIndex(self.capacity())..).count()
    }

    /// The leaf the next [`Self::add_member`] will allocate.
    pub fn next_leaf_index(&self) -> Result<LeafIndex> {
        if self.next_leaf >= self.capacity() {
            return Err(Error::TreeFull);
        }
        u32::try_from(self.next_leaf)
            .map(LeafIndex)
            .map_err(|_| Error::TreeFull)
    }

    pub fn leaf(&self, leaf_index: LeafIndex) -> Option<&NodeSecret> {
        if u64::from(leaf_index.0) >= self.capacity() {
            return None;
        }
        self.nodes.get(&leaf_index.node_index(self.depth))
    }

    /// Allocates the next leaf, stores `public_key` there and recomputes the
    /// leaf's ancestors up to the root.
    pub fn add_member(&mut self, hash: &dyn Hash, public_key: NodeSecret) -> Result<LeafIndex> {
        let leaf_index = self.next_leaf_index()?;
        let path = self.derive_path(hash, leaf_index, public_key)?;

        self.write_path(&path);
        self.next_leaf += 1;

        Ok(leaf_index)
    }

    /// Deletes the leaf and every strict ancestor, without recomputing them.
    pub fn remove_member(&mut self, leaf_index: LeafIndex) -> Result<()> {
        let node = self.occupied_leaf(leaf_index)?;

        self.nodes.remove(&node);
        for ancestor in node.direct_path() {
            self.nodes.remove(&ancestor);
        }

        Ok(())
    }

    /// Computes the update path installing `new_secret` at `leaf_index`,
    /// without touching the tree.
    pub fn derive_update_path(
        &self,
        hash: &dyn Hash,
        leaf_index: LeafIndex,
        new_secret: NodeSecret,
    ) -> Result<UpdatePath> {
        self.occupied_leaf(leaf_index)?;
        self.derive_path(hash, leaf_index, new_secret)
    }

    /// Writes a path produced by [`Self::derive_update_path`] on this or
    /// another member's tree.
    pub fn apply_update_path(&mut self, path: &UpdatePath) -> Result<()> {
        self.occupied_leaf(path.leaf_index)?;
        if path.nodes.len() != usize::from(self.depth) {
            return Err(Error::InvalidUpdatePath);
        }

        self.write_path(path);
        Ok(())
    }

    /// Overwrites the leaf's secret and re-derives every ancestor up to the
    /// root, returning the new path. This is the only operation that restores
    /// a well-defined root after a remove.
    pub fn generate_update_path(
        &mut self,
        hash: &dyn Hash,
        leaf_index: LeafIndex,
        new_secret: NodeSecret,
    ) -> Result<UpdatePath> {
        let path = self.derive_update_path(hash, leaf_index, new_secret)?;
        self.write_path(&path);

        Ok(path)
    }

    /// The root secret, or 32 zero bytes while the root is unpopulated
    /// (before the first add, and after a remove until the next update).
    pub fn root_key(&self) -> NodeSecret {
        self.nodes
            .get(&NodeIndex::ROOT)
            .cloned()
            .unwrap_or_else(NodeSecret::zero)
    }

    pub fn has_root_key(&self) -> bool {
        self.nodes.contains_key(&NodeIndex::ROOT)
    }

    /// Digest over every present node as `index (u64, big endian) ‖ secret`,
    /// in ascending index order, so that members holding the same tree always
    /// agree on it.
    pub fn tree_hash(&self, hash: &dyn Hash) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.nodes.len() * (8 + NODE_SECRET_SIZE));
        for (index, secret) in &self.nodes {
            buf.put_u64(index.0);
            buf.put_slice(secret.as_bytes());
        }

        hash.digest(&buf)
    }

    fn occupied_leaf(&self, leaf_index: LeafIndex) -> Result<NodeIndex> {
        if self.leaf(leaf_index).is_none() {
            return Err(Error::LeafNotFound(leaf_index.0));
        }
        Ok(leaf_index.node_index(self.depth))
    }

    fn node_or_zero(&self, node: NodeIndex) -> NodeSecret {
        self.nodes.get(&node).cloned().unwrap_or_else(NodeSecret::zero)
    }

    fn derive_path(
        &self,
        hash: &dyn Hash,
        leaf_index: LeafIndex,
        leaf_secret: NodeSecret,
    ) -> Result<UpdatePath> {
        let mut nodes = Vec::with_capacity(usize::from(self.depth));
        let mut current = leaf_index.node_index(self.depth);
        let mut current_secret = leaf_secret.clone();

        while !current.is_root() {
            // Siblings are never on the path, so their stored value is current
            let sibling_secret = self.node_or_zero(current.sibling());
            let parent_secret = if current.is_left() {
                derive_parent(hash, &current_secret, &sibling_secret)?
            } else {
                derive_parent(hash, &sibling_secret, &current_secret)?
            };

            nodes.push(parent_secret.clone());
            current = current.parent();
            current_secret = parent_secret;
        }

        Ok(UpdatePath {
            leaf_index,
            leaf_secret,
            nodes,
        })
    }

    fn write_path(&mut self, path: &UpdatePath) {
        let leaf = path.leaf_index.node_index(self.depth);

        self.nodes.insert(leaf, path.leaf_secret.clone());
        for (ancestor, secret) in leaf.direct_path().zip(&path.nodes) {
            self.nodes.insert(ancestor, secret.clone());
        }
    }
}

fn derive_parent(hash: &dyn Hash, left: &NodeSecret, right: &NodeSecret) -> Result<NodeSecret> {
    let mut children = [0u8; 2 * NODE_SECRET_SIZE];
    children[..NODE_SECRET_SIZE].copy_from_slice(left.as_bytes());
    children[NODE_SECRET_SIZE..].copy_from_slice(right.as_bytes());

    NodeSecret::try_from(hash.digest(&children).as_ref())
}
