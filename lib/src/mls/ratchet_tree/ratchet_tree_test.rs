use hex_literal::hex;

use crate::mls::crypto::cipher_suite::CipherSuite;
use crate::mls::crypto::provider::{CryptoProvider, Hash, RustCryptoProvider};
use crate::mls::crypto::NodeSecret;
use crate::mls::ratchet_tree::*;
use crate::mls::utilities::error::*;
use crate::mls::utilities::tree_math::LeafIndex;

fn sha256() -> Result<&'static dyn Hash> {
    static PROVIDER: RustCryptoProvider = RustCryptoProvider;
    PROVIDER.hash(CipherSuite::default())
}

fn secret(byte: u8) -> NodeSecret {
    NodeSecret::from_array([byte; 32])
}

#[test]
fn test_root_of_two_leaf_tree() -> Result<()> {
    let hash = sha256()?;
    let mut tree = RatchetTree::new(1)?;

    assert!(!tree.has_root_key(), "empty tree has no root");
    assert!(tree.root_key().is_zero(), "missing root reads as zeroes");

    assert_eq!(tree.add_member(hash, secret(1))?, LeafIndex(0), "creator is leaf 0");
    // SHA-256([1; 32] ‖ [0; 32]): the empty right leaf reads as zeroes
    assert_eq!(
        tree.root_key().as_bytes(),
        &hex!("037d6dfb3a369a41e01100fdd53c35ee3fb69ddec5830d61e1138d066a4c2285"),
        "root of a half-filled tree"
    );

    assert_eq!(tree.add_member(hash, secret(2))?, LeafIndex(1), "second leaf");
    assert_eq!(
        tree.root_key().as_bytes(),
        &hex!("f818afd37a6dc3bc92fb44731011277006db4efa6e9023cd7468c02335d22a4d"),
        "root is SHA-256(left ‖ right)"
    );
    assert_eq!(
        tree.tree_hash(hash).as_ref(),
        hex!("40805d4b93422f85282b395aa075ae38a7f425de9b09a8d2ff42cc954e3c4f1b"),
        "tree hash covers nodes 1, 2 and 3 in order"
    );
    assert_eq!(tree.leaf_count(), 2, "both leaves occupied");
    Ok(())
}

#[test]
fn test_full_tree() -> Result<()> {
    let hash = sha256()?;
    let mut tree = RatchetTree::new(1)?;
    tree.add_member(hash, secret(1))?;
    tree.add_member(hash, secret(2))?;

    assert_eq!(tree.capacity(), 2, "depth 1 holds two leaves");
    assert_eq!(
        tree.add_member(hash, secret(3)),
        Err(Error::TreeFull),
        "no third leaf"
    );

    // Removed leaves are never handed out again
    tree.remove_member(LeafIndex(0))?;
    assert_eq!(tree.next_leaf_index(), Err(Error::TreeFull), "leaves aren't reused");
    Ok(())
}

#[test]
fn test_depth_bounds() {
    assert!(
        matches!(RatchetTree::new(0), Err(Error::InvalidConfig(_))),
        "a tree needs at least one level"
    );
    assert!(
        matches!(RatchetTree::new(33), Err(Error::InvalidConfig(_))),
        "leaf indices are 32 bits"
    );
    assert!(RatchetTree::new(32).is_ok(), "32 is the deepest tree");
}

#[test]
fn test_remove_blanks_the_path() -> Result<()> {
    let hash = sha256()?;
    let mut tree = RatchetTree::new(3)?;
    for byte in 1..=4 {
        tree.add_member(hash, secret(byte))?;
    }

    tree.remove_member(LeafIndex(2))?;

    assert!(tree.leaf(LeafIndex(2)).is_none(), "leaf deleted");
    assert!(!tree.has_root_key(), "root deleted along with the path");
    assert!(tree.root_key().is_zero(), "undefined root reads as zeroes");
    assert_eq!(tree.leaf_count(), 3, "other leaves untouched");
    assert_eq!(
        tree.remove_member(LeafIndex(2)),
        Err(Error::LeafNotFound(2)),
        "can't remove twice"
    );
    assert_eq!(
        tree.remove_member(LeafIndex(1000)),
        Err(Error::LeafNotFound(1000)),
        "out of range leaf"
    );
    Ok(())
}

#[test]
fn test_update_path_restores_root_after_remove() -> Result<()> {
    let hash = sha256()?;
    let mut tree = RatchetTree::new(2)?;
    for byte in 1..=3 {
        tree.add_member(hash, secret(byte))?;
    }
    tree.remove_member(LeafIndex(1))?;

    let path = tree.generate_update_path(hash, LeafIndex(0), secret(9))?;

    assert_eq!(path.nodes.len(), 2, "one secret per level");
    assert!(tree.has_root_key(), "root restored");
    assert_eq!(Some(&tree.root_key()), path.root(), "path ends at the root");
    assert_eq!(tree.leaf(LeafIndex(0)), Some(&secret(9)), "leaf replaced");
    Ok(())
}

#[test]
fn test_update_changes_root() -> Result<()> {
    let hash = sha256()?;
    let mut tree = RatchetTree::new(4)?;
    tree.add_member(hash, secret(1))?;
    tree.add_member(hash, secret(2))?;
    let before = tree.root_key();

    tree.generate_update_path(hash, LeafIndex(1), secret(3))?;

    assert_ne!(tree.root_key(), before, "new leaf secret gives a new root");
    assert_eq!(
        tree.generate_update_path(hash, LeafIndex(5), secret(3)),
        Err(Error::LeafNotFound(5)),
        "only occupied leaves can be updated"
    );
    Ok(())
}

#[test]
fn test_derive_update_path_is_pure() -> Result<()> {
    let hash = sha256()?;
    let mut tree = RatchetTree::new(3)?;
    tree.add_member(hash, secret(1))?;
    let snapshot = tree.clone();

    let path = tree.derive_update_path(hash, LeafIndex(0), secret(7))?;

    assert_eq!(tree, snapshot, "deriving leaves the tree alone");
    tree.apply_update_path(&path)?;
    assert_eq!(Some(&tree.root_key()), path.root(), "applying installs the root");
    Ok(())
}

#[test]
fn test_replicas_converge() -> Result<()> {
    let hash = sha256()?;
    let mut alice = RatchetTree::new(3)?;
    for byte in 1..=5 {
        alice.add_member(hash, secret(byte))?;
    }
    let mut bob = alice.clone();

    let path = alice.generate_update_path(hash, LeafIndex(3), secret(42))?;
    bob.apply_update_path(&path)?;

    assert_eq!(alice.root_key(), bob.root_key(), "same root after applying");
    assert_eq!(
        alice.tree_hash(hash),
        bob.tree_hash(hash),
        "same tree hash after applying"
    );
    Ok(())
}

#[test]
fn test_malformed_update_paths_are_rejected() -> Result<()> {
    let hash = sha256()?;
    let mut tree = RatchetTree::new(3)?;
    tree.add_member(hash, secret(1))?;

    let mut short = tree.derive_update_path(hash, LeafIndex(0), secret(2))?;
    short.nodes.pop();
    assert_eq!(
        tree.apply_update_path(&short),
        Err(Error::InvalidUpdatePath),
        "path must cover every level"
    );

    let mut stray = tree.derive_update_path(hash, LeafIndex(0), secret(2))?;
    stray.leaf_index = LeafIndex(4);
    assert_eq!(
        tree.apply_update_path(&stray),
        Err(Error::LeafNotFound(4)),
        "path must target an occupied leaf"
    );
    Ok(())
}

#[test]
fn test_tree_hash_tracks_content() -> Result<()> {
    let hash = sha256()?;
    let mut tree = RatchetTree::new(2)?;
    let empty = tree.tree_hash(hash);
    // SHA-256 of the empty string
    assert_eq!(
        empty.as_ref(),
        hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
        "empty tree hashes nothing"
    );

    tree.add_member(hash, secret(1))?;
    let one = tree.tree_hash(hash);
    tree.add_member(hash, secret(2))?;

    assert_ne!(one, tree.tree_hash(hash), "adding changes the hash");
    Ok(())
}
