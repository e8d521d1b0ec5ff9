//! [RFC9420 Sec.11](https://www.rfc-editor.org/rfc/rfc9420.html#section-11) Group Creation and
//! [RFC9420 Sec.12](https://www.rfc-editor.org/rfc/rfc9420.html#section-12) Group Evolution
//!
//! A group is always created with a single member, the "creator". Other members are then added to
//! the group using the usual Add/Commit mechanism.
//!
//! Over the lifetime of a group, its membership can change, and existing members might want to
//! change their keys in order to achieve post-compromise security.
//!
//! A [`Group`] is a plain sequential state machine: every operation takes
//! `&mut self`, so whoever owns it decides the order commits are applied in.
//! [`registry::GroupRegistry`] is one such owner for many groups at once.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::Serialize;

use crate::identifiers::group::GroupIdentifier;
use crate::mls::crypto::credential::{Credential, Identity};
use crate::mls::group::config::GroupConfig;
use crate::mls::group::transcript::ConfirmedTranscriptHash;
use crate::mls::ratchet_tree::RatchetTree;
use crate::mls::utilities::tree_math::LeafIndex;


pub mod config;
pub mod creation;
pub mod evolution;
pub mod registry;
pub mod transcript;

/// A current member and the leaf it occupies.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Member {
    pub credential: Credential,
    pub leaf_index: LeafIndex,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GroupState {
    Uninitialized,
    Active { epoch: u64 },
}

/// Snapshot of a group for synchronisation checks between members and for
/// debugging. Contains no secrets.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GroupContext {
    pub group_id: GroupIdentifier,
    pub epoch: u64,
    /// Ordered by leaf index.
    pub members: Vec<Member>,
    pub tree_hash: Bytes,
    pub confirmed_transcript_hash: Bytes,
}

#[derive(Debug, Clone)]
pub struct Group {
    group_config: GroupConfig,
    group_id: GroupIdentifier,
    epoch: u64,
    ratchet_tree: RatchetTree,
    members: BTreeMap<Identity, Member>,
    confirmed_transcript_hash: ConfirmedTranscriptHash,
}

impl Group {
    pub fn group_id(&self) -> GroupIdentifier {
        self.group_id
    }

    pub fn group_config(&self) -> &GroupConfig {
        &self.group_config
    }

    /// Zero until the group is initialized, then one more per applied commit.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self) -> GroupState {
        if self.epoch == 0 {
            GroupState::Uninitialized
        } else {
            GroupState::Active { epoch: self.epoch }
        }
    }

    pub fn is_member(&self, identity: &Identity) -> bool {
        self.members.contains_key(identity)
    }

    pub fn member(&self, identity: &Identity) -> Option<&Member> {
        self.members.get(identity)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Current members, ordered by leaf index.
    pub fn members(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.values().collect();
        members.sort_by_key(|member| member.leaf_index);
        members
    }

    pub fn ratchet_tree(&self) -> &RatchetTree {
        &self.ratchet_tree
    }

    pub fn confirmed_transcript_hash(&self) -> &Bytes {
        self.confirmed_transcript_hash.as_bytes()
    }
}
