use bytes::{BufMut, Bytes, BytesMut};

use crate::identifiers::group::GroupIdentifier;
use crate::mls::crypto::credential::Identity;
use crate::mls::crypto::signer::{sign_with_label, verify_with_label, Signer, Verifier, LABEL_COMMIT};
use crate::mls::framing::proposal::SignedProposal;
use crate::mls::ratchet_tree::UpdatePath;
use crate::mls::utilities::error::{Error, Result};
use crate::mls::utilities::serde::{
    serialize_opaque_vec, serialize_optional, serialize_vector, Serializer,
};

/// [RFC9420 Sec.12.4](https://www.rfc-editor.org/rfc/rfc9420.html#section-12.4) A commit moves a
/// group from `epoch` to `epoch + 1` by applying `proposals` in order.
///
/// `epoch` is the epoch the commit was built against. A member holding a group
/// at any other epoch refuses it, so only the first commit for an epoch is ever
/// applied.
#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Commit {
    pub group_id: GroupIdentifier,
    pub epoch: u64,
    pub sender: Identity,
    pub proposals: Vec<SignedProposal>,
    pub path: Option<UpdatePath>,
    pub signature: Bytes,
}

/// ```text
/// struct {
///     opaque group_id<V>;
///     uint64 epoch;
///     opaque sender<V>;
///     SignedProposal proposals<V>;
///     optional<UpdatePath> path;
/// } CommitTBS;
/// ```
struct CommitTbs<'a> {
    group_id: &'a GroupIdentifier,
    epoch: u64,
    sender: &'a Identity,
    proposals: &'a [SignedProposal],
    path: Option<&'a UpdatePath>,
}

impl Serializer for CommitTbs<'_> {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        serialize_opaque_vec(self.group_id.as_ref(), buf)?;
        buf.put_u64(self.epoch);
        self.sender.serialize(buf)?;
        serialize_vector(
            self.proposals.len(),
            buf,
            |i: usize, b: &mut BytesMut| -> Result<()> { self.proposals[i].serialize(b) },
        )?;
        serialize_optional(self.path.is_some(), buf)?;
        if let Some(update_path) = self.path {
            update_path.serialize(buf)?;
        }

        Ok(())
    }
}

impl Commit {
    pub fn sign(
        signer: &(impl Signer + ?Sized),
        group_id: GroupIdentifier,
        epoch: u64,
        sender: Identity,
        proposals: Vec<SignedProposal>,
        path: Option<UpdatePath>,
    ) -> Result<Self> {
        let tbs = CommitTbs {
            group_id: &group_id,
            epoch,
            sender: &sender,
            proposals: &proposals,
            path: path.as_ref(),
        }
        .serialize_detached()?;
        let signature = sign_with_label(signer, LABEL_COMMIT, &tbs)?;

        Ok(Self {
            group_id,
            epoch,
            sender,
            proposals,
            path,
            signature,
        })
    }

    /// Checks the commit signature against the sender's long-term signature
    /// key. Proposal signatures are checked separately.
    pub fn verify(&self, verifier: &(impl Verifier + ?Sized), signature_key: &[u8]) -> Result<()> {
        let tbs = self.tbs().serialize_detached()?;

        verify_with_label(verifier, signature_key, LABEL_COMMIT, &tbs, &self.signature)
            .map_err(|_| Error::InvalidSignature)
    }

    fn tbs(&self) -> CommitTbs<'_> {
        CommitTbs {
            group_id: &self.group_id,
            epoch: self.epoch,
            sender: &self.sender,
            proposals: &self.proposals,
            path: self.path.as_ref(),
        }
    }
}

impl Serializer for Commit {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        self.tbs().serialize(buf)?;
        serialize_opaque_vec(&self.signature, buf)
    }
}
