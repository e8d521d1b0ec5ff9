//! [RFC9420 Sec.12.1](https://www.rfc-editor.org/rfc/rfc9420.html#section-12.1) Proposals are
//! included in a commit to change the membership or the keys of the group.

use bytes::{BufMut, Bytes};

use crate::mls::crypto::credential::{Credential, Identity};
use crate::mls::crypto::signer::{sign_with_label, verify_with_label, Signer, Verifier, LABEL_PROPOSAL};
use crate::mls::crypto::HPKEPublicKey;
use crate::mls::utilities::{
    error::{Error, Result},
    serde::{serialize_opaque_vec, Serializer},
    tree_math::LeafIndex,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum ProposalType {
    Add = 1,
    Remove = 2,
    Update = 3,
}

impl std::fmt::Display for ProposalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProposalType::Add => f.write_str("add"),
            ProposalType::Remove => f.write_str("remove"),
            ProposalType::Update => f.write_str("update"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Proposal {
    /// Adds `credential` at `leaf_index`, which must be the next free leaf.
    Add {
        credential: Credential,
        leaf_index: LeafIndex,
    },
    Remove { identity: Identity },
    /// Replaces the sender's leaf key. The matching update path travels in the
    /// commit.
    Update { public_key: HPKEPublicKey },
}

impl Proposal {
    pub fn proposal_type(&self) -> ProposalType {
        match self {
            Proposal::Add { .. } => ProposalType::Add,
            Proposal::Remove { .. } => ProposalType::Remove,
            Proposal::Update { .. } => ProposalType::Update,
        }
    }
}

impl Serializer for Proposal {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        buf.put_u8(self.proposal_type() as u8);
        match self {
            Proposal::Add {
                credential,
                leaf_index,
            } => {
                credential.serialize(buf)?;
                buf.put_u32(leaf_index.0);
                Ok(())
            }
            Proposal::Remove { identity } => identity.serialize(buf),
            Proposal::Update { public_key } => public_key.serialize(buf),
        }
    }
}

/// A proposal together with the member asking for it and their signature.
#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignedProposal {
    pub sender: Identity,
    pub proposal: Proposal,
    pub signature: Bytes,
}

/// ```text
/// struct {
///     opaque sender<V>;
///     Proposal proposal;
/// } ProposalTBS;
/// ```
struct ProposalTbs<'a> {
    sender: &'a Identity,
    proposal: &'a Proposal,
}

impl Serializer for ProposalTbs<'_> {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        self.sender.serialize(buf)?;
        self.proposal.serialize(buf)
    }
}

impl SignedProposal {
    pub fn sign(
        signer: &(impl Signer + ?Sized),
        sender: Identity,
        proposal: Proposal,
    ) -> Result<Self> {
        let tbs = ProposalTbs {
            sender: &sender,
            proposal: &proposal,
        }
        .serialize_detached()?;
        let signature = sign_with_label(signer, LABEL_PROPOSAL, &tbs)?;

        Ok(Self {
            sender,
            proposal,
            signature,
        })
    }

    /// Checks the signature against the sender's long-term signature key.
    pub fn verify(&self, verifier: &(impl Verifier + ?Sized), signature_key: &[u8]) -> Result<()> {
        let tbs = ProposalTbs {
            sender: &self.sender,
            proposal: &self.proposal,
        }
        .serialize_detached()?;

        verify_with_label(verifier, signature_key, LABEL_PROPOSAL, &tbs, &self.signature)
            .map_err(|_| Error::InvalidSignature)
    }
}

impl Serializer for SignedProposal {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        self.sender.serialize(buf)?;
        self.proposal.serialize(buf)?;
        serialize_opaque_vec(&self.signature, buf)
    }
}
