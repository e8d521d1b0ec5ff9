use bytes::Bytes;

use crate::mls::crypto::credential::{Credential, Identity};
use crate::mls::crypto::provider::{CryptoProvider, Hash};
use crate::mls::crypto::signer::{Signer, Verifier};
use crate::mls::crypto::{HPKEPublicKey, NodeSecret};
use crate::mls::framing::{Commit, PrivateMessage, Proposal, SignedProposal};
use crate::mls::group::{Group, GroupContext, Member};
use crate::mls::key_package::KeyPackage;
use crate::mls::ratchet_tree::UpdatePath;
use crate::mls::utilities::error::{Error, Result};
use crate::mls::utilities::tree_math::LeafIndex;
use crate::util::time::UnixTimestamp;

impl Group {
    pub fn get_group_context(&self, crypto_provider: &impl CryptoProvider) -> Result<GroupContext> {
        let hash = crypto_provider.hash(self.group_config.cipher_suite)?;

        Ok(GroupContext {
            group_id: self.group_id,
            epoch: self.epoch,
            members: self.members().into_iter().cloned().collect(),
            tree_hash: self.ratchet_tree.tree_hash(hash),
            confirmed_transcript_hash: self.confirmed_transcript_hash.as_bytes().clone(),
        })
    }

    /// The group's current message key. All zeroes while the root is blank
    /// after a remove.
    pub fn root_key(&self) -> NodeSecret {
        self.ratchet_tree.root_key()
    }

    /// Adds `new_member` on behalf of `adder`, who must be a member and sign
    /// with their own signature key.
    pub fn add_member(
        &mut self,
        crypto_provider: &impl CryptoProvider,
        new_member: Credential,
        adder: &Identity,
        signer: &(impl Signer + ?Sized),
    ) -> Result<Commit> {
        self.check_initialized()?;
        if self.members.contains_key(new_member.identity()) {
            return Err(Error::MemberExists(new_member.identity().clone()));
        }
        if !self.members.contains_key(adder) {
            return Err(Error::AdderNotAuthorized(adder.clone()));
        }
        self.check_signer(adder, signer)?;

        let leaf_index = self.ratchet_tree.next_leaf_index()?;
        let proposal = Proposal::Add {
            credential: new_member,
            leaf_index,
        };

        self.commit_local(crypto_provider, signer, adder, proposal, None)
    }

    /// Checks `key_package` (signature and expiry, at the current time) and
    /// adds the member it describes.
    pub fn add_member_from_key_package(
        &mut self,
        crypto_provider: &impl CryptoProvider,
        key_package: &KeyPackage,
        adder: &Identity,
        signer: &(impl Signer + ?Sized),
    ) -> Result<Commit> {
        if key_package.cipher_suite != self.group_config.cipher_suite {
            return Err(Error::UnsupportedCipherSuite);
        }
        key_package.validate(
            crypto_provider.signature(self.group_config.cipher_suite)?,
            UnixTimestamp::now(),
        )?;

        self.add_member(crypto_provider, key_package.credential.clone(), adder, signer)
    }

    /// Removes `target` on behalf of `remover`. Members can't remove
    /// themselves.
    ///
    /// The removed leaf's path is blanked, not re-keyed, so the group has no
    /// usable root key afterwards: a remaining member has to call
    /// [`Self::update_member_key`] before messages can be protected again.
    pub fn remove_member(
        &mut self,
        crypto_provider: &impl CryptoProvider,
        target: &Identity,
        remover: &Identity,
        signer: &(impl Signer + ?Sized),
    ) -> Result<Commit> {
        self.check_initialized()?;
        if !self.members.contains_key(target) {
            return Err(Error::MemberNotFound(target.clone()));
        }
        if target == remover || !self.members.contains_key(remover) {
            return Err(Error::InvalidRemover(remover.clone()));
        }
        self.check_signer(remover, signer)?;

        let proposal = Proposal::Remove {
            identity: target.clone(),
        };

        self.commit_local(crypto_provider, signer, remover, proposal, None)
    }

    /// Rotates `member`'s leaf key to `new_public_key` and re-derives the
    /// whole path to the root. This is what restores a root key after a
    /// remove. `new_public_key` must differ from the member's current key,
    /// otherwise the tree would not change.
    pub fn update_member_key(
        &mut self,
        crypto_provider: &impl CryptoProvider,
        member: &Identity,
        new_public_key: HPKEPublicKey,
        signer: &(impl Signer + ?Sized),
    ) -> Result<Commit> {
        self.check_initialized()?;
        let current = self
            .members
            .get(member)
            .ok_or_else(|| Error::MemberNotFound(member.clone()))?;
        if current.credential.public_key() == &new_public_key {
            return Err(Error::UnchangedLeafKey);
        }
        let leaf_index = current.leaf_index;
        self.check_signer(member, signer)?;

        let hash = crypto_provider.hash(self.group_config.cipher_suite)?;
        let leaf_secret = NodeSecret::try_from(&new_public_key[..])?;
        let path = self
            .ratchet_tree
            .derive_update_path(hash, leaf_index, leaf_secret)?;
        let proposal = Proposal::Update {
            public_key: new_public_key,
        };

        self.commit_local(crypto_provider, signer, member, proposal, Some(path))
    }

    /// Applies a commit created by another member's copy of this group.
    ///
    /// Commits have to arrive in the order they were created: one formed
    /// against any epoch but the current one is refused with
    /// [`Error::StaleCommit`], which also means the first commit for an epoch
    /// wins. Nothing changes unless the whole commit applies.
    pub fn process_commit(
        &mut self,
        crypto_provider: &impl CryptoProvider,
        commit: &Commit,
    ) -> Result<()> {
        self.check_initialized()?;
        if commit.group_id != self.group_id {
            return Err(Error::WrongGroup);
        }
        if commit.epoch != self.epoch {
            return Err(Error::StaleCommit {
                expected: self.epoch,
                actual: commit.epoch,
            });
        }

        let sender = self
            .members
            .get(&commit.sender)
            .ok_or_else(|| Error::SenderNotMember(commit.sender.clone()))?;
        let signature_key = sender.credential.signature_key();
        let verifier = crypto_provider.signature(self.group_config.cipher_suite)?;

        commit.verify(verifier, signature_key)?;
        for proposal in &commit.proposals {
            if proposal.sender != commit.sender {
                return Err(Error::InvalidProposal);
            }
            proposal.verify(verifier, signature_key)?;
        }

        let new_group = self.stage_commit(crypto_provider, commit)?;
        *self = new_group;
        self.log_commit(commit);

        Ok(())
    }

    /// Encrypts `plaintext` under the current root key as
    /// `nonce ‖ ciphertext`.
    pub fn encrypt_message(
        &self,
        crypto_provider: &impl CryptoProvider,
        plaintext: &[u8],
        sender: &Identity,
    ) -> Result<Bytes> {
        if !self.members.contains_key(sender) {
            return Err(Error::SenderNotMember(sender.clone()));
        }
        if !self.ratchet_tree.has_root_key() {
            log::warn!(
                "{} has no root key at epoch {}, encrypting under the zero key until a member updates",
                self.group_id,
                self.epoch
            );
        }

        let message = PrivateMessage::seal(
            crypto_provider,
            self.group_config.cipher_suite,
            &self.ratchet_tree.root_key(),
            plaintext,
        )?;

        Ok(message.to_bytes())
    }

    /// Decrypts `nonce ‖ ciphertext` under the current root key. Messages
    /// from another epoch fail exactly like tampered ones.
    pub fn decrypt_message(
        &self,
        crypto_provider: &impl CryptoProvider,
        message: &[u8],
    ) -> Result<Bytes> {
        PrivateMessage::from_bytes(message)?.open(
            crypto_provider,
            self.group_config.cipher_suite,
            &self.ratchet_tree.root_key(),
        )
    }

    fn check_initialized(&self) -> Result<()> {
        if self.epoch == 0 {
            return Err(Error::NotInitialized);
        }
        Ok(())
    }

    /// The signer must hold the signature key listed in `actor`'s credential.
    fn check_signer(&self, actor: &Identity, signer: &(impl Signer + ?Sized)) -> Result<()> {
        let member = self
            .members
            .get(actor)
            .ok_or_else(|| Error::MemberNotFound(actor.clone()))?;
        if member.credential.signature_key() != signer.signature_key() {
            return Err(Error::SignatureKeyMismatch);
        }
        Ok(())
    }

    /// Signs a single-proposal commit, applies it and hands it back for
    /// distribution to the other members.
    fn commit_local(
        &mut self,
        crypto_provider: &impl CryptoProvider,
        signer: &(impl Signer + ?Sized),
        sender: &Identity,
        proposal: Proposal,
        path: Option<UpdatePath>,
    ) -> Result<Commit> {
        let proposal = SignedProposal::sign(signer, sender.clone(), proposal)?;
        let commit = Commit::sign(
            signer,
            self.group_id,
            self.epoch,
            sender.clone(),
            vec![proposal],
            path,
        )?;

        let new_group = self.stage_commit(crypto_provider, &commit)?;
        *self = new_group;
        self.log_commit(&commit);

        Ok(commit)
    }

    /// Applies every proposal of `commit` to a copy of the group, advances the
    /// epoch and the transcript, and returns the copy. Signatures must already
    /// have been checked.
    fn stage_commit(&self, crypto_provider: &impl CryptoProvider, commit: &Commit) -> Result<Group> {
        if commit.proposals.is_empty() {
            return Err(Error::EmptyCommit);
        }

        let cipher_suite = self.group_config.cipher_suite;
        let hash = crypto_provider.hash(cipher_suite)?;
        let verifier = crypto_provider.signature(cipher_suite)?;

        let mut new_group = self.clone();
        let mut path_applied = false;

        for signed in &commit.proposals {
            match &signed.proposal {
                Proposal::Add {
                    credential,
                    leaf_index,
                } => new_group.apply_add(hash, verifier, credential, *leaf_index)?,
                Proposal::Remove { identity } => new_group.apply_remove(&commit.sender, identity)?,
                Proposal::Update { public_key } => {
                    // One path per commit
                    if path_applied {
                        return Err(Error::InvalidProposal);
                    }
                    let path = commit.path.as_ref().ok_or(Error::InvalidUpdatePath)?;
                    new_group.apply_update(hash, &commit.sender, public_key, path)?;
                    path_applied = true;
                }
            }
        }
        if commit.path.is_some() && !path_applied {
            return Err(Error::InvalidUpdatePath);
        }

        new_group.epoch += 1;
        new_group.confirmed_transcript_hash = new_group.hash_new_confirmed_transcript_hash(hash)?;

        Ok(new_group)
    }

    fn apply_add(
        &mut self,
        hash: &dyn Hash,
        verifier: &(impl Verifier + ?Sized),
        credential: &Credential,
        leaf_index: LeafIndex,
    ) -> Result<()> {
        if self.members.contains_key(credential.identity()) {
            return Err(Error::MemberExists(credential.identity().clone()));
        }
        credential.verify(verifier)?;
        let leaf_secret = NodeSecret::try_from(&credential.public_key()[..])?;

        // Both sides allocate leaves in the same order, so the proposal must
        // name the next free one
        if self.ratchet_tree.next_leaf_index()? != leaf_index {
            return Err(Error::InvalidProposal);
        }
        self.ratchet_tree.add_member(hash, leaf_secret)?;
        self.members.insert(
            credential.identity().clone(),
            Member {
                credential: credential.clone(),
                leaf_index,
            },
        );

        Ok(())
    }

    fn apply_remove(&mut self, remover: &Identity, target: &Identity) -> Result<()> {
        if remover == target {
            return Err(Error::InvalidRemover(remover.clone()));
        }
        let member = self
            .members
            .remove(target)
            .ok_or_else(|| Error::MemberNotFound(target.clone()))?;
        self.ratchet_tree.remove_member(member.leaf_index)?;

        Ok(())
    }

    fn apply_update(
        &mut self,
        hash: &dyn Hash,
        sender: &Identity,
        public_key: &HPKEPublicKey,
        path: &UpdatePath,
    ) -> Result<()> {
        let member = self
            .members
            .get_mut(sender)
            .ok_or_else(|| Error::SenderNotMember(sender.clone()))?;
        if member.credential.public_key() == public_key {
            return Err(Error::UnchangedLeafKey);
        }
        let leaf_secret = NodeSecret::try_from(&public_key[..])?;
        if path.leaf_index != member.leaf_index || path.leaf_secret != leaf_secret {
            return Err(Error::InvalidUpdatePath);
        }

        // Recompute rather than trust the sender's ancestors
        let expected = self
            .ratchet_tree
            .derive_update_path(hash, member.leaf_index, leaf_secret)?;
        if &expected != path {
            return Err(Error::InvalidUpdatePath);
        }

        self.ratchet_tree.apply_update_path(path)?;
        member.credential.set_public_key(public_key.clone());

        Ok(())
    }

    fn log_commit(&self, commit: &Commit) {
        for signed in &commit.proposals {
            log::debug!(
                "{} applied {} from {}, now at epoch {}",
                self.group_id,
                signed.proposal.proposal_type(),
                commit.sender,
                self.epoch
            );
            if let Proposal::Remove { identity } = &signed.proposal {
                log::warn!(
                    "{} removed {identity}, the root key is blank until a member updates",
                    self.group_id
                );
            }
        }
    }
}
