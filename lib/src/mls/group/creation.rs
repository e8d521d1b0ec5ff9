use std::collections::BTreeMap;

use crate::identifiers::{group::GroupIdentifier, Identifier};
use crate::mls::crypto::credential::{Credential, Identity};
use crate::mls::crypto::provider::CryptoProvider;
use crate::mls::crypto::signer::Signer;
use crate::mls::crypto::NodeSecret;
use crate::mls::group::config::GroupConfig;
use crate::mls::group::transcript::ConfirmedTranscriptHash;
use crate::mls::group::{Group, Member};
use crate::mls::key_package::KeyPackageBundle;
use crate::mls::ratchet_tree::RatchetTree;
use crate::mls::utilities::error::{Error, Result};
use crate::util::time::UnixTimestamp;

impl Group {
    /// An uninitialized group with a fresh random identifier.
    pub fn new(crypto_provider: &impl CryptoProvider, group_config: GroupConfig) -> Result<Self> {
        Self::with_group_id(crypto_provider, group_config, GroupIdentifier::generate_id())
    }

    /// An uninitialized group with a known identifier, e.g. a replica of a
    /// group created elsewhere.
    pub fn with_group_id(
        crypto_provider: &impl CryptoProvider,
        group_config: GroupConfig,
        group_id: GroupIdentifier,
    ) -> Result<Self> {
        group_config.validate()?;
        crypto_provider.check_supported(group_config.cipher_suite)?;

        Ok(Self {
            group_config,
            group_id,
            epoch: 0,
            ratchet_tree: RatchetTree::new(group_config.tree_depth)?,
            members: BTreeMap::new(),
            confirmed_transcript_hash: ConfirmedTranscriptHash::default(),
        })
    }

    /// Adds `creator` as leaf 0 and moves the group to epoch 1. Must be called
    /// exactly once, before anything else.
    pub fn initialize(
        &mut self,
        crypto_provider: &impl CryptoProvider,
        creator: Credential,
    ) -> Result<()> {
        if self.epoch != 0 {
            return Err(Error::AlreadyInitialized);
        }

        let cipher_suite = self.group_config.cipher_suite;
        creator.verify(crypto_provider.signature(cipher_suite)?)?;
        let leaf_secret = NodeSecret::try_from(&creator.public_key()[..])?;

        let mut new_group = self.clone();
        let leaf_index = new_group
            .ratchet_tree
            .add_member(crypto_provider.hash(cipher_suite)?, leaf_secret)?;
        new_group.members.insert(
            creator.identity().clone(),
            Member {
                credential: creator,
                leaf_index,
            },
        );
        new_group.epoch = 1;
        new_group.confirmed_transcript_hash =
            new_group.hash_new_confirmed_transcript_hash(crypto_provider.hash(cipher_suite)?)?;

        *self = new_group;
        log::info!("{} initialized at epoch {}", self.group_id, self.epoch);

        Ok(())
    }

    /// A signed key package for `identity`, so that it can be added to a group
    /// later without being online. Uses this group's cipher suite and key
    /// package lifetime.
    pub fn generate_key_package(
        &self,
        crypto_provider: &impl CryptoProvider,
        identity: impl Into<Identity>,
        signer: &(impl Signer + ?Sized),
    ) -> Result<KeyPackageBundle> {
        KeyPackageBundle::generate(
            crypto_provider,
            self.group_config.cipher_suite,
            identity,
            signer,
            self.group_config.key_package_lifetime,
            UnixTimestamp::now(),
        )
    }
}
