//! [RFC9420 Sec.10](https://www.rfc-editor.org/rfc/rfc9420.html#section-10) Key packages let a
//! member be added to a group while offline.
//!
//! The invitee publishes a [`KeyPackage`] (public keys, credential, validity
//! window, signature) and keeps the matching [`KeyPackageBundle`]. A package is
//! meant to be consumed by exactly one add and stops being accepted once its
//! `expires_at` has passed.

use std::time::Duration;

use bytes::{BufMut, Bytes};
use uuid::Uuid;

use crate::mls::crypto::cipher_suite::CipherSuite;
use crate::mls::crypto::credential::{Credential, Identity};
use crate::mls::crypto::key_pair::HPKEKeyPair;
use crate::mls::crypto::provider::CryptoProvider;
use crate::mls::crypto::signer::{
    sign_with_label, verify_with_label, Signer, Verifier, LABEL_KEY_PACKAGE,
};
use crate::mls::crypto::HPKEPublicKey;
use crate::mls::utilities::{
    error::{Error, Result},
    serde::{serialize_opaque_vec, Serializer},
};
use crate::util::{time::UnixTimestamp, uuid::generate_uuid};

#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyPackage {
    pub id: Uuid,
    pub cipher_suite: CipherSuite,
    pub credential: Credential,
    pub hpke_key: HPKEPublicKey,
    pub init_key: HPKEPublicKey,
    pub created_at: UnixTimestamp,
    pub expires_at: UnixTimestamp,
    pub signature: Bytes,
}

/// ```text
/// struct {
///     opaque id[16];
///     CipherSuite cipher_suite;
///     Credential credential;
///     HPKEPublicKey hpke_key;
///     HPKEPublicKey init_key;
///     uint64 created_at;
///     uint64 expires_at;
/// } KeyPackageTBS;
/// ```
struct KeyPackageTbs<'a> {
    id: &'a Uuid,
    cipher_suite: CipherSuite,
    credential: &'a Credential,
    hpke_key: &'a HPKEPublicKey,
    init_key: &'a HPKEPublicKey,
    created_at: UnixTimestamp,
    expires_at: UnixTimestamp,
}

impl Serializer for KeyPackageTbs<'_> {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        buf.put_slice(self.id.as_bytes());
        buf.put_u16(self.cipher_suite.into());
        self.credential.serialize(buf)?;
        self.hpke_key.serialize(buf)?;
        self.init_key.serialize(buf)?;
        buf.put_slice(&self.created_at.to_be_bytes());
        buf.put_slice(&self.expires_at.to_be_bytes());

        Ok(())
    }
}

impl KeyPackage {
    fn tbs(&self) -> KeyPackageTbs<'_> {
        KeyPackageTbs {
            id: &self.id,
            cipher_suite: self.cipher_suite,
            credential: &self.credential,
            hpke_key: &self.hpke_key,
            init_key: &self.init_key,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }

    pub fn identity(&self) -> &Identity {
        self.credential.identity()
    }

    pub fn is_expired(&self, now: UnixTimestamp) -> bool {
        now >= self.expires_at
    }

    /// Refuses packages past `expires_at` and packages whose signature does
    /// not verify under the credential's signature key.
    pub fn validate(&self, verifier: &(impl Verifier + ?Sized), now: UnixTimestamp) -> Result<()> {
        if self.is_expired(now) {
            return Err(Error::KeyPackageExpired);
        }

        let tbs = self.tbs().serialize_detached()?;
        verify_with_label(
            verifier,
            self.credential.signature_key(),
            LABEL_KEY_PACKAGE,
            &tbs,
            &self.signature,
        )
        .map_err(|_| Error::InvalidSignature)?;

        self.credential.verify(verifier)
    }
}

impl Serializer for KeyPackage {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        self.tbs().serialize(buf)?;
        serialize_opaque_vec(&self.signature, buf)
    }
}

/// A published key package together with the private keys only the invitee
/// holds.
#[derive(Debug, Clone)]
pub struct KeyPackageBundle {
    pub key_package: KeyPackage,
    pub hpke_key_pair: HPKEKeyPair,
    pub init_key_pair: HPKEKeyPair,
}

impl KeyPackageBundle {
    /// Fresh HPKE and init key pairs, a self-signed credential for `identity`
    /// and a package signed by `signer`, valid from `now` for `lifetime`.
    pub fn generate(
        crypto_provider: &impl CryptoProvider,
        cipher_suite: CipherSuite,
        identity: impl Into<Identity>,
        signer: &(impl Signer + ?Sized),
        lifetime: Duration,
        now: UnixTimestamp,
    ) -> Result<Self> {
        crypto_provider.check_supported(cipher_suite)?;

        let hpke = crypto_provider.hpke(cipher_suite)?;
        let hpke_key_pair = hpke.kem_generate_key_pair()?;
        let init_key_pair = hpke.kem_generate_key_pair()?;

        let credential = Credential::signed(identity, hpke_key_pair.public_key.clone(), signer)?;

        let mut key_package = KeyPackage {
            id: generate_uuid(),
            cipher_suite,
            credential,
            hpke_key: hpke_key_pair.public_key.clone(),
            init_key: init_key_pair.public_key.clone(),
            created_at: now,
            expires_at: now.saturating_add(lifetime),
            signature: Bytes::new(),
        };
        let tbs = key_package.tbs().serialize_detached()?;
        key_package.signature = sign_with_label(signer, LABEL_KEY_PACKAGE, &tbs)?;

        Ok(Self {
            key_package,
            hpke_key_pair,
            init_key_pair,
        })
    }
}
