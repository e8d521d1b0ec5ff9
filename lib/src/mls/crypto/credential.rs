//! [RFC9420 Sec.5.3](https://www.rfc-editor.org/rfc/rfc9420.html#section-5.3) Each member of a group
//! presents a credential that provides one or more identities for the member and associates them
//! with the member's signing key.

use bytes::{BufMut, Bytes};

use crate::mls::crypto::signer::{
    sign_with_label, verify_with_label, Signer, Verifier, LABEL_CREDENTIAL,
};
use crate::mls::crypto::{HPKEPublicKey, SignaturePublicKey};
use crate::mls::utilities::{
    error::{Error, Result},
    serde::{serialize_opaque_vec, serialize_optional, Serializer},
};

/// The unique handle a member is known by inside a group.
#[derive(
    Default,
    Debug,
    Clone,
    Eq,
    PartialEq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Identity(String);

impl Identity {
    /// Creates a new Identity
    pub fn new<T: Into<String>>(identity: T) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serializer for Identity {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        serialize_opaque_vec(self.0.as_bytes(), buf)
    }
}

/// A member's long-term identity.
///
/// `public_key` is the member's current leaf key in the ratchet tree and is
/// replaced whenever the member rotates its key. `signature_key` never
/// changes: proposals and commits from this member are verified against it.
#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Credential {
    identity: Identity,
    public_key: HPKEPublicKey,
    signature_key: SignaturePublicKey,
    signature: Option<Bytes>,
}

/// ```text
/// struct {
///     opaque identity<V>;
///     opaque public_key<V>;
///     opaque signature_key<V>;
/// } CredentialTBS;
/// ```
struct CredentialTbs<'a> {
    identity: &'a Identity,
    public_key: &'a HPKEPublicKey,
    signature_key: &'a SignaturePublicKey,
}

impl Serializer for CredentialTbs<'_> {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        self.identity.serialize(buf)?;
        self.public_key.serialize(buf)?;
        self.signature_key.serialize(buf)
    }
}

impl Credential {
    /// An unsigned credential.
    pub fn new(
        identity: impl Into<Identity>,
        public_key: HPKEPublicKey,
        signature_key: SignaturePublicKey,
    ) -> Self {
        Self {
            identity: identity.into(),
            public_key,
            signature_key,
            signature: None,
        }
    }

    /// A credential self-signed by `signer`, whose public key becomes the
    /// credential's signature key.
    pub fn signed(
        identity: impl Into<Identity>,
        public_key: HPKEPublicKey,
        signer: &(impl Signer + ?Sized),
    ) -> Result<Self> {
        let mut credential = Self::new(identity, public_key, signer.signature_key().clone());
        let tbs = credential.tbs().serialize_detached()?;
        credential.signature = Some(sign_with_label(signer, LABEL_CREDENTIAL, &tbs)?);

        Ok(credential)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn public_key(&self) -> &HPKEPublicKey {
        &self.public_key
    }

    pub fn signature_key(&self) -> &SignaturePublicKey {
        &self.signature_key
    }

    pub fn signature(&self) -> Option<&Bytes> {
        self.signature.as_ref()
    }

    /// Replaces the leaf key after a key update. The self-signature covered
    /// the old key, so it is dropped.
    pub(crate) fn set_public_key(&mut self, public_key: HPKEPublicKey) {
        self.public_key = public_key;
        self.signature = None;
    }

    /// Checks the self-signature, if the credential carries one.
    pub fn verify(&self, verifier: &(impl Verifier + ?Sized)) -> Result<()> {
        let Some(signature) = &self.signature else {
            return Ok(());
        };
        let tbs = self.tbs().serialize_detached()?;

        verify_with_label(verifier, &self.signature_key, LABEL_CREDENTIAL, &tbs, signature)
            .map_err(|_| Error::InvalidSignature)
    }

    fn tbs(&self) -> CredentialTbs<'_> {
        CredentialTbs {
            identity: &self.identity,
            public_key: &self.public_key,
            signature_key: &self.signature_key,
        }
    }
}

impl Serializer for Credential {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        self.tbs().serialize(buf)?;
        serialize_optional(self.signature.is_some(), buf)?;
        if let Some(signature) = &self.signature {
            serialize_opaque_vec(signature, buf)?;
        }

        Ok(())
    }
}
