use bytes::Bytes;
use signature::Signer as _;

use crate::mls::crypto::provider::SignatureScheme;
use crate::mls::crypto::signer::Signer;
use crate::mls::crypto::{HPKEPrivateKey, HPKEPublicKey, SignaturePrivateKey, SignaturePublicKey};
use crate::mls::utilities::error::{Error, Result};

#[derive(Clone, Eq, PartialEq)]
pub struct HPKEKeyPair {
    pub private_key: HPKEPrivateKey,
    pub public_key: HPKEPublicKey,
}

impl std::fmt::Debug for HPKEKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HPKEKeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// A member's long-term signing key pair. This is the [`Signer`] members hand
/// to the group when they commit.
#[derive(Clone, Eq, PartialEq)]
pub struct SignatureKeyPair {
    pub(crate) private_key: SignaturePrivateKey,
    pub(crate) public_key: SignaturePublicKey,
    pub(crate) signature_scheme: SignatureScheme,
}

impl SignatureKeyPair {
    pub fn public_key(&self) -> &SignaturePublicKey {
        &self.public_key
    }

    pub fn signature_scheme(&self) -> SignatureScheme {
        self.signature_scheme
    }
}

impl std::fmt::Debug for SignatureKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureKeyPair")
            .field("public_key", &self.public_key)
            .field("signature_scheme", &self.signature_scheme)
            .finish_non_exhaustive()
    }
}

impl Signer for SignatureKeyPair {
    fn signature_key(&self) -> &SignaturePublicKey {
        &self.public_key
    }

    fn sign(&self, message: &[u8]) -> Result<Bytes> {
        match self.signature_scheme {
            SignatureScheme::ED25519 => {
                let secret_key = <[u8; ed25519_dalek::SECRET_KEY_LENGTH]>::try_from(
                    &self.private_key[..],
                )
                .map_err(|_| Error::InvalidEd25519Key)?;
                let private_key = ed25519_dalek::SigningKey::from_bytes(&secret_key);
                let signature: ed25519_dalek::Signature = private_key.sign(message);
                Ok(Bytes::from(signature.to_vec()))
            }
        }
    }
}
