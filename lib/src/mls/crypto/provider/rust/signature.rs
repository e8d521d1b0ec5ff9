use bytes::Bytes;
use signature::Verifier as _;

use crate::crypto::rng::get_rng;
use crate::mls::crypto::signer::Verifier;
use crate::mls::crypto::{key_pair::SignatureKeyPair, provider::SignatureScheme, Key};
use crate::mls::utilities::error::{Error, Result};

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub(super) struct SignatureSchemeWrapper(pub(super) SignatureScheme);

impl crate::mls::crypto::provider::Signature for SignatureSchemeWrapper {
    fn signature_key_pair(&self) -> Result<SignatureKeyPair> {
        match self.0 {
            SignatureScheme::ED25519 => {
                let signing_key =
                    ed25519_dalek::SigningKey::generate(&mut get_rng()).to_keypair_bytes();
                let (private_key, public_key) =
                    signing_key.split_at(ed25519_dalek::SECRET_KEY_LENGTH);
                Ok(SignatureKeyPair {
                    private_key: Key::from(Bytes::copy_from_slice(private_key)),
                    public_key: Key::from(Bytes::copy_from_slice(public_key)),
                    signature_scheme: self.0,
                })
            }
        }
    }
}

impl Verifier for SignatureSchemeWrapper {
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<()> {
        match self.0 {
            SignatureScheme::ED25519 => {
                let public_key = <[u8; ed25519_dalek::PUBLIC_KEY_LENGTH]>::try_from(public_key)
                    .map_err(|_| Error::InvalidEd25519Key)?;
                let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(&public_key)
                    .map_err(|_| Error::InvalidEd25519Key)?;
                let signature = ed25519_dalek::Signature::from_slice(signature)?;
                verifying_key.verify(message, &signature)?;
                Ok(())
            }
        }
    }
}
