use bytes::Bytes;
use chacha20poly1305::{
    aead::{Aead as _, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use hpke::{Kem as _, Serializable};

use crate::constants::{MESSAGE_NONCE_SIZE, NODE_SECRET_SIZE};
use crate::crypto::rng::random_bytes;
use crate::mls::crypto::key_pair::HPKEKeyPair;
use crate::mls::crypto::provider::HpkeSuite;
use crate::mls::crypto::{provider, Aead, Error, Key, Result};

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub(super) struct HpkeSuiteWrapper(pub(super) HpkeSuite);

impl HpkeSuiteWrapper {
    fn cipher(&self, key: &[u8], nonce: &[u8]) -> Result<(XChaCha20Poly1305, XNonce)> {
        match self.0.aead {
            Aead::AEAD_XCHACHA20POLY1305 => {
                if nonce.len() != MESSAGE_NONCE_SIZE {
                    return Err(Error::InvalidKeyLength {
                        expected: MESSAGE_NONCE_SIZE,
                        actual: nonce.len(),
                    });
                }
                let cipher =
                    XChaCha20Poly1305::new_from_slice(key).map_err(|_| Error::InvalidKeyLength {
                        expected: NODE_SECRET_SIZE,
                        actual: key.len(),
                    })?;

                Ok((cipher, XNonce::clone_from_slice(nonce)))
            }
        }
    }
}

impl provider::Hpke for HpkeSuiteWrapper {
    fn kem_generate_key_pair(&self) -> Result<HPKEKeyPair> {
        match self.0.kem {
            provider::Kem::KEM_X25519_HKDF_SHA256 => {
                let ikm = random_bytes::<32>();
                let (private_key, public_key) = hpke::kem::X25519HkdfSha256::derive_keypair(&ikm);
                Ok(HPKEKeyPair {
                    private_key: Key::from(private_key.to_bytes().to_vec()),
                    public_key: Key::from(public_key.to_bytes().to_vec()),
                })
            }
        }
    }

    fn aead_key_size(&self) -> usize {
        match self.0.aead {
            Aead::AEAD_XCHACHA20POLY1305 => NODE_SECRET_SIZE,
        }
    }

    fn aead_nonce_size(&self) -> usize {
        match self.0.aead {
            Aead::AEAD_XCHACHA20POLY1305 => MESSAGE_NONCE_SIZE,
        }
    }

    fn aead_open(
        &self,
        key: &[u8],
        nonce: &[u8],
        ciphertext: &[u8],
        additional_data: &[u8],
    ) -> Result<Bytes> {
        let (cipher, nonce) = self.cipher(key, nonce)?;
        let plaintext = cipher
            .decrypt(
                &nonce,
                Payload {
                    msg: ciphertext,
                    aad: additional_data,
                },
            )
            .map_err(|_| Error::DecryptionFailed)?;

        Ok(Bytes::from(plaintext))
    }

    fn aead_seal(
        &self,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
        additional_data: &[u8],
    ) -> Result<Bytes> {
        let (cipher, nonce) = self.cipher(key, nonce)?;
        let ciphertext = cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext,
                    aad: additional_data,
                },
            )
            .map_err(|_| Error::EncryptionFailed)?;

        Ok(Bytes::from(ciphertext))
    }
}
