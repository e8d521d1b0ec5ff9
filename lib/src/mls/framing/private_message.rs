use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::{MESSAGE_NONCE_SIZE, MESSAGE_TAG_SIZE};
use crate::crypto::rng::random_bytes;
use crate::mls::crypto::cipher_suite::CipherSuite;
use crate::mls::crypto::provider::CryptoProvider;
use crate::mls::crypto::NodeSecret;
use crate::mls::utilities::error::{Error, Result};

/// An application message sealed under a group root secret.
///
/// On the wire it is `nonce ‖ ciphertext`, where the ciphertext ends with the
/// AEAD tag. Nothing identifies the epoch: the reader has to know which root
/// secret to try.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PrivateMessage {
    pub nonce: [u8; MESSAGE_NONCE_SIZE],
    pub ciphertext: Bytes,
}

impl PrivateMessage {
    /// Encrypts `plaintext` under `key` with a fresh random nonce.
    pub fn seal(
        crypto_provider: &impl CryptoProvider,
        cipher_suite: CipherSuite,
        key: &NodeSecret,
        plaintext: &[u8],
    ) -> Result<Self> {
        let nonce = random_bytes::<MESSAGE_NONCE_SIZE>();
        let ciphertext =
            crypto_provider
                .hpke(cipher_suite)?
                .aead_seal(key.as_bytes(), &nonce, plaintext, &[])?;

        Ok(Self { nonce, ciphertext })
    }

    /// Fails with [`Error::DecryptionFailed`] unless `key` is the key the
    /// message was sealed with and the message is untouched.
    pub fn open(
        &self,
        crypto_provider: &impl CryptoProvider,
        cipher_suite: CipherSuite,
        key: &NodeSecret,
    ) -> Result<Bytes> {
        crypto_provider.hpke(cipher_suite)?.aead_open(
            key.as_bytes(),
            &self.nonce,
            &self.ciphertext,
            &[],
        )
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(MESSAGE_NONCE_SIZE + self.ciphertext.len());
        buf.put_slice(&self.nonce);
        buf.put_slice(&self.ciphertext);
        buf.freeze()
    }

    /// Splits `nonce ‖ ciphertext`. Anything too short to hold a nonce and a
    /// tag can't authenticate and is refused as [`Error::DecryptionFailed`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MESSAGE_NONCE_SIZE + MESSAGE_TAG_SIZE {
            return Err(Error::DecryptionFailed);
        }
        let (nonce, ciphertext) = bytes.split_at(MESSAGE_NONCE_SIZE);
        let nonce = <[u8; MESSAGE_NONCE_SIZE]>::try_from(nonce).map_err(|_| Error::DecryptionFailed)?;

        Ok(Self {
            nonce,
            ciphertext: Bytes::copy_from_slice(ciphertext),
        })
    }
}
