//! Pluggable cryptography.
//!
//! Everything the group engine hashes, encrypts or verifies goes through a
//! [`CryptoProvider`], selected per [`CipherSuite`]. [`RustCryptoProvider`] is
//! the default implementation.

use bytes::Bytes;

use crate::constants::{MESSAGE_NONCE_SIZE, NODE_SECRET_SIZE};
use crate::mls::crypto::cipher_suite::CipherSuite;
use crate::mls::crypto::key_pair::{HPKEKeyPair, SignatureKeyPair};
use crate::mls::crypto::signer::Verifier;
use crate::mls::crypto::{Aead, Kem};
use crate::mls::utilities::error::{Error, Result};

mod rust;

pub use self::rust::RustCryptoProvider;

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub enum HashScheme {
    #[default]
    SHA256,
}

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub enum SignatureScheme {
    #[default]
    ED25519,
}

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct HpkeSuite {
    pub kem: Kem,
    pub aead: Aead,
}

pub trait Hash {
    fn size(&self) -> usize;

    fn digest(&self, data: &[u8]) -> Bytes;
}

pub trait Hpke {
    /// Fresh KEM key pair from OS randomness.
    fn kem_generate_key_pair(&self) -> Result<HPKEKeyPair>;

    fn aead_key_size(&self) -> usize;

    fn aead_nonce_size(&self) -> usize;

    fn aead_open(
        &self,
        key: &[u8],
        nonce: &[u8],
        ciphertext: &[u8],
        additional_data: &[u8],
    ) -> Result<Bytes>;

    fn aead_seal(
        &self,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
        additional_data: &[u8],
    ) -> Result<Bytes>;
}

pub trait Signature: Verifier {
    fn signature_key_pair(&self) -> Result<SignatureKeyPair>;
}

pub trait CryptoProvider {
    fn supports(&self, cipher_suite: CipherSuite) -> bool;

    fn supported(&self) -> Vec<CipherSuite>;

    fn hash(&self, cipher_suite: CipherSuite) -> Result<&dyn Hash>;

    fn hpke(&self, cipher_suite: CipherSuite) -> Result<&dyn Hpke>;

    fn signature(&self, cipher_suite: CipherSuite) -> Result<&dyn Signature>;

    /// Fails with [`Error::UnsupportedCipherSuite`] for suites this provider
    /// doesn't implement, and for suites whose sizes don't fit the ratchet
    /// tree: parents are hash outputs and the root is used as the message key,
    /// so both must be node sized.
    fn check_supported(&self, cipher_suite: CipherSuite) -> Result<()> {
        if !self.supports(cipher_suite) {
            return Err(Error::UnsupportedCipherSuite);
        }

        let hpke = self.hpke(cipher_suite)?;
        if self.hash(cipher_suite)?.size() != NODE_SECRET_SIZE
            || hpke.aead_key_size() != NODE_SECRET_SIZE
            || hpke.aead_nonce_size() != MESSAGE_NONCE_SIZE
        {
            return Err(Error::UnsupportedCipherSuite);
        }
        Ok(())
    }
}
