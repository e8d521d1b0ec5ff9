//! [RFC9420 Sec.5](https://www.rfc-editor.org/rfc/rfc9420.html#section-5) Cryptographic Objects

use bytes::{BufMut, Bytes};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::NODE_SECRET_SIZE;
use crate::mls::utilities::{
    error::{Error, Result},
    serde::{serialize_opaque_vec, Serializer},
};

pub mod cipher_suite;
pub mod credential;
pub mod key_pair;
pub mod provider;
pub mod signer;

#[derive(Default, Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Key(Bytes);

impl Deref for Key {
    type Target = Bytes;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Bytes> for Key {
    fn from(value: Bytes) -> Self {
        Self(value)
    }
}

impl From<Vec<u8>> for Key {
    fn from(value: Vec<u8>) -> Self {
        Self(Bytes::from(value))
    }
}

impl From<&[u8]> for Key {
    fn from(value: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(value))
    }
}

impl Serializer for Key {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        serialize_opaque_vec(&self.0, buf)
    }
}

/// HPKE public keys are opaque values in a format defined by the KEM
/// (X25519 here, so 32 bytes).
pub type HPKEPublicKey = Key;
pub type HPKEPrivateKey = Key;

/// Signature public keys are opaque values in the format of the cipher
/// suite's signature scheme (Ed25519 here).
pub type SignaturePublicKey = Key;
pub type SignaturePrivateKey = Key;

/// A 32-byte ratchet tree node value.
///
/// Leaves hold a member's current public key, parents hold the hash of their
/// two children, and the root doubles as the group's message encryption key.
/// The bytes are wiped when the value is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct NodeSecret([u8; NODE_SECRET_SIZE]);

impl NodeSecret {
    /// The value missing nodes are read as.
    pub fn zero() -> Self {
        Self([0u8; NODE_SECRET_SIZE])
    }

    pub fn from_array(bytes: [u8; NODE_SECRET_SIZE]) -> Self {
        Self(bytes)
    }

    /// Handle with care: these are the raw secret bytes.
    pub fn as_bytes(&self) -> &[u8; NODE_SECRET_SIZE] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl TryFrom<&[u8]> for NodeSecret {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        let bytes: [u8; NODE_SECRET_SIZE] =
            value.try_into().map_err(|_| Error::InvalidKeyLength {
                expected: NODE_SECRET_SIZE,
                actual: value.len(),
            })?;

        Ok(Self(bytes))
    }
}

impl std::fmt::Debug for NodeSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeSecret([REDACTED])")
    }
}

/// [RFC9420 Sec.5.1](https://www.rfc-editor.org/rfc/rfc9420.html#section-5.1) Key Encapsulation
/// Mechanism (KEM) of HPKE parameters
#[allow(non_camel_case_types)]
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u16)]
pub enum Kem {
    #[default]
    /// `KEM_X25519_HKDF_SHA256` is a KEM using X25519 Diffie-Hellman function
    /// and HKDF with SHA-256.
    KEM_X25519_HKDF_SHA256 = 0x20,
}

/// Authenticated Encryption with Associated Data (AEAD) algorithm used for
/// group messages.
#[allow(non_camel_case_types)]
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u16)]
pub enum Aead {
    #[default]
    /// `XChaCha20-Poly1305`, 256-bit key and 192-bit nonce. Nonces are large
    /// enough to be picked at random for every message.
    AEAD_XCHACHA20POLY1305 = 0xFF01,
}
