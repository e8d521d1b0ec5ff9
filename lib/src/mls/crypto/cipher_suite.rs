//! [RFC9420 Sec.5.1](https://www.rfc-editor.org/rfc/rfc9420.html#section-5.1) Cipher Suite specifies
//! the cryptographic primitives to be used in group key computations.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A cipher suite is the set of algorithms a group uses: the KEM for key
/// packages, the hash for the ratchet tree and transcripts, the AEAD for group
/// messages and the signature scheme for proposals and commits.
#[allow(non_camel_case_types)]
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum CipherSuite {
    #[default]
    X25519_XCHACHA20POLY1305_SHA256_Ed25519,
    Unknown(u16),
}

impl From<u16> for CipherSuite {
    fn from(v: u16) -> Self {
        match v {
            0x0001 => CipherSuite::X25519_XCHACHA20POLY1305_SHA256_Ed25519,
            _ => CipherSuite::Unknown(v),
        }
    }
}

impl From<CipherSuite> for u16 {
    fn from(val: CipherSuite) -> u16 {
        match val {
            CipherSuite::X25519_XCHACHA20POLY1305_SHA256_Ed25519 => 0x0001,
            CipherSuite::Unknown(v) => v,
        }
    }
}

impl Display for CipherSuite {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
