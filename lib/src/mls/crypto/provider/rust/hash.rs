use bytes::Bytes;
use sha2::{Digest, Sha256};

use crate::mls::crypto::provider::HashScheme;

#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub(super) struct HashSchemeWrapper(pub(super) HashScheme);

impl crate::mls::crypto::provider::Hash for HashSchemeWrapper {
    fn size(&self) -> usize {
        match self.0 {
            HashScheme::SHA256 => 32,
        }
    }

    fn digest(&self, data: &[u8]) -> Bytes {
        match self.0 {
            HashScheme::SHA256 => {
                let mut h = Sha256::new();
                h.update(data);
                Bytes::from(h.finalize().to_vec())
            }
        }
    }
}
