mod hash;
mod hpke;
mod signature;

use self::hash::HashSchemeWrapper;
use self::hpke::HpkeSuiteWrapper;
use self::signature::SignatureSchemeWrapper;
use super::{
    Aead, CipherSuite, CryptoProvider, Error, Hash, HashScheme, Hpke, HpkeSuite, Kem, Result,
    Signature, SignatureScheme,
};

struct CipherSuiteDescription {
    hash: HashSchemeWrapper,
    hpke: HpkeSuiteWrapper,
    signature: SignatureSchemeWrapper,
}

static CIPHER_SUITE_DESCRIPTIONS: [CipherSuiteDescription; 1] = [
    //1: CipherSuite::X25519_XCHACHA20POLY1305_SHA256_Ed25519,
    CipherSuiteDescription {
        hash: HashSchemeWrapper(HashScheme::SHA256),
        hpke: HpkeSuiteWrapper(HpkeSuite {
            kem: Kem::KEM_X25519_HKDF_SHA256,
            aead: Aead::AEAD_XCHACHA20POLY1305,
        }),
        signature: SignatureSchemeWrapper(SignatureScheme::ED25519),
    },
];

/// [RustCrypto](https://github.com/RustCrypto) based crypto provider
#[derive(Default, Debug, Clone, Copy)]
pub struct RustCryptoProvider;

impl RustCryptoProvider {
    fn description(&self, cipher_suite: CipherSuite) -> Result<&'static CipherSuiteDescription> {
        if !self.supports(cipher_suite) {
            return Err(Error::UnsupportedCipherSuite);
        }
        let index: u16 = cipher_suite.into();
        CIPHER_SUITE_DESCRIPTIONS
            .get(usize::from(index) - 1)
            .ok_or(Error::UnsupportedCipherSuite)
    }
}

impl CryptoProvider for RustCryptoProvider {
    fn supports(&self, cipher_suite: CipherSuite) -> bool {
        matches!(
            cipher_suite,
            CipherSuite::X25519_XCHACHA20POLY1305_SHA256_Ed25519
        )
    }

    fn supported(&self) -> Vec<CipherSuite> {
        vec![CipherSuite::X25519_XCHACHA20POLY1305_SHA256_Ed25519]
    }

    fn hash(&self, cipher_suite: CipherSuite) -> Result<&dyn Hash> {
        Ok(&self.description(cipher_suite)?.hash)
    }

    fn hpke(&self, cipher_suite: CipherSuite) -> Result<&dyn Hpke> {
        Ok(&self.description(cipher_suite)?.hpke)
    }

    fn signature(&self, cipher_suite: CipherSuite) -> Result<&dyn Signature> {
        Ok(&self.description(cipher_suite)?.signature)
    }
}
