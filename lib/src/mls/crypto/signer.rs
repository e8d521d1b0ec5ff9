//! Signing capability seam.
//!
//! The group engine never touches a signing algorithm directly: it asks a
//! [`Signer`] (held by the acting member) to sign, and a [`Verifier`] (from the
//! crypto provider) to check signatures against a member's long-term
//! signature key. Both go through the labelled encoding of
//! [RFC9420 Sec.5.1.2](https://www.rfc-editor.org/rfc/rfc9420.html#section-5.1.2)
//! so a signature made for one purpose can't be replayed for another.

use bytes::{BufMut, Bytes};

use crate::mls::crypto::SignaturePublicKey;
use crate::mls::utilities::error::Result;
use crate::mls::utilities::serde::{serialize_opaque_vec, Serializer};

pub const LABEL_PROPOSAL: &[u8] = b"proposal";
pub const LABEL_COMMIT: &[u8] = b"commit";
pub const LABEL_CREDENTIAL: &[u8] = b"credential";
pub const LABEL_KEY_PACKAGE: &[u8] = b"key package";

const LABEL_PREFIX: &[u8] = b"cgka ";

/// Something that can produce signatures on behalf of one member.
pub trait Signer {
    /// The public half of the signing key, as listed in the member's credential.
    fn signature_key(&self) -> &SignaturePublicKey;

    fn sign(&self, message: &[u8]) -> Result<Bytes>;
}

/// Signature verification, independent of who signed.
pub trait Verifier {
    /// Returns [`crate::mls::utilities::error::Error::InvalidSignature`] when
    /// `signature` is not a valid signature of `message` under `public_key`.
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<()>;
}

/// ```text
/// struct {
///     opaque label<V>;
///     opaque content<V>;
/// } SignContent;
/// ```
struct SignContent<'a> {
    label: &'a [u8],
    content: &'a [u8],
}

impl Serializer for SignContent<'_> {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        let mut label = Vec::with_capacity(LABEL_PREFIX.len() + self.label.len());
        label.extend_from_slice(LABEL_PREFIX);
        label.extend_from_slice(self.label);

        serialize_opaque_vec(&label, buf)?;
        serialize_opaque_vec(self.content, buf)
    }
}

pub fn sign_with_label<S: Signer + ?Sized>(signer: &S, label: &[u8], content: &[u8]) -> Result<Bytes> {
    let sign_content = SignContent { label, content }.serialize_detached()?;
    signer.sign(&sign_content)
}

pub fn verify_with_label<V: Verifier + ?Sized>(
    verifier: &V,
    public_key: &[u8],
    label: &[u8],
    content: &[u8],
    signature: &[u8],
) -> Result<()> {
    let sign_content = SignContent { label, content }.serialize_detached()?;
    verifier.verify(public_key, &sign_content, signature)
}
