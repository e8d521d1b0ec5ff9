//! Canonical encoding of to-be-signed and to-be-hashed content.
//!
//! Lengths use the variable-size integers of
//! [RFC9420 Sec.2.1.2](https://www.rfc-editor.org/rfc/rfc9420.html#section-2.1.2).
//! Only the encoding direction exists: these bytes are fed to signatures and
//! hashes, never sent over the wire.

use bytes::{BufMut, Bytes, BytesMut};

use crate::mls::utilities::error::{Error, Result};

#[allow(clippy::cast_possible_truncation)] // truncation is intended here
#[inline]
pub fn serialize_varint<B: BufMut>(n: u32, buf: &mut B) -> Result<()> {
    if n < (1 << 6) {
        buf.put_u8(n as u8);
    } else if n < (1 << 14) {
        buf.put_u16(0b01 << 14 | (n as u16));
    } else if n < (1 << 30) {
        buf.put_u32(0b10 << 30 | n);
    } else {
        return Err(Error::VarintExceeds30Bits);
    }
    Ok(())
}

#[inline]
pub fn serialize_opaque_vec<B: BufMut>(v: &[u8], buf: &mut B) -> Result<()> {
    let len = u32::try_from(v.len()).map_err(|_| Error::OpaqueSizeExceedsMaximumValueOfU32)?;

    serialize_varint(len, buf)?;

    buf.put(v);

    Ok(())
}

#[inline]
pub fn serialize_vector<B: BufMut>(
    n: usize,
    buf: &mut B,
    mut f: impl FnMut(usize, &mut BytesMut) -> Result<()>,
) -> Result<()> {
    // The vector is prefixed with its encoded size, which isn't known until
    // every element has been written
    let mut child = BytesMut::new();
    for i in 0..n {
        f(i, &mut child)?;
    }

    serialize_opaque_vec(&child.freeze(), buf)
}

#[inline]
pub fn serialize_optional<B: BufMut>(present: bool, buf: &mut B) -> Result<()> {
    buf.put_u8(u8::from(present));
    Ok(())
}

pub trait Serializer {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut;

    fn serialize_detached(&self) -> Result<Bytes>
    where
        Self: Sized,
    {
        let mut buf = BytesMut::new();
        self.serialize(&mut buf)?;
        Ok(buf.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint(n: u32) -> Result<Vec<u8>> {
        let mut buf = BytesMut::new();
        serialize_varint(n, &mut buf)?;
        Ok(buf.to_vec())
    }

    #[test]
    fn varint_uses_minimal_encoding() -> Result<()> {
        // Vectors from RFC9000 Sec.A.1
        assert_eq!(varint(37)?, vec![0x25], "one byte form");
        assert_eq!(varint(15_293)?, vec![0x7b, 0xbd], "two byte form");
        assert_eq!(
            varint(494_878_333)?,
            vec![0x9d, 0x7f, 0x3e, 0x7d],
            "four byte form"
        );
        assert_eq!(
            varint(1 << 30),
            Err(Error::VarintExceeds30Bits),
            "eight byte form is not allowed"
        );
        Ok(())
    }

    #[test]
    fn opaque_vec_is_length_prefixed() -> Result<()> {
        let mut buf = BytesMut::new();
        serialize_opaque_vec(b"abc", &mut buf)?;
        serialize_optional(false, &mut buf)?;

        assert_eq!(buf.as_ref(), &[3, b'a', b'b', b'c', 0], "prefix, data, absent flag");
        Ok(())
    }

    #[test]
    fn vector_prefix_covers_all_elements() -> Result<()> {
        let items: [&[u8]; 2] = [b"x", b"yz"];
        let mut buf = BytesMut::new();
        serialize_vector(items.len(), &mut buf, |i, b| serialize_opaque_vec(items[i], b))?;

        assert_eq!(
            buf.as_ref(),
            &[5, 1, b'x', 2, b'y', b'z'],
            "outer prefix is the byte length of the encoded elements"
        );
        Ok(())
    }
}
