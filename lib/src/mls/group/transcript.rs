use bytes::{BufMut, Bytes, BytesMut};

use crate::identifiers::group::GroupIdentifier;
use crate::mls::crypto::provider::Hash;
use crate::mls::utilities::{
    error::{Error, Result},
    serde::{serialize_opaque_vec, Serializer},
};

use super::Group;

/// Running digest over the history of the group, one link per epoch.
///
/// ```text
/// confirmed_transcript_hash_[0] = "";
/// confirmed_transcript_hash_[n] =
///     Hash(confirmed_transcript_hash_[n - 1] || TranscriptHashInput_[n]);
/// ```
///
/// This is an audit trail over group id, epoch and member count only. It
/// does not commit to the content of the commits.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct ConfirmedTranscriptHash(pub(crate) Bytes);

impl ConfirmedTranscriptHash {
    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }
}

/// ```text
/// struct {
///     opaque group_id<V>;
///     uint64 epoch;
///     uint32 member_count;
/// } TranscriptHashInput;
/// ```
struct TranscriptHashInput<'a> {
    group_id: &'a GroupIdentifier,
    epoch: u64,
    member_count: u32,
}

impl Serializer for TranscriptHashInput<'_> {
    fn serialize<B>(&self, buf: &mut B) -> Result<()>
    where
        Self: Sized,
        B: BufMut,
    {
        serialize_opaque_vec(self.group_id.as_ref(), buf)?;
        buf.put_u64(self.epoch);
        buf.put_u32(self.member_count);
        Ok(())
    }
}

impl Group {
    /// Chains the group's current id, epoch and member count onto the
    /// transcript. Called once the epoch has been advanced.
    pub(crate) fn hash_new_confirmed_transcript_hash(
        &self,
        hash: &dyn Hash,
    ) -> Result<ConfirmedTranscriptHash> {
        let member_count = u32::try_from(self.members.len())
            .map_err(|_| Error::OpaqueSizeExceedsMaximumValueOfU32)?;
        let input = TranscriptHashInput {
            group_id: &self.group_id,
            epoch: self.epoch,
            member_count,
        }
        .serialize_detached()?;

        let mut buf = BytesMut::with_capacity(self.confirmed_transcript_hash.0.len() + input.len());
        buf.put_slice(&self.confirmed_transcript_hash.0);
        buf.put_slice(&input);

        Ok(ConfirmedTranscriptHash(hash.digest(&buf)))
    }
}
