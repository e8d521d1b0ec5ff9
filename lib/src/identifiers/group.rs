use crate::util::uuid::generate_uuid;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Identifier, IdentifierError};

/// `GroupIdentifier` is the unique identifier of a group.
///
/// It is generated when the group is created and never changes, so it is
/// part of every commit and of the transcript hash.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct GroupIdentifier(Uuid);

impl AsRef<[u8]> for GroupIdentifier {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<Uuid> for GroupIdentifier {
    fn from(value: Uuid) -> Self {
        GroupIdentifier(value)
    }
}

impl TryFrom<&[u8]> for GroupIdentifier {
    type Error = IdentifierError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let uuid: Uuid = Uuid::from_slice(value).map_err(|_| IdentifierError::InvalidInput)?;

        Ok(GroupIdentifier::from(uuid))
    }
}

impl std::str::FromStr for GroupIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(GroupIdentifier)
            .map_err(|_| IdentifierError::InvalidInput)
    }
}

impl std::fmt::Display for GroupIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Group({})", self.0)
    }
}

impl Identifier for GroupIdentifier {
    fn generate_id() -> Self {
        GroupIdentifier(generate_uuid())
    }

    fn as_uuid(&self) -> Uuid {
        self.0
    }

    fn none() -> Self {
        GroupIdentifier(uuid::Uuid::nil())
    }
}
