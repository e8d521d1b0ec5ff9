//! Structures for unique identifiers, based around UUIDs.
pub use uuid::Uuid;

pub mod group;

pub use group::GroupIdentifier;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("The input cannot be converted to a UUID")]
    InvalidInput,
}

pub const IDENTIFIER_BYTES: usize = 16;

pub trait Identifier {
    fn generate_id() -> Self;
    fn as_uuid(&self) -> Uuid;
    fn to_bytes(&self) -> [u8; IDENTIFIER_BYTES] {
        self.as_uuid().into_bytes()
    }
    /// Returns empty ID.
    fn none() -> Self;
}
