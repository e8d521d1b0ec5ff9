use crate::mls::crypto::credential::Identity;

/// Errors returned by the group key agreement engine.
///
/// All of them are local validation failures: nothing is retried internally,
/// and an operation that fails leaves the group and its ratchet tree exactly
/// as they were.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Membership
    #[error("{0} is already a member of the group")]
    MemberExists(Identity),
    #[error("{0} is not a member of the group")]
    MemberNotFound(Identity),
    #[error("{0} is not a member and cannot add members")]
    AdderNotAuthorized(Identity),
    #[error("{0} cannot remove this member (non-members cannot remove, nor can members remove themselves)")]
    InvalidRemover(Identity),
    #[error("{0} is not a member and cannot send messages")]
    SenderNotMember(Identity),

    // Lifecycle
    #[error("the group has already been initialized")]
    AlreadyInitialized,
    #[error("the group must be initialized first")]
    NotInitialized,

    // Ratchet tree
    #[error("no leaf at index {0}")]
    LeafNotFound(u32),
    #[error("the ratchet tree is full")]
    TreeFull,
    #[error("update path does not match the ratchet tree")]
    InvalidUpdatePath,
    #[error("key update must replace the current leaf key")]
    UnchangedLeafKey,
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    // Commits and signatures
    #[error("commit belongs to a different group")]
    WrongGroup,
    #[error("commit was formed against epoch {actual}, but the group is at epoch {expected}")]
    StaleCommit { expected: u64, actual: u64 },
    #[error("commit contains no proposals")]
    EmptyCommit,
    #[error("proposal is not valid in this commit")]
    InvalidProposal,
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("signer does not hold the signature key of the acting member")]
    SignatureKeyMismatch,

    // Messages and key packages
    #[error("message could not be decrypted (wrong epoch key, tampered or corrupted input)")]
    DecryptionFailed,
    #[error("message could not be encrypted")]
    EncryptionFailed,
    #[error("key package has expired")]
    KeyPackageExpired,

    // Registry
    #[error("a group with this identifier is already registered")]
    GroupExists,
    #[error("no group with this identifier is registered")]
    UnknownGroup,

    // Crypto provider and configuration
    #[error("cipher suite is not supported by this crypto provider")]
    UnsupportedCipherSuite,
    #[error("invalid Ed25519 key")]
    InvalidEd25519Key,
    #[error("invalid group configuration: {0}")]
    InvalidConfig(String),

    // Encoding
    #[error("varint exceeds 30 bits")]
    VarintExceeds30Bits,
    #[error("opaque size exceeds maximum value of u32")]
    OpaqueSizeExceedsMaximumValueOfU32,
}

impl From<ed25519_dalek::SignatureError> for Error {
    fn from(_: ed25519_dalek::SignatureError) -> Self {
        Error::InvalidSignature
    }
}

pub type Result<T> = std::result::Result<T, Error>;
