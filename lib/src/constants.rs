use std::time::Duration;

/// Size in bytes of every ratchet tree node secret, and therefore of the
/// group root key used for message encryption.
pub const NODE_SECRET_SIZE: usize = 32;

/// XChaCha20-Poly1305 nonce size, prefixed to every group message.
pub const MESSAGE_NONCE_SIZE: usize = 24;

/// Poly1305 authentication tag size.
pub const MESSAGE_TAG_SIZE: usize = 16;

/// Trees hold `2^DEFAULT_TREE_DEPTH` leaves unless configured otherwise.
pub const DEFAULT_TREE_DEPTH: u8 = 16;

pub const MAX_TREE_DEPTH: u8 = 32;

/// Key packages are valid for 24 hours after creation.
pub const KEY_PACKAGE_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);
