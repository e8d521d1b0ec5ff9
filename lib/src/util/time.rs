use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Millisecond precise UNIX timestamp.
///
/// Key packages carry two of these (`created_at` and `expires_at`), and
/// comparing them is how expiry is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimestamp(u64);

impl UnixTimestamp {
    pub const fn nil() -> Self {
        Self(0)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// The current wall clock time.
    pub fn now() -> Self {
        Self::from(uuid::Timestamp::now(uuid::NoContext))
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Saturates instead of overflowing for absurdly large durations.
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }

    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl From<uuid::Timestamp> for UnixTimestamp {
    fn from(value: uuid::Timestamp) -> Self {
        let (secs, nanos) = value.to_unix();

        Self(
            secs.saturating_mul(1000)
                .saturating_add(u64::from(nanos / 1_000_000)),
        )
    }
}

impl std::fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
