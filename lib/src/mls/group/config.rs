use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TREE_DEPTH, KEY_PACKAGE_LIFETIME, MAX_TREE_DEPTH};
use crate::mls::crypto::cipher_suite::CipherSuite;
use crate::mls::utilities::error::{Error, Result};

/// Parameters fixed for the lifetime of a group.
///
/// Deserializes with defaults for every missing field, so `{}` is a valid
/// config. The key package lifetime is written as whole seconds.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    pub(crate) cipher_suite: CipherSuite,
    pub(crate) tree_depth: u8,
    #[serde(with = "duration_secs")]
    pub(crate) key_package_lifetime: Duration,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            cipher_suite: CipherSuite::default(),
            tree_depth: DEFAULT_TREE_DEPTH,
            key_package_lifetime: KEY_PACKAGE_LIFETIME,
        }
    }
}

impl GroupConfig {
    /// Create a group config builder
    pub fn builder() -> GroupConfigBuilder {
        GroupConfigBuilder::new()
    }

    pub fn cipher_suite(&self) -> CipherSuite {
        self.cipher_suite
    }

    pub fn tree_depth(&self) -> u8 {
        self.tree_depth
    }

    pub fn key_package_lifetime(&self) -> Duration {
        self.key_package_lifetime
    }

    /// Checks values that may have come from an untrusted source, such as a
    /// deserialized config file.
    pub fn validate(&self) -> Result<()> {
        if self.tree_depth == 0 || self.tree_depth > MAX_TREE_DEPTH {
            return Err(Error::InvalidConfig(format!(
                "tree_depth must be between 1 and {MAX_TREE_DEPTH}, got {}",
                self.tree_depth
            )));
        }
        if self.key_package_lifetime.is_zero() {
            return Err(Error::InvalidConfig(
                "key_package_lifetime must not be zero".to_owned(),
            ));
        }

        Ok(())
    }
}

#[derive(Default, Debug)]
pub struct GroupConfigBuilder {
    group_config: GroupConfig,
}

impl GroupConfigBuilder {
    /// Create a group config
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cipher_suite(mut self, cipher_suite: CipherSuite) -> Self {
        self.group_config.cipher_suite = cipher_suite;
        self
    }

    /// Trees hold `2^tree_depth` leaves, and every commit recomputes
    /// `tree_depth` nodes.
    #[must_use]
    pub fn with_tree_depth(mut self, tree_depth: u8) -> Self {
        self.group_config.tree_depth = tree_depth;
        self
    }

    #[must_use]
    pub fn with_key_package_lifetime(mut self, lifetime: Duration) -> Self {
        self.group_config.key_package_lifetime = lifetime;
        self
    }

    /// Finalize and build the group config
    pub fn build(self) -> Result<GroupConfig> {
        self.group_config.validate()?;
        Ok(self.group_config)
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() -> Result<()> {
        let config = GroupConfig::builder().build()?;

        assert_eq!(config.tree_depth(), 16, "default depth");
        assert_eq!(
            config.key_package_lifetime(),
            Duration::from_secs(86_400),
            "one day"
        );
        assert_eq!(
            config.cipher_suite(),
            CipherSuite::X25519_XCHACHA20POLY1305_SHA256_Ed25519,
            "default suite"
        );
        Ok(())
    }

    #[test]
    fn builder_rejects_bad_depths() {
        for depth in [0, 33] {
            assert!(
                matches!(
                    GroupConfig::builder().with_tree_depth(depth).build(),
                    Err(Error::InvalidConfig(_))
                ),
                "depth {depth} is out of range"
            );
        }
        assert!(
            matches!(
                GroupConfig::builder()
                    .with_key_package_lifetime(Duration::ZERO)
                    .build(),
                Err(Error::InvalidConfig(_))
            ),
            "key packages must live for some time"
        );
    }

    #[test]
    fn deserializes_with_defaults() -> std::result::Result<(), serde_json::Error> {
        let config: GroupConfig = serde_json::from_str(r#"{ "tree_depth": 4 }"#)?;
        assert_eq!(config.tree_depth(), 4, "explicit field kept");
        assert_eq!(config.key_package_lifetime(), KEY_PACKAGE_LIFETIME, "default lifetime");

        let config: GroupConfig =
            serde_json::from_str(r#"{ "cipher_suite": 1, "key_package_lifetime": 60 }"#)?;
        assert_eq!(config.tree_depth(), DEFAULT_TREE_DEPTH, "default depth");
        assert_eq!(config.key_package_lifetime(), Duration::from_secs(60), "seconds");
        Ok(())
    }

    #[test]
    fn serializes_lifetime_as_seconds() -> std::result::Result<(), serde_json::Error> {
        let json = serde_json::to_value(GroupConfig::default())?;

        assert_eq!(
            json,
            serde_json::json!({
                "cipher_suite": 1,
                "tree_depth": 16,
                "key_package_lifetime": 86_400
            }),
            "flat JSON form"
        );
        Ok(())
    }
}
