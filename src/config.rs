//! Resolver configuration.
//!
//! Everything the resolver would otherwise pull from the environment is an
//! explicit field here. [`ResolverConfig::from_env`] exists for binaries that
//! want the environment-driven behaviour.

use crate::kdf_config::KdfConfig;
use crate::location::{
    ConfigRoot, WalletLocation, DEFAULT_KEYSTORE_FILENAME, DEFAULT_RAW_KEY_FILENAME,
};
use std::path::PathBuf;

/// Overrides the platform configuration root in [`ResolverConfig::from_env`]
pub const CONFIG_ROOT_ENV_VAR: &str = "GOLEMBASE_CONFIG_ROOT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub location: WalletLocation,
    pub keystore_filename: String,
    pub raw_key_filename: String,
    /// Cost of keystores this resolver writes
    pub kdf: KdfConfig,
    /// Let raw key creation replace an existing file. Encrypted keystores are
    /// never overwritten.
    pub overwrite_raw_key: bool,
}

impl ResolverConfig {
    /// Defaults, with the configuration root taken from
    /// `GOLEMBASE_CONFIG_ROOT` when it is set.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_ROOT_ENV_VAR) {
            Some(root) if !root.is_empty() => {
                Self::default().with_config_root(ConfigRoot::Fixed(PathBuf::from(root)))
            }
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn with_config_root(mut self, root: ConfigRoot) -> Self {
        let subdirectory = self.location.subdirectory().to_string();
        self.location = WalletLocation::new(root).with_subdirectory(subdirectory);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: WalletLocation) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn with_kdf(mut self, kdf: KdfConfig) -> Self {
        self.kdf = kdf;
        self
    }

    #[must_use]
    pub fn with_overwrite_raw_key(mut self, overwrite: bool) -> Self {
        self.overwrite_raw_key = overwrite;
        self
    }

    #[must_use]
    pub fn with_keystore_filename(mut self, filename: impl Into<String>) -> Self {
        self.keystore_filename = filename.into();
        self
    }

    #[must_use]
    pub fn with_raw_key_filename(mut self, filename: impl Into<String>) -> Self {
        self.raw_key_filename = filename.into();
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            location: WalletLocation::default(),
            keystore_filename: DEFAULT_KEYSTORE_FILENAME.to_string(),
            raw_key_filename: DEFAULT_RAW_KEY_FILENAME.to_string(),
            kdf: KdfConfig::default(),
            overwrite_raw_key: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::APP_SUBDIRECTORY;

    #[test]
    fn defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.keystore_filename, "wallet.json");
        assert_eq!(config.raw_key_filename, "private.key");
        assert_eq!(config.location.root(), &ConfigRoot::Platform);
        assert_eq!(config.location.subdirectory(), APP_SUBDIRECTORY);
        assert!(!config.overwrite_raw_key);
    }

    #[test]
    fn config_root_override_keeps_subdirectory() {
        let config = ResolverConfig::default()
            .with_location(WalletLocation::default().with_subdirectory("custom"))
            .with_config_root(ConfigRoot::Fixed(PathBuf::from("/srv/cfg")));

        assert_eq!(
            config.location.path_for("wallet.json").unwrap(),
            PathBuf::from("/srv/cfg/custom/wallet.json")
        );
    }
}
