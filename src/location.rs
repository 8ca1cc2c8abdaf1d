//! Well-known wallet locations: `<config root>/golembase/<filename>`.

use crate::error::{WalletError, WalletResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Subdirectory of the configuration root that holds GolemBase wallets
pub const APP_SUBDIRECTORY: &str = "golembase";

/// Default encrypted keystore filename
pub const DEFAULT_KEYSTORE_FILENAME: &str = "wallet.json";

/// Default raw private key filename
pub const DEFAULT_RAW_KEY_FILENAME: &str = "private.key";

/// Where the per-user configuration root comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigRoot {
    /// The host platform convention (`dirs::config_dir`): `$XDG_CONFIG_HOME`
    /// or `~/.config` on Linux, `~/Library/Application Support` on macOS,
    /// `%APPDATA%` on Windows.
    #[default]
    Platform,
    /// An explicit directory.
    Fixed(PathBuf),
}

impl ConfigRoot {
    pub fn resolve(&self) -> WalletResult<PathBuf> {
        match self {
            ConfigRoot::Platform => dirs::config_dir().ok_or(WalletError::NoConfigDir),
            ConfigRoot::Fixed(path) => Ok(path.clone()),
        }
    }
}

/// Derives wallet paths below a configuration root.
///
/// Derivation has no side effects: nothing is created or checked on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletLocation {
    root: ConfigRoot,
    subdirectory: String,
}

impl WalletLocation {
    #[must_use]
    pub fn new(root: ConfigRoot) -> Self {
        WalletLocation {
            root,
            subdirectory: APP_SUBDIRECTORY.to_string(),
        }
    }

    #[must_use]
    pub fn with_subdirectory(mut self, subdirectory: impl Into<String>) -> Self {
        self.subdirectory = subdirectory.into();
        self
    }

    #[must_use]
    pub fn root(&self) -> &ConfigRoot {
        &self.root
    }

    #[must_use]
    pub fn subdirectory(&self) -> &str {
        &self.subdirectory
    }

    /// The directory wallets live in.
    pub fn directory(&self) -> WalletResult<PathBuf> {
        Ok(self.root.resolve()?.join(&self.subdirectory))
    }

    pub fn path_for(&self, filename: impl AsRef<Path>) -> WalletResult<PathBuf> {
        let path = self.directory()?.join(filename);
        debug!(path = %path.display(), "derived wallet path");
        Ok(path)
    }
}

impl Default for WalletLocation {
    fn default() -> Self {
        WalletLocation::new(ConfigRoot::Platform)
    }
}
