//! Creating wallets and turning wallet files into [`Credential`]s.
//!
//! Two storage formats are supported: an encrypted Web3 Secret Storage
//! keystore (`wallet.json`) and an unencrypted 32-byte private key
//! (`private.key`). Each operation takes either an explicit path or, in its
//! `_at_default` form, a filename under the configured [`WalletLocation`].
//!
//! [`WalletLocation`]: crate::location::WalletLocation

use crate::config::ResolverConfig;
use crate::credential::Credential;
use crate::error::{KeystoreError, WalletError, WalletResult};
use crate::key::{Address, KeyPair};
use crate::keystore::EncryptedKeystore;
use crate::password::{host_source, password_from_env, PasswordSource};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// A wallet file written by one of the `create_*` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedWallet {
    pub path: PathBuf,
    pub address: Address,
}

pub struct CredentialResolver {
    config: ResolverConfig,
    password_source: Option<Box<dyn PasswordSource>>,
}

impl CredentialResolver {
    /// A resolver that asks for passwords through [`host_source`], chosen the
    /// first time a password is needed.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        CredentialResolver {
            config,
            password_source: None,
        }
    }

    #[must_use]
    pub fn with_password_source(mut self, source: Box<dyn PasswordSource>) -> Self {
        self.password_source = Some(source);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Well-known keystore path; `None` means the configured default filename.
    pub fn keystore_path(&self, filename: Option<&str>) -> WalletResult<PathBuf> {
        self.config
            .location
            .path_for(filename.unwrap_or(&self.config.keystore_filename))
    }

    /// Well-known raw key path; `None` means the configured default filename.
    pub fn raw_key_path(&self, filename: Option<&str>) -> WalletResult<PathBuf> {
        self.config
            .location
            .path_for(filename.unwrap_or(&self.config.raw_key_filename))
    }

    async fn ask_password(&mut self, prompt: &str) -> WalletResult<Zeroizing<String>> {
        self.password_source
            .get_or_insert_with(host_source)
            .obtain(prompt)
            .await
    }

    // == Creation ==

    /// Generates a key and writes it as an encrypted keystore at `path`.
    ///
    /// # Errors
    ///
    /// [`WalletError::AlreadyExists`] if anything is already at `path`. The
    /// check happens before a key is generated, and the final write refuses
    /// to clobber a file that appeared in the meantime.
    pub async fn create_encrypted_wallet(
        &self,
        password: &str,
        path: impl AsRef<Path>,
    ) -> WalletResult<CreatedWallet> {
        let path = path.as_ref().to_path_buf();
        ensure_vacant(&path).await?;

        let kdf = self.config.kdf;
        let password = Zeroizing::new(password.to_owned());
        let (address, json) = tokio::task::spawn_blocking(move || {
            let key = KeyPair::generate(&mut rand::thread_rng());
            let keystore = EncryptedKeystore::encrypt(&key, &password, kdf)?;
            Ok::<_, KeystoreError>((key.address(), keystore.to_json()?))
        })
        .await?
        .map_err(WalletError::Encryption)?;

        write_atomically(&path, Zeroizing::new(json.into_bytes()), false).await?;

        info!(path = %path.display(), %address, "created encrypted wallet");
        Ok(CreatedWallet { path, address })
    }

    pub async fn create_encrypted_wallet_at_default(
        &self,
        password: &str,
        filename: Option<&str>,
    ) -> WalletResult<CreatedWallet> {
        let path = self.keystore_path(filename)?;
        self.create_encrypted_wallet(password, path).await
    }

    pub async fn create_encrypted_wallet_ask_password(
        &mut self,
        path: impl AsRef<Path>,
        prompt: &str,
    ) -> WalletResult<CreatedWallet> {
        let password = self.ask_password(prompt).await?;
        self.create_encrypted_wallet(&password, path).await
    }

    pub async fn create_encrypted_wallet_at_default_ask_password(
        &mut self,
        filename: Option<&str>,
        prompt: &str,
    ) -> WalletResult<CreatedWallet> {
        let path = self.keystore_path(filename)?;
        self.create_encrypted_wallet_ask_password(path, prompt).await
    }

    /// Creates the default encrypted wallet with the password held in the
    /// environment variable `var`.
    ///
    /// A missing password is not an error: a warning is logged, nothing is
    /// written and `Ok(None)` is returned.
    pub async fn create_default_wallet_from_env(
        &self,
        var: &str,
    ) -> WalletResult<Option<CreatedWallet>> {
        let Some(password) = password_from_env(var) else {
            warn!(var, "no wallet password in the environment, not creating a wallet");
            return Ok(None);
        };
        self.create_encrypted_wallet_at_default(&password, None)
            .await
            .map(Some)
    }

    /// Generates a key and writes its 32 raw bytes to `path`, unencrypted.
    ///
    /// Refuses to replace an existing file unless
    /// [`ResolverConfig::overwrite_raw_key`] is set.
    pub async fn create_raw_key_file(&self, path: impl AsRef<Path>) -> WalletResult<CreatedWallet> {
        let path = path.as_ref().to_path_buf();
        let overwrite = self.config.overwrite_raw_key;
        if !overwrite {
            ensure_vacant(&path).await?;
        }

        let (address, bytes) = {
            let key = KeyPair::generate(&mut rand::thread_rng());
            (key.address(), Zeroizing::new(key.to_bytes().to_vec()))
        };

        write_atomically(&path, bytes, overwrite).await?;

        info!(path = %path.display(), %address, "created raw private key file");
        Ok(CreatedWallet { path, address })
    }

    pub async fn create_raw_key_file_at_default(
        &self,
        filename: Option<&str>,
    ) -> WalletResult<CreatedWallet> {
        let path = self.raw_key_path(filename)?;
        self.create_raw_key_file(path).await
    }

    // == Reading ==

    /// Decrypts the keystore at `path`.
    ///
    /// # Errors
    ///
    /// [`WalletError::NotFound`] if there is no file,
    /// [`WalletError::DecryptionFailed`] for a wrong password or a damaged or
    /// unsupported keystore.
    pub async fn read_encrypted_wallet(
        &self,
        password: &str,
        path: impl AsRef<Path>,
    ) -> WalletResult<Credential> {
        let path = path.as_ref().to_path_buf();
        let contents = tokio::fs::read(&path)
            .await
            .map_err(|e| WalletError::read(&path, e))?;

        let password = Zeroizing::new(password.to_owned());
        let decrypted = tokio::task::spawn_blocking(move || {
            let keystore = EncryptedKeystore::from_slice(&contents)?;
            let key = keystore.decrypt(&password)?;
            Ok::<_, KeystoreError>(Credential::from(&key))
        })
        .await?;

        let credential = decrypted.map_err(|source| WalletError::DecryptionFailed {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), "loaded encrypted wallet");
        Ok(credential)
    }

    pub async fn read_encrypted_wallet_at_default(
        &self,
        password: &str,
        filename: Option<&str>,
    ) -> WalletResult<Credential> {
        let path = self.keystore_path(filename)?;
        self.read_encrypted_wallet(password, path).await
    }

    pub async fn read_encrypted_wallet_ask_password(
        &mut self,
        path: impl AsRef<Path>,
        prompt: &str,
    ) -> WalletResult<Credential> {
        let password = self.ask_password(prompt).await?;
        self.read_encrypted_wallet(&password, path).await
    }

    pub async fn read_encrypted_wallet_at_default_ask_password(
        &mut self,
        filename: Option<&str>,
        prompt: &str,
    ) -> WalletResult<Credential> {
        let path = self.keystore_path(filename)?;
        self.read_encrypted_wallet_ask_password(path, prompt).await
    }

    /// Loads an unencrypted private key file.
    ///
    /// # Errors
    ///
    /// [`WalletError::NotFound`] if there is no file,
    /// [`WalletError::InvalidKeyFile`] unless it holds exactly one valid
    /// 32-byte secp256k1 key.
    pub async fn read_raw_key_file(&self, path: impl AsRef<Path>) -> WalletResult<Credential> {
        let path = path.as_ref().to_path_buf();
        let bytes = Zeroizing::new(
            tokio::fs::read(&path)
                .await
                .map_err(|e| WalletError::read(&path, e))?,
        );

        let key = KeyPair::from_bytes(&bytes).map_err(|e| WalletError::InvalidKeyFile {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), "loaded raw private key");
        Ok(Credential::from(&key))
    }

    pub async fn read_raw_key_file_at_default(
        &self,
        filename: Option<&str>,
    ) -> WalletResult<Credential> {
        let path = self.raw_key_path(filename)?;
        self.read_raw_key_file(path).await
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        CredentialResolver::new(ResolverConfig::default())
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("config", &self.config)
            .field("password_source", &self.password_source.is_some())
            .finish()
    }
}

async fn ensure_vacant(path: &Path) -> WalletResult<()> {
    let exists = tokio::fs::try_exists(path)
        .await
        .map_err(|e| WalletError::io("inspect", path, e))?;
    if exists {
        return Err(WalletError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Writes through a temporary file in the destination directory, so readers
/// see either nothing or the complete file. Creates missing parents.
async fn write_atomically(
    path: &Path,
    contents: Zeroizing<Vec<u8>>,
    overwrite: bool,
) -> WalletResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| WalletError::io("create directory", &dir, e))?;

    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || persist(&dir, &path, &contents, overwrite)).await?
}

fn persist(dir: &Path, path: &Path, contents: &[u8], overwrite: bool) -> WalletResult<()> {
    // NamedTempFile is created with mode 0600 on unix
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| WalletError::io("create temporary file in", dir, e))?;
    file.write_all(contents)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| WalletError::io("write", path, e))?;

    let persisted = if overwrite {
        file.persist(path)
    } else {
        file.persist_noclobber(path)
    };

    persisted.map(drop).map_err(|e| {
        if !overwrite && e.error.kind() == std::io::ErrorKind::AlreadyExists {
            WalletError::AlreadyExists {
                path: path.to_path_buf(),
            }
        } else {
            WalletError::io("write", path, e.error)
        }
    })
}
