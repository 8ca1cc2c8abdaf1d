//! # golembase-wallet
//!
//! Creates and loads the wallets GolemBase clients sign with, and hands the
//! key over as a [`Credential`].
//!
//! Wallets are either an encrypted JSON keystore (the Web3 Secret Storage
//! format `ethers` writes) or a raw 32-byte private key file, stored at an
//! explicit path or under `<config dir>/golembase/`.
//!
//! ## Example
//!
//! ```no_run
//! use golembase_wallet::{CredentialResolver, ResolverConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = CredentialResolver::new(ResolverConfig::default());
//!
//! // ~/.config/golembase/wallet.json on Linux
//! let created = resolver
//!     .create_encrypted_wallet_at_default("my_password", None)
//!     .await?;
//! println!("New account: {}", created.address);
//!
//! let credential = resolver
//!     .read_encrypted_wallet_at_default("my_password", None)
//!     .await?;
//! assert_eq!(credential.address()?, created.address);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credential;
mod crypto_config;
pub mod error;
pub mod kdf_config;
pub mod key;
pub mod keystore;
pub mod location;
pub mod password;
pub mod resolver;

pub use config::ResolverConfig;
pub use credential::{Credential, CredentialKind};
pub use error::{KeystoreError, WalletError, WalletResult};
pub use kdf_config::{KdfConfig, KdfParams};
pub use key::{Address, KeyPair};
pub use keystore::EncryptedKeystore;
pub use location::{ConfigRoot, WalletLocation};
pub use password::{
    host_source, obtain_password, password_from_env, InteractiveTtySource, Password,
    PasswordSource, StreamSource,
};
pub use resolver::{CreatedWallet, CredentialResolver};
