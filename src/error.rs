use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the keystore codec and key handling.
#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("Invalid password or corrupted keystore")]
    IncorrectPassword,

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Keystore version {0} not supported")]
    UnsupportedVersion(u32),

    #[error("Unsupported KDF: {0}")]
    UnsupportedKdf(String),

    #[error("Unsupported cipher: {0}")]
    UnsupportedCipher(String),

    #[error("Invalid KDF parameters: {0}")]
    InvalidKdfParams(String),

    #[error("Decrypted key belongs to {actual}, keystore claims {expected}")]
    AddressMismatch { expected: String, actual: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Hex decode error: {0}")]
    HexError(String),

    #[error("Cryptographic error: {0}")]
    CryptoError(String),
}

pub type Result<T> = std::result::Result<T, KeystoreError>;

/// Errors surfaced by the credential resolver.
///
/// Every file-related variant names the path it concerns.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet file already exists at {}; delete it manually to create a new one", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("no wallet file at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to decrypt keystore at {}: {source}", path.display())]
    DecryptionFailed {
        path: PathBuf,
        #[source]
        source: KeystoreError,
    },

    #[error("invalid private key file at {}: {reason}", path.display())]
    InvalidKeyFile { path: PathBuf, reason: String },

    #[error("failed to {op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read password: {0}")]
    Password(#[source] io::Error),

    #[error("no per-user configuration directory on this platform")]
    NoConfigDir,

    #[error("failed to encrypt new wallet: {0}")]
    Encryption(#[source] KeystoreError),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl WalletError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        WalletError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Maps a read error, turning a missing file into [`WalletError::NotFound`].
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            WalletError::NotFound { path }
        } else {
            WalletError::Io {
                op: "read",
                path,
                source,
            }
        }
    }
}

pub type WalletResult<T> = std::result::Result<T, WalletError>;
