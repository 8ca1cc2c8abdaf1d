//! Cryptographic constants of the Web3 Secret Storage v3 format.

/// The only cipher the format defines
pub(crate) const CIPHER_NAME: &str = "aes-128-ctr";

/// Keystore format version written and accepted
pub(crate) const KEYSTORE_VERSION: u32 = 3;

/// Length of the random KDF salt
pub(crate) const SALT_SIZE: usize = 32;

/// AES-CTR initialization vector length
pub(crate) const IV_SIZE: usize = 16;

/// First half of the derived key encrypts, second half authenticates
pub(crate) const ENCRYPTION_KEY_SIZE: usize = 16;
pub(crate) const MAC_KEY_SIZE: usize = 16;

/// Derived key length; must cover both halves above
pub(crate) const DERIVED_KEY_LEN: u32 = 32;

/// The only PBKDF2 pseudo-random function the format defines
pub(crate) const SUPPORTED_PRF: &str = "hmac-sha256";

/// secp256k1 scalar length, also the exact size of a raw key file
pub(crate) const PRIVATE_KEY_SIZE: usize = 32;

/// Ethereum address length in bytes
pub(crate) const ADDRESS_SIZE: usize = 20;

/// Upper bounds on KDF parameters read from a keystore file. Anything above
/// them is rejected before derivation starts.
pub(crate) const MAX_DKLEN: u32 = 64;
pub(crate) const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;
pub(crate) const MAX_SCRYPT_R: u32 = 32;
pub(crate) const MAX_SCRYPT_P: u32 = 16;

/// Scrypt working memory (`128 * r * n` bytes) allowed per derivation, 1 GiB
pub(crate) const MAX_SCRYPT_MEMORY: u64 = 1 << 30;
