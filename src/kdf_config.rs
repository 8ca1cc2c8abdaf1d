//! Key derivation settings used when encrypting a new keystore.
//!
//! Reading a keystore never consults these: the parameters stored in the file
//! win. They only decide how expensive a freshly written wallet is to unlock.
//!
//! ```
//! use golembase_wallet::KdfConfig;
//!
//! // What `ethers` writes by default
//! let config = KdfConfig::scrypt_light();
//!
//! // Cheap parameters for tests
//! let config = KdfConfig::custom_scrypt(4, 8, 1);
//! ```

use crate::crypto_config::DERIVED_KEY_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfParams {
    /// Scrypt with N = 2^log_n
    Scrypt { log_n: u8, r: u32, p: u32 },
    /// PBKDF2 with HMAC-SHA256
    Pbkdf2 { iterations: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfConfig {
    pub(crate) params: KdfParams,
}

impl KdfConfig {
    #[inline]
    #[must_use]
    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Derived key length in bytes, fixed by the keystore format.
    #[inline]
    #[must_use]
    pub fn dklen(&self) -> u32 {
        DERIVED_KEY_LEN
    }

    /// Scrypt N=2^18, r=8, p=1. The go-ethereum "standard" cost.
    #[inline]
    #[must_use]
    pub fn scrypt_default() -> Self {
        Self::custom_scrypt(18, 8, 1)
    }

    /// Scrypt N=2^17, r=8, p=1, the cost `ethers` uses for `wallet.encrypt`.
    #[inline]
    #[must_use]
    pub fn scrypt_light() -> Self {
        Self::custom_scrypt(17, 8, 1)
    }

    /// PBKDF2-HMAC-SHA256 with 262,144 iterations.
    #[inline]
    #[must_use]
    pub fn pbkdf2_default() -> Self {
        Self::custom_pbkdf2(262_144)
    }

    #[inline]
    #[must_use]
    pub fn custom_scrypt(log_n: u8, r: u32, p: u32) -> Self {
        KdfConfig {
            params: KdfParams::Scrypt { log_n, r, p },
        }
    }

    #[inline]
    #[must_use]
    pub fn custom_pbkdf2(iterations: u32) -> Self {
        KdfConfig {
            params: KdfParams::Pbkdf2 { iterations },
        }
    }
}

impl Default for KdfConfig {
    #[inline]
    fn default() -> Self {
        Self::scrypt_light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_n(config: KdfConfig) -> u8 {
        match config.params() {
            KdfParams::Scrypt { log_n, .. } => log_n,
            KdfParams::Pbkdf2 { .. } => panic!("Expected Scrypt params"),
        }
    }

    #[test]
    fn default_matches_ethers() {
        assert_eq!(KdfConfig::default(), KdfConfig::scrypt_light());
        assert_eq!(log_n(KdfConfig::default()), 17);
    }

    #[test]
    fn light_is_cheaper_than_default() {
        assert!(log_n(KdfConfig::scrypt_light()) < log_n(KdfConfig::scrypt_default()));
    }

    #[test]
    fn pbkdf2_default_iterations() {
        match KdfConfig::pbkdf2_default().params() {
            KdfParams::Pbkdf2 { iterations } => assert_eq!(iterations, 262_144),
            _ => panic!("Expected PBKDF2 params"),
        }
    }

    #[test]
    fn custom_scrypt_keeps_parameters() {
        let config = KdfConfig::custom_scrypt(10, 4, 2);
        assert_eq!(
            config.params(),
            KdfParams::Scrypt {
                log_n: 10,
                r: 4,
                p: 2
            }
        );
        assert_eq!(config.dklen(), 32);
    }
}
