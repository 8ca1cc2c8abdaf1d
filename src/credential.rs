//! The signing credential handed to a GolemBase client.

use crate::crypto_config::PRIVATE_KEY_SIZE;
use crate::error::Result;
use crate::key::{Address, KeyPair};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Discriminant of a [`Credential`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CredentialKind {
    PrivateKey,
}

impl CredentialKind {
    /// Tag used by the GolemBase SDK for account data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CredentialKind::PrivateKey => "privatekey",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key material ready for signing.
///
/// Carries no password or keystore metadata. New variants may be added, so
/// matches outside this crate need a wildcard arm.
#[derive(Clone)]
#[non_exhaustive]
pub enum Credential {
    PrivateKey(Zeroizing<[u8; PRIVATE_KEY_SIZE]>),
}

impl Credential {
    #[must_use]
    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::PrivateKey(_) => CredentialKind::PrivateKey,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Credential::PrivateKey(bytes) => bytes.as_slice(),
        }
    }

    /// Rebuilds the key pair, e.g. to construct a signer.
    pub fn key_pair(&self) -> Result<KeyPair> {
        KeyPair::from_bytes(self.as_bytes())
    }

    pub fn address(&self) -> Result<Address> {
        Ok(self.key_pair()?.address())
    }
}

impl From<&KeyPair> for Credential {
    fn from(key: &KeyPair) -> Self {
        Credential::PrivateKey(key.to_bytes())
    }
}

impl From<KeyPair> for Credential {
    fn from(key: KeyPair) -> Self {
        Credential::from(&key)
    }
}

/// Key bytes are compared in constant time.
impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && bool::from(self.as_bytes().ct_eq(other.as_bytes()))
    }
}

impl Eq for Credential {}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}
