use crate::crypto_config::{ADDRESS_SIZE, PRIVATE_KEY_SIZE};
use crate::error::{KeystoreError, Result};
use k256::ecdsa::SigningKey;
use rand::{CryptoRng, RngCore};
use sha3::{Digest, Keccak256};
use std::fmt;
use zeroize::Zeroizing;

/// Prefix byte of an uncompressed SEC1 public key (0x04)
const UNCOMPRESSED_PUBLIC_KEY_PREFIX_SIZE: usize = 1;

/// Offset in the Keccak256 hash where the address starts (last 20 of 32 bytes)
const ADDRESS_HASH_OFFSET: usize = 12;

/// A 20-byte Ethereum account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Parses 40 hex characters, with or without `0x`, in any case.
    ///
    /// Mixed-case input is not checked against its EIP-55 checksum.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| KeystoreError::HexError(format!("Invalid address: {e}")))?;
        let bytes: [u8; ADDRESS_SIZE] = bytes.try_into().map_err(|b: Vec<u8>| {
            KeystoreError::HexError(format!(
                "Invalid address: expected {ADDRESS_SIZE} bytes, got {}",
                b.len()
            ))
        })?;
        Ok(Address(bytes))
    }

    /// Lowercase hex without the `0x` prefix, as stored in keystore files.
    #[must_use]
    pub fn to_hex_lower(&self) -> String {
        hex::encode(self.0)
    }

    /// EIP-55 mixed-case checksum encoding with `0x` prefix.
    #[must_use]
    pub fn to_checksum(&self) -> String {
        let lower = self.to_hex_lower();
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let shift = if i % 2 == 0 { 4 } else { 0 };
            let nibble = (hash[i / 2] >> shift) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

/// A secp256k1 key pair.
///
/// The secret scalar is wiped when the value is dropped (`SigningKey` zeroizes
/// itself) and never shows up in `Debug` output.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        KeyPair {
            signing_key: SigningKey::random(rng),
        }
    }

    /// Imports a raw 32-byte big-endian secret scalar.
    ///
    /// # Errors
    ///
    /// Fails when the slice has the wrong length or the scalar is zero or not
    /// below the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(KeystoreError::InvalidKey(format!(
                "Expected {PRIVATE_KEY_SIZE} bytes, got {}",
                bytes.len()
            )));
        }

        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|e| KeystoreError::InvalidKey(format!("Invalid secp256k1 key: {e}")))?;

        Ok(KeyPair { signing_key })
    }

    #[must_use]
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    #[must_use]
    pub fn to_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_SIZE]> {
        let mut out = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }

    /// Keccak256 of the uncompressed public key (without the 0x04 prefix),
    /// last 20 bytes.
    #[must_use]
    pub fn address(&self) -> Address {
        let encoded = self.signing_key.verifying_key().to_encoded_point(false);
        let public_key_bytes = &encoded.as_bytes()[UNCOMPRESSED_PUBLIC_KEY_PREFIX_SIZE..];

        let hash = Keccak256::digest(public_key_bytes);

        let mut address = [0u8; ADDRESS_SIZE];
        address.copy_from_slice(&hash[ADDRESS_HASH_OFFSET..]);
        Address(address)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl TryFrom<&[u8]> for KeyPair {
    type Error = KeystoreError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn generated_key_has_well_formed_address() {
        let key = KeyPair::generate(&mut thread_rng());

        let address = key.address().to_checksum();
        assert_eq!(address.len(), 42);
        assert!(address.starts_with("0x"));
        assert!(address[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn bytes_roundtrip_preserves_address() {
        let key = KeyPair::generate(&mut thread_rng());

        let bytes = key.to_bytes();
        assert_eq!(bytes.len(), 32);

        let restored = KeyPair::from_bytes(bytes.as_slice()).unwrap();
        assert_eq!(key.address(), restored.address());
    }

    #[test]
    fn checksum_matches_eip55() {
        let bytes =
            hex::decode("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80").unwrap();
        let key = KeyPair::from_bytes(&bytes).unwrap();

        assert_eq!(
            key.address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn address_parses_with_and_without_prefix() {
        let a = Address::from_hex("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap();
        let b = Address::from_hex("7E5F4552091A69125D5DFCB7B8C2659029395BDF").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_hex_lower(), "7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    #[test]
    fn address_rejects_wrong_length() {
        assert!(Address::from_hex("0x1234").is_err());
        assert!(Address::from_hex("zz").is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let bytes = [0x11u8; 32];
        let key = KeyPair::from_bytes(&bytes).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("address"));
        assert!(!debug.contains(&hex::encode(bytes)));
    }
}
