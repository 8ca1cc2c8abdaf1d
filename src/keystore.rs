//! Web3 Secret Storage (version 3) keystore codec.
//!
//! This is the encrypted `wallet.json` format produced by `ethers`,
//! go-ethereum and most Ethereum tooling: AES-128-CTR over the raw private
//! key, scrypt or PBKDF2 key derivation, and a Keccak256 MAC over the
//! ciphertext.

use crate::crypto_config::*;
use crate::error::{KeystoreError, Result};
use crate::kdf_config::{KdfConfig, KdfParams};
use crate::key::{Address, KeyPair};
use aes::cipher::{KeyIvInit, StreamCipher};
use pbkdf2::pbkdf2_hmac;
use rand::{CryptoRng, RngCore};
use scrypt::{scrypt, Params as ScryptParams};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sha3::{Digest, Keccak256};
use subtle::ConstantTimeEq;
use uuid::Uuid;
use zeroize::{Zeroize, Zeroizing};

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

/// An encrypted keystore as stored on disk.
///
/// Holds no secret material: [`EncryptedKeystore::decrypt`] hands back a
/// fresh [`KeyPair`] and keeps nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedKeystore {
    /// Lowercase hex address without `0x`. Optional in the format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,

    /// `ethers` writes the capitalised key
    #[serde(alias = "Crypto")]
    crypto: CryptoJson,

    id: String,

    version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CryptoJson {
    cipher: String,
    cipherparams: CipherparamsJson,
    ciphertext: String,
    kdf: String,
    kdfparams: KdfparamsJson,
    mac: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CipherparamsJson {
    iv: String,
}

/// The `kdf` name selects which shape is valid; the shapes themselves are
/// told apart by their fields.
#[remain::sorted]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum KdfparamsJson {
    Pbkdf2 {
        c: u32,
        dklen: u32,
        prf: String,
        salt: String,
    },
    Scrypt {
        dklen: u32,
        n: u32,
        p: u32,
        r: u32,
        salt: String,
    },
}

impl KdfparamsJson {
    fn name(&self) -> &'static str {
        match self {
            KdfparamsJson::Pbkdf2 { .. } => "pbkdf2",
            KdfparamsJson::Scrypt { .. } => "scrypt",
        }
    }

    fn derive_key(&self, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        match self {
            KdfparamsJson::Pbkdf2 {
                c,
                dklen,
                prf,
                salt,
            } => {
                if prf != SUPPORTED_PRF {
                    return Err(KeystoreError::UnsupportedKdf(format!(
                        "Unsupported PRF: {prf}, expected {SUPPORTED_PRF}"
                    )));
                }
                check_dklen(*dklen)?;
                if *c == 0 || *c > MAX_PBKDF2_ITERATIONS {
                    return Err(KeystoreError::InvalidKdfParams(format!(
                        "PBKDF2 iteration count must be in 1..={MAX_PBKDF2_ITERATIONS}, got {c}"
                    )));
                }
                let salt = decode_hex("KDF salt", salt)?;

                let mut key = Zeroizing::new(vec![0u8; *dklen as usize]);
                pbkdf2_hmac::<Sha256>(password, &salt, *c, &mut key);
                Ok(key)
            }
            KdfparamsJson::Scrypt {
                dklen,
                n,
                p,
                r,
                salt,
            } => {
                check_dklen(*dklen)?;
                if !n.is_power_of_two() || *n < 2 {
                    return Err(KeystoreError::InvalidKdfParams(format!(
                        "Scrypt n parameter must be a power of 2, got {n}"
                    )));
                }
                check_scrypt_cost(*n, *r, *p)?;
                let salt = decode_hex("KDF salt", salt)?;

                let log_n = n.trailing_zeros() as u8;
                let params = ScryptParams::new(log_n, *r, *p, *dklen as usize).map_err(|e| {
                    KeystoreError::InvalidKdfParams(format!("Invalid scrypt params: {e}"))
                })?;

                let mut key = Zeroizing::new(vec![0u8; *dklen as usize]);
                scrypt(password, &salt, &params, &mut key).map_err(|e| {
                    KeystoreError::CryptoError(format!("Scrypt derivation failed: {e}"))
                })?;
                Ok(key)
            }
        }
    }
}

fn check_dklen(dklen: u32) -> Result<()> {
    let min = (ENCRYPTION_KEY_SIZE + MAC_KEY_SIZE) as u32;
    if !(min..=MAX_DKLEN).contains(&dklen) {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "dklen must be in {min}..={MAX_DKLEN}, got {dklen}"
        )));
    }
    Ok(())
}

/// Scrypt allocates `128 * r * n` bytes up front; cap it along with `r` and `p`.
fn check_scrypt_cost(n: u32, r: u32, p: u32) -> Result<()> {
    if r == 0 || r > MAX_SCRYPT_R {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "Scrypt r must be in 1..={MAX_SCRYPT_R}, got {r}"
        )));
    }
    if p == 0 || p > MAX_SCRYPT_P {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "Scrypt p must be in 1..={MAX_SCRYPT_P}, got {p}"
        )));
    }
    let memory = 128 * u64::from(r) * u64::from(n);
    if memory > MAX_SCRYPT_MEMORY {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "Scrypt n={n}, r={r} needs {memory} bytes, limit is {MAX_SCRYPT_MEMORY}"
        )));
    }
    Ok(())
}

fn decode_hex(what: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| KeystoreError::HexError(format!("Invalid {what}: {e}")))
}

fn compute_mac(mac_key: &[u8], ciphertext: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(mac_key);
    hasher.update(ciphertext);
    hasher.finalize().into()
}

fn random_bytes<R: RngCore + CryptoRng>(rng: &mut R, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes
}

impl EncryptedKeystore {
    /// Encrypts `key` under `password` using the system RNG.
    pub fn encrypt(key: &KeyPair, password: &str, config: KdfConfig) -> Result<Self> {
        Self::encrypt_with_rng(&mut rand::thread_rng(), key, password, config)
    }

    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
        key: &KeyPair,
        password: &str,
        config: KdfConfig,
    ) -> Result<Self> {
        let mut salt = random_bytes(rng, SALT_SIZE);
        let dklen = config.dklen();

        let kdfparams = match config.params() {
            KdfParams::Scrypt { log_n, r, p } => {
                if log_n == 0 || log_n >= 32 {
                    return Err(KeystoreError::InvalidKdfParams(format!(
                        "Scrypt log_n must be in 1..32, got {log_n}"
                    )));
                }
                KdfparamsJson::Scrypt {
                    dklen,
                    n: 1u32 << log_n,
                    p,
                    r,
                    salt: hex::encode(&salt),
                }
            }
            KdfParams::Pbkdf2 { iterations } => KdfparamsJson::Pbkdf2 {
                c: iterations,
                dklen,
                prf: SUPPORTED_PRF.to_string(),
                salt: hex::encode(&salt),
            },
        };
        salt.zeroize();

        let derived_key = kdfparams.derive_key(password.as_bytes())?;
        let encryption_key = &derived_key[..ENCRYPTION_KEY_SIZE];
        let mac_key = &derived_key[ENCRYPTION_KEY_SIZE..ENCRYPTION_KEY_SIZE + MAC_KEY_SIZE];

        let iv = random_bytes(rng, IV_SIZE);

        let mut ciphertext = key.to_bytes().to_vec();
        let mut cipher = Aes128Ctr::new(encryption_key.into(), iv.as_slice().into());
        cipher.apply_keystream(&mut ciphertext);

        let mac = compute_mac(mac_key, &ciphertext);

        Ok(EncryptedKeystore {
            address: Some(key.address().to_hex_lower()),
            crypto: CryptoJson {
                cipher: CIPHER_NAME.to_string(),
                cipherparams: CipherparamsJson {
                    iv: hex::encode(&iv),
                },
                ciphertext: hex::encode(&ciphertext),
                kdf: kdfparams.name().to_string(),
                kdfparams,
                mac: hex::encode(mac),
            },
            id: Uuid::new_v4().to_string(),
            version: KEYSTORE_VERSION,
        })
    }

    /// Parses a keystore document and checks that its version and cipher
    /// are ones this codec can decrypt.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_slice(json.as_bytes())
    }

    /// Like [`EncryptedKeystore::from_json`], for file contents that may not
    /// be valid UTF-8.
    pub fn from_slice(json: &[u8]) -> Result<Self> {
        let keystore: EncryptedKeystore = serde_json::from_slice(json)?;

        if keystore.version != KEYSTORE_VERSION {
            return Err(KeystoreError::UnsupportedVersion(keystore.version));
        }

        if keystore.crypto.cipher != CIPHER_NAME {
            return Err(KeystoreError::UnsupportedCipher(
                keystore.crypto.cipher.clone(),
            ));
        }

        if keystore.crypto.kdf != keystore.crypto.kdfparams.name() {
            return Err(KeystoreError::UnsupportedKdf(keystore.crypto.kdf.clone()));
        }

        Ok(keystore)
    }

    /// Recovers the key pair.
    ///
    /// # Errors
    ///
    /// [`KeystoreError::IncorrectPassword`] when the MAC does not verify,
    /// [`KeystoreError::AddressMismatch`] when the key decrypts but does not
    /// match the stored address, and hex/KDF errors for damaged files.
    pub fn decrypt(&self, password: &str) -> Result<KeyPair> {
        let derived_key = self.crypto.kdfparams.derive_key(password.as_bytes())?;
        let encryption_key = &derived_key[..ENCRYPTION_KEY_SIZE];
        let mac_key = &derived_key[ENCRYPTION_KEY_SIZE..ENCRYPTION_KEY_SIZE + MAC_KEY_SIZE];

        let ciphertext = decode_hex("ciphertext", &self.crypto.ciphertext)?;
        let expected_mac = decode_hex("MAC", &self.crypto.mac)?;

        let computed_mac = compute_mac(mac_key, &ciphertext);
        if computed_mac.len() != expected_mac.len()
            || !bool::from(computed_mac.as_slice().ct_eq(expected_mac.as_slice()))
        {
            return Err(KeystoreError::IncorrectPassword);
        }

        let iv = decode_hex("IV", &self.crypto.cipherparams.iv)?;
        if iv.len() != IV_SIZE {
            return Err(KeystoreError::CryptoError(format!(
                "IV must be {IV_SIZE} bytes, got {}",
                iv.len()
            )));
        }

        let mut plaintext = Zeroizing::new(ciphertext);
        let mut cipher = Aes128Ctr::new(encryption_key.into(), iv.as_slice().into());
        cipher.apply_keystream(&mut plaintext);

        let key = KeyPair::from_bytes(&plaintext)?;

        if let Some(stored) = &self.address {
            let expected = Address::from_hex(stored)?;
            let actual = key.address();
            if expected != actual {
                return Err(KeystoreError::AddressMismatch {
                    expected: expected.to_checksum(),
                    actual: actual.to_checksum(),
                });
            }
        }

        Ok(key)
    }

    /// The address recorded in the file, if any. Not authenticated until
    /// [`EncryptedKeystore::decrypt`] succeeds.
    pub fn address(&self) -> Result<Option<Address>> {
        self.address.as_deref().map(Address::from_hex).transpose()
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}
