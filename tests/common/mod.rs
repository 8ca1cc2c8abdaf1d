#![allow(dead_code)]

use golembase_wallet::{ConfigRoot, CredentialResolver, KdfConfig, ResolverConfig, WalletLocation};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

/// Standard test password for consistent testing
pub const TEST_PASSWORD: &str = "test_password_123";
pub const TEST_WRONG_PASSWORD: &str = "wrong_password_456";

/// Scrypt N=16, fast enough for debug-build tests
pub fn fast_kdf() -> KdfConfig {
    KdfConfig::custom_scrypt(4, 8, 1)
}

/// Creates a temporary configuration root, removed when dropped
pub fn create_temp_config_root() -> TempDir {
    tempdir().expect("Failed to create temp directory")
}

pub fn fast_config(root: &TempDir) -> ResolverConfig {
    ResolverConfig::default()
        .with_location(WalletLocation::new(ConfigRoot::Fixed(
            root.path().to_path_buf(),
        )))
        .with_kdf(fast_kdf())
}

/// A resolver whose well-known location is inside `root`
pub fn fast_resolver(root: &TempDir) -> CredentialResolver {
    CredentialResolver::new(fast_config(root))
}

/// Validates that a string is an EIP-55 style Ethereum address
pub fn assert_valid_ethereum_address(addr: &str) {
    assert_eq!(
        addr.len(),
        42,
        "Ethereum address should be 42 characters long"
    );
    assert!(
        addr.starts_with("0x"),
        "Ethereum address should start with 0x"
    );
    assert!(
        addr[2..].chars().all(|c| c.is_ascii_hexdigit()),
        "Ethereum address should contain only hexadecimal characters after 0x"
    );
}

/// A structurally valid v3 keystore with weak scrypt parameters. The MAC
/// does not match any password.
pub fn keystore_json() -> Value {
    json!({
        "crypto": {
            "cipher": "aes-128-ctr",
            "cipherparams": {
                "iv": "83dbcc02d8ccb40e466191a123791e0e"
            },
            "ciphertext": "d172bf743a674da9cdad04534d56926ef8358534d458fffccd4e6ad2fbde479c",
            "kdf": "scrypt",
            "kdfparams": {
                "dklen": 32,
                "n": 16,
                "p": 1,
                "r": 8,
                "salt": "ab0c7876052600dd703518d6fc3fe8984592145b591fc8fb5c6d43190334ba19"
            },
            "mac": "2103ac29920d71da29f15d75b4a16dbe95cfd7ff8faea1056c33131d846e3097"
        },
        "id": "3198bc9c-6672-5ab3-d995-4942343ae5b6",
        "version": 3
    })
}

pub fn keystore_json_with_version(version: u32) -> String {
    let mut value = keystore_json();
    value["version"] = json!(version);
    value.to_string()
}

pub fn keystore_json_with_cipher(cipher: &str) -> String {
    let mut value = keystore_json();
    value["crypto"]["cipher"] = json!(cipher);
    value.to_string()
}

pub fn keystore_json_with_scrypt_n(n: u32) -> String {
    let mut value = keystore_json();
    value["crypto"]["kdfparams"]["n"] = json!(n);
    value.to_string()
}

pub fn keystore_json_with_prf(prf: &str) -> String {
    let mut value = keystore_json();
    value["crypto"]["kdf"] = json!("pbkdf2");
    value["crypto"]["kdfparams"] = json!({
        "c": 1000,
        "dklen": 32,
        "prf": prf,
        "salt": "ab0c7876052600dd703518d6fc3fe8984592145b591fc8fb5c6d43190334ba19"
    });
    value.to_string()
}

pub fn keystore_json_with_invalid_hex() -> String {
    let mut value = keystore_json();
    value["crypto"]["ciphertext"] = json!("ZZZZ_invalid_hex_ZZZZ");
    value.to_string()
}

/// The Web3 Secret Storage PBKDF2 test vector (password `testpassword`)
pub struct KeystoreFixture {
    pub json: &'static str,
    pub password: &'static str,
    pub private_key: &'static str,
    pub address: &'static str,
}

pub const WEB3_PBKDF2_VECTOR: KeystoreFixture = KeystoreFixture {
    json: r#"{
        "crypto": {
            "cipher": "aes-128-ctr",
            "cipherparams": { "iv": "6087dab2f9fdbbfaddc31a909735c1e6" },
            "ciphertext": "5318b4d5bcd28de64ee5559e671353e16f075ecae9f99c7a79a38af5f869aa46",
            "kdf": "pbkdf2",
            "kdfparams": {
                "c": 262144,
                "dklen": 32,
                "prf": "hmac-sha256",
                "salt": "ae3cd4e7013836a3df6bd7241b12db061dbe2c6785853cce422d148a624ce0bd"
            },
            "mac": "517ead924a9d0dc3124507e3393d175ce3ff7c1e96529c6c555ce9e51205e9b2"
        },
        "id": "3198bc9c-6672-5ab3-d995-4942343ae5b6",
        "version": 3
    }"#,
    password: "testpassword",
    private_key: "7a28b5ba57c53603b0b07b56bba752f7784bf506fa95edc395f5cf6c7514fe9d",
    address: "008aeeda4d805471df9b2a5b0f38a0c3bcba786b",
};

/// Helper to assert that an error matches a specific variant
#[macro_export]
macro_rules! assert_error_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            other => panic!(
                "Expected error variant {}, but got: {:?}",
                stringify!($pattern),
                other
            ),
        }
    };
}
