//! Reversible transforms applied to secrets before they reach the credential file
//!
//! `ShiftCipher` is an obfuscation placeholder kept for compatibility with
//! existing credential files. `AeadCipher` is a real AES-256-GCM primitive
//! behind the same interface.

use argon2::Argon2;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{SecretError, SecretResult};

/// Salt used when deriving a store key from a passphrase
pub const DEFAULT_KEY_SALT: &[u8] = b"autokit-credential-store";

/// Two-way transform between a plaintext secret and its stored form
pub trait SecretCipher: Send + Sync {
    /// Transforms a plaintext secret into its stored representation
    ///
    /// # Errors
    /// Returns `SecretError::Cipher` if the input cannot be transformed
    fn encrypt(&self, plaintext: &str) -> SecretResult<String>;

    /// Recovers the plaintext from a stored representation
    ///
    /// # Errors
    /// Returns `SecretError::Cipher` if the input is not a valid ciphertext
    fn decrypt(&self, ciphertext: &str) -> SecretResult<String>;

    /// Short identifier used in logs
    fn cipher_id(&self) -> &'static str;
}

/// Cipher selection persisted in settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherKind {
    /// Code-point shift, compatible with existing files
    #[default]
    Shift,
    /// AES-256-GCM with an argon2-derived key
    AesGcm,
}

/// Shifts every character one code point up on encrypt and down on decrypt.
///
/// This is not encryption. Characters whose neighbour is not a valid `char`
/// (U+10FFFF, the edges of the surrogate gap, U+0000 on decrypt) are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftCipher;

impl ShiftCipher {
    fn shift(input: &str, delta: i64) -> SecretResult<String> {
        input
            .chars()
            .map(|c| {
                let code = i64::from(u32::from(c)) + delta;
                u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        SecretError::Cipher(format!(
                            "character U+{:04X} cannot be shifted by {delta}",
                            u32::from(c)
                        ))
                    })
            })
            .collect()
    }
}

impl SecretCipher for ShiftCipher {
    fn encrypt(&self, plaintext: &str) -> SecretResult<String> {
        Self::shift(plaintext, 1)
    }

    fn decrypt(&self, ciphertext: &str) -> SecretResult<String> {
        Self::shift(ciphertext, -1)
    }

    fn cipher_id(&self) -> &'static str {
        "shift"
    }
}

/// AES-256-GCM cipher producing hex encoded `nonce || ciphertext || tag`
pub struct AeadCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl std::fmt::Debug for AeadCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AeadCipher").finish_non_exhaustive()
    }
}

impl AeadCipher {
    /// Creates a cipher from raw key material
    ///
    /// # Errors
    /// Returns `SecretError::Cipher` if the key is rejected
    pub fn new(key: &[u8; 32]) -> SecretResult<Self> {
        let unbound = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| SecretError::Cipher("invalid AES-256-GCM key".to_string()))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Derives the key from a passphrase with argon2
    ///
    /// # Errors
    /// Returns `SecretError::Cipher` if key derivation fails (e.g. salt too short)
    pub fn from_passphrase(passphrase: &SecretString, salt: &[u8]) -> SecretResult<Self> {
        let mut key = [0u8; 32];
        Argon2::default()
            .hash_password_into(passphrase.expose_secret().as_bytes(), salt, &mut key)
            .map_err(|e| SecretError::Cipher(format!("Key derivation failed: {e}")))?;
        Self::new(&key)
    }
}

impl SecretCipher for AeadCipher {
    fn encrypt(&self, plaintext: &str) -> SecretResult<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| SecretError::Cipher("failed to generate nonce".to_string()))?;

        let mut in_out = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| SecretError::Cipher("encryption failed".to_string()))?;

        let mut out = nonce_bytes.to_vec();
        out.extend_from_slice(&in_out);
        Ok(hex::encode(out))
    }

    fn decrypt(&self, ciphertext: &str) -> SecretResult<String> {
        let bytes = hex::decode(ciphertext)
            .map_err(|e| SecretError::Cipher(format!("ciphertext is not hex: {e}")))?;
        if bytes.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(SecretError::Cipher("ciphertext too short".to_string()));
        }

        let (nonce_bytes, sealed) = bytes.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| SecretError::Cipher("invalid nonce".to_string()))?;
        let mut sealed = sealed.to_vec();
        let plain = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut sealed)
            .map_err(|_| SecretError::Cipher("authentication failed".to_string()))?;

        String::from_utf8(plain.to_vec())
            .map_err(|e| SecretError::Cipher(format!("plaintext is not UTF-8: {e}")))
    }

    fn cipher_id(&self) -> &'static str {
        "aes_gcm"
    }
}
