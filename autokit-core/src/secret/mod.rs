//! Credential storage for `AutoKit`
//!
//! Secrets are kept per account in a flat TOML file. Every secret passes
//! through a `SecretCipher` before it is written, so the shift placeholder
//! can be swapped for `AeadCipher` without touching callers.

mod cipher;
mod store;

use std::sync::Arc;

use secrecy::SecretString;

pub use cipher::{AeadCipher, CipherKind, SecretCipher, ShiftCipher, DEFAULT_KEY_SALT};
pub use store::{CredentialStore, DEFAULT_SECTION};

use crate::config::{AppSettings, ConfigManager};
use crate::error::{Result, SecretError, SecretResult};

/// Builds the cipher selected in settings
///
/// `passphrase` is only consulted for `CipherKind::AesGcm`.
///
/// # Errors
///
/// Returns an error if an AES cipher is requested without a passphrase or the
/// key cannot be derived.
pub fn build_cipher(
    kind: CipherKind,
    passphrase: Option<&SecretString>,
) -> SecretResult<Arc<dyn SecretCipher>> {
    match kind {
        CipherKind::Shift => Ok(Arc::new(ShiftCipher)),
        CipherKind::AesGcm => {
            let passphrase = passphrase.ok_or_else(|| {
                SecretError::Cipher("aes_gcm cipher requires a passphrase".to_string())
            })?;
            Ok(Arc::new(AeadCipher::from_passphrase(
                passphrase,
                DEFAULT_KEY_SALT,
            )?))
        }
    }
}

/// Opens the credential store described by `settings`
///
/// # Errors
///
/// Returns an error if the passphrase variable is missing, the key cannot be
/// derived or the store file cannot be created.
pub fn open_store(manager: &ConfigManager, settings: &AppSettings) -> Result<CredentialStore> {
    let passphrase = ConfigManager::store_passphrase(settings)?;
    let cipher = build_cipher(settings.store.cipher, passphrase.as_ref())?;
    Ok(CredentialStore::open_with_cipher(
        manager.store_path(settings),
        cipher,
    )?)
}
