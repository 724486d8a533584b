//! File-backed credential store
//!
//! Accounts are TOML tables keyed by account name, each holding a single
//! `password` field with the ciphered secret. The file is re-read on every
//! operation and rewritten in full on every mutation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use toml::Table;
use tracing::{debug, info, warn};

use crate::error::{SecretError, SecretResult};

use super::cipher::{SecretCipher, ShiftCipher};

/// Name of the reserved section created with every new store
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Placeholder written into the reserved section
const DEFAULT_PLACEHOLDER: &str = "password";

/// One account entry in the credential file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AccountRecord {
    password: String,
}

/// Keyed secret storage over a single TOML file
pub struct CredentialStore {
    path: PathBuf,
    cipher: Arc<dyn SecretCipher>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("path", &self.path)
            .field("cipher", &self.cipher.cipher_id())
            .finish()
    }
}

impl CredentialStore {
    /// Opens the store at `path` using the shift cipher
    ///
    /// Creates the file with only the `DEFAULT` section if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file has to be created and cannot be written.
    pub fn open(path: impl Into<PathBuf>) -> SecretResult<Self> {
        Self::open_with_cipher(path, Arc::new(ShiftCipher))
    }

    /// Opens the store at `path` with an explicit cipher
    ///
    /// # Errors
    ///
    /// Returns an error if the file has to be created and cannot be written.
    pub fn open_with_cipher(
        path: impl Into<PathBuf>,
        cipher: Arc<dyn SecretCipher>,
    ) -> SecretResult<Self> {
        let store = Self {
            path: path.into(),
            cipher,
        };
        if !store.path.exists() {
            store.create_default()?;
        }
        Ok(store)
    }

    /// Returns the path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn create_default(&self) -> SecretResult<()> {
        self.save(&Self::default_table()?)?;
        info!(path = %self.path.display(), "Credential file created");
        Ok(())
    }

    /// Contents of a fresh file: only the `DEFAULT` section
    fn default_table() -> SecretResult<Table> {
        let mut table = Table::new();
        Self::insert_record(&mut table, DEFAULT_SECTION, DEFAULT_PLACEHOLDER.to_string())?;
        Ok(table)
    }

    /// Stores `secret` for `account`, replacing any existing record
    ///
    /// # Errors
    ///
    /// Returns an error if the account name is blank, the secret cannot be
    /// ciphered, or the file cannot be read or written.
    pub fn add(&self, account: &str, secret: &str) -> SecretResult<()> {
        validate_account(account)?;
        let mut table = self.load()?;
        Self::insert_record(&mut table, account, self.cipher.encrypt(secret)?)?;
        self.save(&table)?;
        info!(account, "Password added");
        Ok(())
    }

    /// Reads and deciphers the secret stored for `account`
    ///
    /// Returns `None` (and logs a warning) if the account does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the record is malformed.
    pub fn read(&self, account: &str) -> SecretResult<Option<SecretString>> {
        let table = self.load()?;
        let Some(value) = table.get(account) else {
            warn!(account, "Account not found in credential file");
            return Ok(None);
        };
        let record: AccountRecord = value.clone().try_into().map_err(|e| {
            SecretError::Parse(format!("Malformed record for account {account:?}: {e}"))
        })?;
        let plain = self.cipher.decrypt(&record.password)?;
        Ok(Some(SecretString::from(plain)))
    }

    /// Replaces the secret of an existing account
    ///
    /// Returns `false` (and logs a warning) without writing if the account
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret cannot be ciphered or the file cannot be
    /// read or written.
    pub fn update(&self, account: &str, secret: &str) -> SecretResult<bool> {
        let mut table = self.load()?;
        if !table.contains_key(account) {
            warn!(account, "Account not found in credential file");
            return Ok(false);
        }
        Self::insert_record(&mut table, account, self.cipher.encrypt(secret)?)?;
        self.save(&table)?;
        info!(account, "Password updated");
        Ok(true)
    }

    /// Deletes the record for `account`
    ///
    /// Returns `false` (and logs a warning) without touching the file if the
    /// account does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn remove(&self, account: &str) -> SecretResult<bool> {
        let table = self.load()?;
        if !table.contains_key(account) {
            warn!(account, "Account not found in credential file");
            return Ok(false);
        }
        // rebuilt rather than removed in place so section order survives
        let table: Table = table.into_iter().filter(|(k, _)| k != account).collect();
        self.save(&table)?;
        info!(account, "Password removed");
        Ok(true)
    }

    /// Lists all section names in file order, including `DEFAULT`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn list(&self) -> SecretResult<Vec<String>> {
        Ok(self.load()?.keys().cloned().collect())
    }

    /// Returns true if a section named `account` exists
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn contains(&self, account: &str) -> SecretResult<bool> {
        Ok(self.load()?.contains_key(account))
    }

    fn insert_record(table: &mut Table, account: &str, password: String) -> SecretResult<()> {
        let value = toml::Value::try_from(AccountRecord { password })
            .map_err(|e| SecretError::Write(format!("Failed to encode record: {e}")))?;
        table.insert(account.to_string(), value);
        Ok(())
    }

    /// Loads the file; a missing file reads as a fresh one holding only `DEFAULT`
    fn load(&self) -> SecretResult<Table> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Credential file missing, reading as fresh");
            return Self::default_table();
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            SecretError::Read(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        content.parse::<Table>().map_err(|e| {
            SecretError::Parse(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, table: &Table) -> SecretResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SecretError::Write(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let content = toml::to_string(table)
            .map_err(|e| SecretError::Write(format!("Failed to serialize: {e}")))?;
        fs::write(&self.path, content).map_err(|e| {
            SecretError::Write(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

fn validate_account(account: &str) -> SecretResult<()> {
    if account.trim().is_empty() {
        return Err(SecretError::InvalidAccount(account.to_string()));
    }
    Ok(())
}
