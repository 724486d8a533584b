//! Configuration manager for TOML file operations
//!
//! This module provides the `ConfigManager` which locates the configuration
//! directory and loads, validates and saves `settings.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::error::{ConfigError, ConfigResult};
use crate::secret::CipherKind;

use super::settings::AppSettings;

/// File names for configuration files
const SETTINGS_FILE: &str = "settings.toml";
const CREDENTIALS_FILE: &str = "credentials.toml";

/// Configuration manager for `AutoKit`
///
/// Configuration is stored in `~/.config/autokit/` by default.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Base directory for configuration files
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a new `ConfigManager` with the default configuration directory
    ///
    /// # Errors
    ///
    /// Returns an error if the user configuration directory cannot be determined.
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound(PathBuf::from("~/.config")))?
            .join("autokit");
        Ok(Self { config_dir })
    }

    /// Creates a new `ConfigManager` with a custom configuration directory
    #[must_use]
    pub fn with_config_dir(config_dir: impl AsRef<Path>) -> Self {
        Self {
            config_dir: expand_path(config_dir.as_ref()),
        }
    }

    /// Returns the configuration directory path
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Credential file used when the settings leave `store.path` unset
    #[must_use]
    pub fn default_store_path(&self) -> PathBuf {
        self.config_dir.join(CREDENTIALS_FILE)
    }

    /// Ensures the configuration directory exists
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> ConfigResult<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir).map_err(|e| {
                ConfigError::Write(format!(
                    "Failed to create config directory {}: {}",
                    self.config_dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Loads and validates application settings
    ///
    /// Returns default settings if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or fails validation.
    pub fn load_settings(&self) -> ConfigResult<AppSettings> {
        let settings = Self::load_toml_file::<AppSettings>(&self.settings_path())?;
        Self::validate_settings(&settings)?;
        Ok(settings)
    }

    /// Saves application settings
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_settings(&self, settings: &AppSettings) -> ConfigResult<()> {
        self.ensure_config_dir()?;
        Self::save_toml_file(&self.settings_path(), settings)
    }

    /// Resolves the credential file for `settings`, expanding `~`
    #[must_use]
    pub fn store_path(&self, settings: &AppSettings) -> PathBuf {
        settings
            .store
            .path
            .as_deref()
            .map_or_else(|| self.default_store_path(), expand_path)
    }

    /// Resolves a spreadsheet output path against `export.output_dir`
    #[must_use]
    pub fn output_path(settings: &AppSettings, output: &Path) -> PathBuf {
        let output = expand_path(output);
        if output.is_absolute() {
            output
        } else {
            expand_path(&settings.export.output_dir).join(output)
        }
    }

    /// Reads the store passphrase from the configured environment variable
    ///
    /// Returns `None` for ciphers that take no passphrase.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the variable is not set.
    pub fn store_passphrase(settings: &AppSettings) -> ConfigResult<Option<SecretString>> {
        if settings.store.cipher != CipherKind::AesGcm {
            return Ok(None);
        }
        let var = settings
            .store
            .passphrase_env
            .as_deref()
            .ok_or_else(|| ConfigError::Validation {
                field: "store.passphrase_env".to_string(),
                reason: "required for the aes_gcm cipher".to_string(),
            })?;
        std::env::var(var)
            .map(|value| Some(SecretString::from(value)))
            .map_err(|_| ConfigError::Validation {
                field: "store.passphrase_env".to_string(),
                reason: format!("environment variable {var} is not set"),
            })
    }

    /// Validates settings values that serde cannot check
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first invalid field.
    pub fn validate_settings(settings: &AppSettings) -> ConfigResult<()> {
        let invalid = |field: &str, reason: &str| {
            Err(ConfigError::Validation {
                field: field.to_string(),
                reason: reason.to_string(),
            })
        };

        if settings.store.cipher == CipherKind::AesGcm
            && settings
                .store
                .passphrase_env
                .as_deref()
                .is_none_or(|v| v.trim().is_empty())
        {
            return invalid("store.passphrase_env", "required for the aes_gcm cipher");
        }
        if settings.bootstrap.check_command.is_empty() {
            return invalid("bootstrap.check_command", "command cannot be empty");
        }
        if settings.bootstrap.install_command.is_empty() {
            return invalid("bootstrap.install_command", "command cannot be empty");
        }
        if settings.browser.port == 0 {
            return invalid("browser.port", "port cannot be 0");
        }
        if settings.browser.timeout_secs == 0 {
            return invalid("browser.timeout_secs", "timeout must be positive");
        }
        if settings.database.url.url.trim().is_empty() {
            return invalid("database.url.url", "URL cannot be empty");
        }
        Ok(())
    }

    fn load_toml_file<T>(path: &Path) -> ConfigResult<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read {}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| {
            ConfigError::Deserialize(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn save_toml_file<T>(path: &Path, data: &T) -> ConfigResult<()>
    where
        T: serde::Serialize,
    {
        let content = toml::to_string_pretty(data)
            .map_err(|e| ConfigError::Serialize(format!("Failed to serialize: {e}")))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::Write(format!("Failed to write {}: {}", path.display(), e)))
    }
}

fn expand_path(path: &Path) -> PathBuf {
    path.to_str().map_or_else(
        || path.to_path_buf(),
        |p| PathBuf::from(shellexpand::tilde(p).into_owned()),
    )
}
