//! Application settings model
//!
//! This module defines the application-wide settings stored in settings.toml.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bootstrap::{default_check_command, default_install_command, REQUIRED_PACKAGES};
use crate::browser::BrowserKind;
use crate::export::{DescriptorBackend, DriverBackend, UrlBackend};
use crate::secret::CipherKind;

/// Application-wide settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Credential store settings
    #[serde(default)]
    pub store: StoreSettings,
    /// Dependency bootstrap settings
    #[serde(default)]
    pub bootstrap: BootstrapSettings,
    /// Database backend parameters
    #[serde(default)]
    pub database: DatabaseSettings,
    /// Browser automation settings
    #[serde(default)]
    pub browser: BrowserSettings,
    /// Spreadsheet export settings
    #[serde(default)]
    pub export: ExportSettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Credential store settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Credential file; `<config_dir>/credentials.toml` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Cipher applied to stored secrets
    #[serde(default)]
    pub cipher: CipherKind,
    /// Environment variable holding the passphrase for `aes_gcm`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase_env: Option<String>,
}

/// Dependency bootstrap settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapSettings {
    /// Packages that must be present
    #[serde(default = "default_packages")]
    pub packages: Vec<String>,
    /// Presence check command; `{package}` is substituted
    #[serde(default = "default_check_command")]
    pub check_command: Vec<String>,
    /// Install command; `{package}` is substituted
    #[serde(default = "default_install_command")]
    pub install_command: Vec<String>,
}

fn default_packages() -> Vec<String> {
    REQUIRED_PACKAGES.iter().map(ToString::to_string).collect()
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            packages: default_packages(),
            check_command: default_check_command(),
            install_command: default_install_command(),
        }
    }
}

/// Parameters for each database backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// `SSMS` backend
    #[serde(default)]
    pub driver: DriverBackend,
    /// `Oracle` backend
    #[serde(default)]
    pub descriptor: DescriptorBackend,
    /// `DP3` backend
    #[serde(default)]
    pub url: UrlBackend,
}

/// Browser automation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Browser to drive
    #[serde(default)]
    pub kind: BrowserKind,
    /// Driver binary; looked up on `PATH` by browser when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_path: Option<PathBuf>,
    /// Port the driver listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Default element wait in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long to wait for the driver to accept connections
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,
    /// Arguments passed to the browser
    #[serde(default = "default_arguments")]
    pub arguments: Vec<String>,
}

const fn default_port() -> u16 {
    9515
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_startup_timeout_secs() -> u64 {
    15
}

fn default_arguments() -> Vec<String> {
    vec!["--start-maximized".to_string()]
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            kind: BrowserKind::default(),
            driver_path: None,
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            startup_timeout_secs: default_startup_timeout_secs(),
            arguments: default_arguments(),
        }
    }
}

/// Spreadsheet export settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Directory relative output paths are resolved against
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}
