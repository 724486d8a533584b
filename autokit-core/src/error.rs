//! Error types for `AutoKit`
//!
//! This module defines all error types used throughout the toolkit,
//! providing descriptive error messages for configuration, credential storage,
//! bootstrap, data export and browser automation operations.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Top-level error type for `AutoKit` operations
#[derive(Debug, Error)]
pub enum AutokitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Credential store errors
    #[error("Secret storage error: {0}")]
    Secret(#[from] SecretError),

    /// Dependency bootstrap errors
    #[error("Bootstrap error: {0}")]
    Bootstrap(#[from] BootstrapError),

    /// Database fetch and spreadsheet export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to configuration file operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {reason}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// The reason for validation failure
        reason: String,
    },

    /// Configuration directory could not be determined
    #[error("Configuration directory not found: {0}")]
    NotFound(PathBuf),

    /// Failed to write configuration file
    #[error("Failed to write configuration: {0}")]
    Write(String),

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Failed to deserialize configuration
    #[error("Failed to deserialize configuration: {0}")]
    Deserialize(String),
}

/// Errors related to the credential store and its cipher
#[derive(Debug, Error)]
pub enum SecretError {
    /// The cipher could not transform the input
    #[error("Cipher error: {0}")]
    Cipher(String),

    /// Account name is not usable as a section name
    #[error("Invalid account name: {0:?}")]
    InvalidAccount(String),

    /// Failed to read the credential file
    #[error("Failed to read credential file: {0}")]
    Read(String),

    /// The credential file is not a valid document
    #[error("Failed to parse credential file: {0}")]
    Parse(String),

    /// Failed to write the credential file
    #[error("Failed to write credential file: {0}")]
    Write(String),
}

/// Errors related to dependency bootstrap
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The installer command template is empty or malformed
    #[error("Invalid installer command: {0}")]
    InvalidCommand(String),

    /// Installing a package failed
    #[error("Failed to install {package}: {reason}")]
    InstallFailed {
        /// The package being installed
        package: String,
        /// Installer output or spawn error
        reason: String,
    },
}

/// Errors related to database fetches and spreadsheet export
#[derive(Debug, Error)]
pub enum ExportError {
    /// Backend tag does not name a supported backend
    #[error("Unsupported server type: {0}")]
    UnsupportedBackend(String),

    /// Backend support was not compiled in
    #[error("Backend not available in this build: {0}")]
    BackendUnavailable(&'static str),

    /// Argument rejected before doing any work
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Opening the database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Executing the query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Writing the spreadsheet failed
    #[error("Failed to write spreadsheet: {0}")]
    Spreadsheet(String),
}

/// Errors related to browser automation
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Operation requires an open session
    #[error("Browser session not started")]
    NotStarted,

    /// Locator string could not be parsed
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    /// The driver binary could not be launched
    #[error("Failed to launch browser driver {path}: {reason}")]
    DriverLaunch {
        /// Driver binary path
        path: PathBuf,
        /// Spawn or startup failure
        reason: String,
    },

    /// Creating the WebDriver session failed
    #[error("Failed to start browser session: {0}")]
    Session(String),

    /// Bounded wait for an element expired
    #[error("Element {locator} not found within {timeout:?}")]
    ElementNotFound {
        /// The locator that was searched for
        locator: String,
        /// The wait bound that expired
        timeout: Duration,
    },

    /// A WebDriver command failed
    #[error("WebDriver command failed: {0}")]
    Command(String),
}

/// Result type alias for `AutoKit` operations
pub type Result<T> = std::result::Result<T, AutokitError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for credential store operations
pub type SecretResult<T> = std::result::Result<T, SecretError>;

/// Result type alias for bootstrap operations
pub type BootstrapResult<T> = std::result::Result<T, BootstrapError>;

/// Result type alias for export operations
pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Result type alias for browser operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;
