//! `AutoKit` Core Library
//!
//! Building blocks for small automation scripts: an obfuscated credential
//! store, a dependency bootstrap step, database-to-spreadsheet export and a
//! WebDriver browser session.

pub mod bootstrap;
pub mod browser;
pub mod config;
pub mod error;
pub mod export;
pub mod secret;

pub use bootstrap::{
    ensure_installed, BootstrapReport, CommandInstaller, PackageInstaller, REQUIRED_PACKAGES,
};
pub use browser::{BrowserKind, BrowserSession, DriverService, Locator, LocatorStrategy};
pub use config::{AppSettings, ConfigManager, DatabaseSettings};
pub use error::{
    AutokitError, BootstrapError, BrowserError, ConfigError, ConfigResult, ExportError,
    ExportResult, Result, SecretError, SecretResult,
};
pub use export::{
    export_to_spreadsheet, fetch, fetch_tagged, format_sql, Backend, BackendKind, CellValue, Table,
};
pub use secret::{
    build_cipher, open_store, AeadCipher, CipherKind, CredentialStore, SecretCipher, ShiftCipher,
};
