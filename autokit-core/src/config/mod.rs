//! Configuration management for `AutoKit`
//!
//! This module provides the `ConfigManager` for loading and saving
//! `settings.toml`.

mod manager;
pub mod settings;

pub use manager::ConfigManager;
pub use settings::{
    AppSettings, BootstrapSettings, BrowserSettings, DatabaseSettings, ExportSettings,
    LoggingSettings, StoreSettings,
};
