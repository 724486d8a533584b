//! Database backend selection
//!
//! A backend tag from the command line or a script is parsed into a closed
//! `BackendKind`; combined with `DatabaseSettings` it yields a `Backend`
//! carrying everything its connection builder needs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DatabaseSettings;
use crate::error::ExportError;

/// The three supported connection strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// SQL Server addressed through a driver/server/database string
    Driver,
    /// Oracle addressed through a user/password/host/port/service descriptor
    Descriptor,
    /// Any engine reachable through a connection URL
    Url,
}

impl BackendKind {
    /// Returns all backend kinds
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Driver, Self::Descriptor, Self::Url]
    }

    /// Canonical tag for this backend
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Driver => "SSMS",
            Self::Descriptor => "Oracle",
            Self::Url => "DP3",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BackendKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssms" | "mssql" | "sqlserver" | "driver" => Ok(Self::Driver),
            "oracle" | "descriptor" => Ok(Self::Descriptor),
            "dp3" | "url" | "engine" => Ok(Self::Url),
            _ => Err(ExportError::UnsupportedBackend(s.to_string())),
        }
    }
}

/// SQL Server connection parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverBackend {
    /// ODBC driver name
    #[serde(default = "default_driver")]
    pub driver: String,
    /// Server host, optionally `host,port`
    #[serde(default = "default_server")]
    pub server: String,
    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
    /// Use the current OS identity instead of SQL credentials
    #[serde(default = "default_true")]
    pub trusted_connection: bool,
}

fn default_driver() -> String {
    "SQL Server".to_string()
}

fn default_server() -> String {
    "your_server_name".to_string()
}

fn default_database() -> String {
    "your_database_name".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for DriverBackend {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            server: default_server(),
            database: default_database(),
            trusted_connection: true,
        }
    }
}

impl DriverBackend {
    /// ODBC style connection string
    #[must_use]
    pub fn odbc_connection_string(&self) -> String {
        format!(
            "Driver={{{}}};Server={};Database={};Trusted_Connection={};",
            self.driver,
            self.server,
            self.database,
            if self.trusted_connection { "yes" } else { "no" }
        )
    }

    /// ADO.NET style connection string understood by the TDS client
    #[must_use]
    pub fn ado_connection_string(&self) -> String {
        format!(
            "Server=tcp:{};Database={};IntegratedSecurity={};TrustServerCertificate=true",
            self.server, self.database, self.trusted_connection
        )
    }
}

/// Oracle connection descriptor
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorBackend {
    /// Database user
    #[serde(default = "default_user")]
    pub user: String,
    /// Database password
    #[serde(default = "default_password")]
    pub password: String,
    /// Listener host
    #[serde(default = "default_host")]
    pub host: String,
    /// Listener port
    #[serde(default = "default_oracle_port")]
    pub port: u16,
    /// Service name or SID
    #[serde(default = "default_service")]
    pub service: String,
}

fn default_user() -> String {
    "username".to_string()
}

fn default_password() -> String {
    "password".to_string()
}

fn default_host() -> String {
    "hostname".to_string()
}

const fn default_oracle_port() -> u16 {
    1521
}

fn default_service() -> String {
    "SID".to_string()
}

impl Default for DescriptorBackend {
    fn default() -> Self {
        Self {
            user: default_user(),
            password: default_password(),
            host: default_host(),
            port: default_oracle_port(),
            service: default_service(),
        }
    }
}

impl std::fmt::Debug for DescriptorBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorBackend")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("service", &self.service)
            .finish()
    }
}

impl DescriptorBackend {
    /// Easy Connect string `//host:port/service`
    #[must_use]
    pub fn easy_connect(&self) -> String {
        format!("//{}:{}/{}", self.host, self.port, self.service)
    }

    /// `user/password@host:port/service` with the password masked
    #[must_use]
    pub fn redacted_descriptor(&self) -> String {
        format!(
            "{}/***@{}:{}/{}",
            self.user, self.host, self.port, self.service
        )
    }
}

/// Engine connection URL (postgres://, mysql://, sqlite:)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlBackend {
    /// Connection URL
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    "sqlite::memory:".to_string()
}

impl Default for UrlBackend {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

/// A fully configured backend, one variant per connection strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// SQL Server
    Driver(DriverBackend),
    /// Oracle
    Descriptor(DescriptorBackend),
    /// URL-addressed engine
    Url(UrlBackend),
}

impl Backend {
    /// Picks the parameters for `kind` out of `settings`
    #[must_use]
    pub fn from_kind(kind: BackendKind, settings: &DatabaseSettings) -> Self {
        match kind {
            BackendKind::Driver => Self::Driver(settings.driver.clone()),
            BackendKind::Descriptor => Self::Descriptor(settings.descriptor.clone()),
            BackendKind::Url => Self::Url(settings.url.clone()),
        }
    }

    /// Returns the kind of this backend
    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Driver(_) => BackendKind::Driver,
            Self::Descriptor(_) => BackendKind::Descriptor,
            Self::Url(_) => BackendKind::Url,
        }
    }
}
