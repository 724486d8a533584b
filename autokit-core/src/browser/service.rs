//! Local WebDriver server process
//!
//! Browsers are driven through a separate driver binary (`msedgedriver`,
//! `chromedriver`, `geckodriver`). The service spawns it on a fixed port,
//! waits for the port to accept connections and kills the process when
//! stopped or dropped.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::error::{BrowserError, BrowserResult};

/// Delay between readiness checks
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Supported browsers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Microsoft Edge via msedgedriver
    #[default]
    Edge,
    /// Google Chrome via chromedriver
    Chrome,
    /// Mozilla Firefox via geckodriver
    Firefox,
}

impl BrowserKind {
    /// `browserName` capability value
    #[must_use]
    pub const fn browser_name(&self) -> &'static str {
        match self {
            Self::Edge => "MicrosoftEdge",
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
        }
    }

    /// Vendor options key for browser arguments
    #[must_use]
    pub const fn options_key(&self) -> &'static str {
        match self {
            Self::Edge => "ms:edgeOptions",
            Self::Chrome => "goog:chromeOptions",
            Self::Firefox => "moz:firefoxOptions",
        }
    }

    /// Driver binary looked up on `PATH` when no explicit path is configured
    #[must_use]
    pub const fn default_driver(&self) -> &'static str {
        match self {
            Self::Edge => "msedgedriver",
            Self::Chrome => "chromedriver",
            Self::Firefox => "geckodriver",
        }
    }

    /// Builds the session capabilities with `arguments` passed to the browser
    #[must_use]
    pub fn capabilities(&self, arguments: &[String]) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!(self.browser_name()));
        caps.insert(self.options_key().to_string(), json!({ "args": arguments }));
        caps
    }
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Edge => "edge",
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for BrowserKind {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edge" | "msedge" => Ok(Self::Edge),
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            other => Err(BrowserError::Session(format!("unknown browser {other:?}"))),
        }
    }
}

/// Arguments passed to the driver binary
#[must_use]
pub fn driver_args(port: u16) -> Vec<String> {
    vec![format!("--port={port}")]
}

/// A running driver process
#[derive(Debug)]
pub struct DriverService {
    child: Child,
    path: PathBuf,
    port: u16,
}

impl DriverService {
    /// Spawns the driver and waits until its port accepts connections
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::DriverLaunch` if the binary cannot be spawned
    /// or does not listen within `startup_timeout`.
    pub async fn start(path: &Path, port: u16, startup_timeout: Duration) -> BrowserResult<Self> {
        let launch_error = |reason: String| BrowserError::DriverLaunch {
            path: path.to_path_buf(),
            reason,
        };

        let child = Command::new(path)
            .args(driver_args(port))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| launch_error(e.to_string()))?;
        let mut service = Self {
            child,
            path: path.to_path_buf(),
            port,
        };
        debug!(path = %path.display(), port, "Driver spawned");

        let deadline = Instant::now() + startup_timeout;
        loop {
            sleep(POLL_INTERVAL).await;
            // a dead driver must not be mistaken for whatever else holds the port
            if let Ok(Some(status)) = service.child.try_wait() {
                return Err(launch_error(format!("exited early with {status}")));
            }
            if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
                info!(path = %path.display(), port, "Driver ready");
                return Ok(service);
            }
            if Instant::now() >= deadline {
                service.kill().await;
                return Err(launch_error(format!(
                    "not listening on port {port} after {startup_timeout:?}"
                )));
            }
        }
    }

    /// WebDriver endpoint URL
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Driver port
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Kills the driver process
    pub async fn stop(mut self) {
        self.kill().await;
        info!(path = %self.path.display(), "Driver stopped");
    }

    async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            warn!(path = %self.path.display(), error = %e, "Failed to kill driver");
        }
    }
}
