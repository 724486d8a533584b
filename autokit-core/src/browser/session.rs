//! WebDriver browser session

use std::path::PathBuf;
use std::time::Duration;

use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::BrowserSettings;
use crate::error::{BrowserError, BrowserResult};

use super::locator::Locator;
use super::service::DriverService;

/// Delay between clickability checks
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A browser driven through a locally spawned WebDriver server
///
/// Every operation other than [`BrowserSession::open`] fails with
/// `BrowserError::NotStarted` until the session is opened.
#[derive(Debug)]
pub struct BrowserSession {
    settings: BrowserSettings,
    service: Option<DriverService>,
    client: Option<Client>,
}

impl BrowserSession {
    /// Creates an unopened session
    #[must_use]
    pub const fn new(settings: BrowserSettings) -> Self {
        Self {
            settings,
            service: None,
            client: None,
        }
    }

    /// Whether `open` has succeeded and `close` has not been called
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.client.is_some()
    }

    /// Wait bound used when an operation gets no explicit timeout
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs)
    }

    /// Path of the driver binary that `open` spawns
    #[must_use]
    pub fn driver_path(&self) -> PathBuf {
        self.settings
            .driver_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.settings.kind.default_driver()))
    }

    /// Starts the driver and a browser session; a no-op when already open
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::DriverLaunch` or `BrowserError::Session`.
    pub async fn open(&mut self) -> BrowserResult<()> {
        if self.is_open() {
            return Ok(());
        }

        let service = DriverService::start(
            &self.driver_path(),
            self.settings.port,
            Duration::from_secs(self.settings.startup_timeout_secs),
        )
        .await?;

        let caps = self.settings.kind.capabilities(&self.settings.arguments);
        let connected = ClientBuilder::native()
            .capabilities(caps)
            .connect(&service.url())
            .await;

        match connected {
            Ok(client) => {
                info!(browser = %self.settings.kind, "Browser session started");
                self.client = Some(client);
                self.service = Some(service);
                Ok(())
            }
            Err(e) => {
                service.stop().await;
                Err(BrowserError::Session(e.to_string()))
            }
        }
    }

    fn client(&self) -> BrowserResult<&Client> {
        self.client.as_ref().ok_or(BrowserError::NotStarted)
    }

    /// Loads `url` in the current window
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::NotStarted` or `BrowserError::Command`.
    pub async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.client()?.goto(url).await.map_err(command_error)?;
        info!(url, "Opened URL");
        Ok(())
    }

    /// Waits up to `timeout` (or the default) for an element to be present
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::ElementNotFound` when the wait expires.
    pub async fn find_element(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> BrowserResult<Element> {
        let client = self.client()?;
        let timeout = timeout.unwrap_or_else(|| self.default_timeout());
        let query = locator.to_query();
        debug!(%locator, ?timeout, "Waiting for element");

        client
            .wait()
            .at_most(timeout)
            .for_element(query.as_locator())
            .await
            .map_err(|e| wait_error(e, locator, timeout))
    }

    /// Waits for the element to be displayed and enabled
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::ElementNotFound` if the element is absent or
    /// stays unclickable for the whole wait.
    pub async fn wait_until_clickable(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> BrowserResult<Element> {
        let timeout = timeout.unwrap_or_else(|| self.default_timeout());
        let deadline = Instant::now() + timeout;
        let element = self.find_element(locator, Some(timeout)).await?;

        loop {
            let displayed = element.is_displayed().await.map_err(command_error)?;
            if displayed && element.is_enabled().await.map_err(command_error)? {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::ElementNotFound {
                    locator: locator.to_string(),
                    timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Clicks the element once it is clickable
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::ElementNotFound` or `BrowserError::Command`.
    pub async fn click(&self, locator: &Locator, timeout: Option<Duration>) -> BrowserResult<()> {
        let element = self.wait_until_clickable(locator, timeout).await?;
        element.click().await.map_err(command_error)?;
        debug!(%locator, "Clicked");
        Ok(())
    }

    /// Types `text` into the element, clearing it first if asked
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::ElementNotFound` or `BrowserError::Command`.
    pub async fn enter_text(
        &self,
        locator: &Locator,
        text: &str,
        clear_first: bool,
        timeout: Option<Duration>,
    ) -> BrowserResult<()> {
        let element = self.find_element(locator, timeout).await?;
        if clear_first {
            element.clear().await.map_err(command_error)?;
        }
        element.send_keys(text).await.map_err(command_error)?;
        debug!(%locator, "Entered text");
        Ok(())
    }

    /// Visible text of the element
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::ElementNotFound` or `BrowserError::Command`.
    pub async fn read_text(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> BrowserResult<String> {
        let element = self.find_element(locator, timeout).await?;
        element.text().await.map_err(command_error)
    }

    /// Scrolls the page until the element is in view
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::ElementNotFound` or `BrowserError::Command`.
    pub async fn scroll_into_view(
        &self,
        locator: &Locator,
        timeout: Option<Duration>,
    ) -> BrowserResult<()> {
        let element = self.find_element(locator, timeout).await?;
        let arg = serde_json::to_value(&element)
            .map_err(|e| BrowserError::Command(e.to_string()))?;
        self.client()?
            .execute("arguments[0].scrollIntoView(true);", vec![arg])
            .await
            .map_err(command_error)?;
        Ok(())
    }

    /// Title of the current page
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::NotStarted` or `BrowserError::Command`.
    pub async fn title(&self) -> BrowserResult<String> {
        self.client()?.title().await.map_err(command_error)
    }

    /// Ends the browser session and stops the driver; safe to call twice
    pub async fn close(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = client.close().await {
                warn!(error = %e, "Failed to close browser session");
            }
        }
        if let Some(service) = self.service.take() {
            service.stop().await;
        }
    }
}

fn command_error(e: CmdError) -> BrowserError {
    BrowserError::Command(e.to_string())
}

/// Maps a failed element wait, keeping driver faults apart from absence
fn wait_error(e: CmdError, locator: &Locator, timeout: Duration) -> BrowserError {
    match e {
        CmdError::WaitTimeout => BrowserError::ElementNotFound {
            locator: locator.to_string(),
            timeout,
        },
        e if e.is_no_such_element() => BrowserError::ElementNotFound {
            locator: locator.to_string(),
            timeout,
        },
        other => command_error(other),
    }
}
