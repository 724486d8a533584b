//! Browser automation over WebDriver

mod locator;
mod service;
mod session;

pub use locator::{Locator, LocatorStrategy};
pub use service::{driver_args, BrowserKind, DriverService};
pub use session::BrowserSession;
