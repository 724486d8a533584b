//! Dependency bootstrap
//!
//! Makes sure a list of external packages is available before the rest of the
//! toolkit runs, installing whatever is missing through a `PackageInstaller`.

mod installer;

use std::collections::HashSet;

use tracing::info;

pub use installer::{
    default_check_command, default_install_command, CommandInstaller, PackageInstaller,
    PACKAGE_PLACEHOLDER,
};

use crate::error::BootstrapResult;

/// Packages required by the original toolkit scripts
pub const REQUIRED_PACKAGES: &[&str] = &[
    "pandas",
    "numpy",
    "matplotlib",
    "seaborn",
    "scipy",
    "statsmodels",
    "sklearn",
    "cx_Oracle",
    "pyodbc",
    "sqlalchemy",
    "openpyxl",
    "sql_formatter",
    "selenium",
];

/// Outcome of a bootstrap run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Packages that were already available
    pub already_installed: Vec<String>,
    /// Packages installed during this run, in installation order
    pub installed: Vec<String>,
}

impl BootstrapReport {
    /// Returns true if nothing had to be installed
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.installed.is_empty()
    }
}

/// Ensures every package in `packages` is available
///
/// Packages are checked in order and duplicates are skipped. Missing packages
/// are installed one at a time; the first failure aborts the run and packages
/// installed before it stay installed.
///
/// # Errors
///
/// Returns `BootstrapError::InstallFailed` for the first package that fails
/// to install.
pub fn ensure_installed<I, S>(installer: &I, packages: &[S]) -> BootstrapResult<BootstrapReport>
where
    I: PackageInstaller + ?Sized,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut report = BootstrapReport::default();

    for package in packages.iter().map(AsRef::as_ref) {
        if !seen.insert(package) {
            continue;
        }
        if installer.is_installed(package) {
            report.already_installed.push(package.to_string());
            continue;
        }
        info!(package, "Installing missing package");
        installer.install(package)?;
        report.installed.push(package.to_string());
    }

    if report.is_noop() {
        info!("All required packages are already installed");
    } else {
        info!("Installed packages: {}", report.installed.join(", "));
    }
    Ok(report)
}
