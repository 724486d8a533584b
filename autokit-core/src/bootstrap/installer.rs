//! Package availability checks and installation through external commands

use std::process::Command;

use tracing::debug;

use crate::error::{BootstrapError, BootstrapResult};

/// Placeholder replaced with the package name in command templates
pub const PACKAGE_PLACEHOLDER: &str = "{package}";

/// Capability to check for and install a named package
pub trait PackageInstaller {
    /// Returns true if `package` is already available
    fn is_installed(&self, package: &str) -> bool;

    /// Installs `package`
    ///
    /// # Errors
    /// Returns `BootstrapError::InstallFailed` if the installer reports failure
    fn install(&self, package: &str) -> BootstrapResult<()>;
}

/// Installer driven by two command templates
///
/// Each template is a program followed by its arguments; every occurrence of
/// `{package}` is replaced with the package name. A package counts as
/// installed when the check command exits successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInstaller {
    check: Vec<String>,
    install: Vec<String>,
}

impl CommandInstaller {
    /// Creates an installer from check and install templates
    ///
    /// # Errors
    ///
    /// Returns an error if either template is empty.
    pub fn new(check: Vec<String>, install: Vec<String>) -> BootstrapResult<Self> {
        if check.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(BootstrapError::InvalidCommand(
                "check command is empty".to_string(),
            ));
        }
        if install.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(BootstrapError::InvalidCommand(
                "install command is empty".to_string(),
            ));
        }
        Ok(Self { check, install })
    }

    /// Installer that checks with `python3 -c "import <pkg>"` and installs with pip
    #[must_use]
    pub fn pip() -> Self {
        Self {
            check: default_check_command(),
            install: default_install_command(),
        }
    }

    /// Expands a template for `package`, returning the program and its arguments
    #[must_use]
    pub fn render(template: &[String], package: &str) -> (String, Vec<String>) {
        let mut parts = template
            .iter()
            .map(|part| part.replace(PACKAGE_PLACEHOLDER, package));
        let program = parts.next().unwrap_or_default();
        (program, parts.collect())
    }
}

impl PackageInstaller for CommandInstaller {
    fn is_installed(&self, package: &str) -> bool {
        let (program, args) = Self::render(&self.check, package);
        match Command::new(&program).args(&args).output() {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!(package, program, error = %e, "Check command could not be run");
                false
            }
        }
    }

    fn install(&self, package: &str) -> BootstrapResult<()> {
        let (program, args) = Self::render(&self.install, package);
        debug!(package, "Running {} {}", program, args.join(" "));

        let output = Command::new(&program)
            .args(&args)
            .output()
            .map_err(|e| BootstrapError::InstallFailed {
                package: package.to_string(),
                reason: format!("Failed to run {program}: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BootstrapError::InstallFailed {
                package: package.to_string(),
                reason: format!("{program} exited with {}: {}", output.status, stderr.trim()),
            });
        }
        Ok(())
    }
}

/// Default availability check
#[must_use]
pub fn default_check_command() -> Vec<String> {
    ["python3", "-c", "import {package}"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Default install command
#[must_use]
pub fn default_install_command() -> Vec<String> {
    ["python3", "-m", "pip", "install", "{package}"]
        .into_iter()
        .map(String::from)
        .collect()
}
