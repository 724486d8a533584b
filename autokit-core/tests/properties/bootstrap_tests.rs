//! Property-based tests for dependency bootstrap

use std::cell::RefCell;
use std::collections::HashSet;

use autokit_core::bootstrap::{ensure_installed, PackageInstaller};
use autokit_core::error::{BootstrapError, BootstrapResult};
use proptest::prelude::*;

/// Installer backed by an in-memory set of present packages
struct FakeInstaller {
    present: RefCell<HashSet<String>>,
    broken: Option<String>,
    installs: RefCell<Vec<String>>,
}

impl FakeInstaller {
    fn new(present: &[String], broken: Option<String>) -> Self {
        Self {
            present: RefCell::new(present.iter().cloned().collect()),
            broken,
            installs: RefCell::new(Vec::new()),
        }
    }
}

impl PackageInstaller for FakeInstaller {
    fn is_installed(&self, package: &str) -> bool {
        self.present.borrow().contains(package)
    }

    fn install(&self, package: &str) -> BootstrapResult<()> {
        self.installs.borrow_mut().push(package.to_string());
        if self.broken.as_deref() == Some(package) {
            return Err(BootstrapError::InstallFailed {
                package: package.to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        self.present.borrow_mut().insert(package.to_string());
        Ok(())
    }
}

fn arb_packages() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}", 0..10)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Only missing packages are installed, in first-seen order
    #[test]
    fn installs_only_missing(required in arb_packages(), present in arb_packages()) {
        let installer = FakeInstaller::new(&present, None);
        let report = ensure_installed(&installer, &required).unwrap();

        let mut seen = HashSet::new();
        let expected: Vec<String> = required
            .iter()
            .filter(|p| seen.insert(p.as_str()) && !present.contains(p))
            .cloned()
            .collect();
        prop_assert_eq!(&report.installed, &expected);
        let installs = installer.installs.borrow().clone();
        prop_assert_eq!(installs, expected);
    }

    /// A second run installs nothing
    #[test]
    fn second_run_is_noop(required in arb_packages()) {
        let installer = FakeInstaller::new(&[], None);
        ensure_installed(&installer, &required).unwrap();
        let report = ensure_installed(&installer, &required).unwrap();
        prop_assert!(report.is_noop());
    }

    /// The first failure stops the run; later packages are not attempted
    #[test]
    fn stops_at_first_failure(required in prop::collection::vec("[a-z]{1,6}", 1..10), pick in any::<prop::sample::Index>()) {
        let broken = required[pick.index(required.len())].clone();
        let installer = FakeInstaller::new(&[], Some(broken.clone()));

        let result = ensure_installed(&installer, &required);
        let is_install_failure = matches!(result, Err(BootstrapError::InstallFailed { ref package, .. }) if *package == broken);
        prop_assert!(is_install_failure);
        let last = installer.installs.borrow().last().cloned();
        prop_assert_eq!(last, Some(broken));
    }
}
