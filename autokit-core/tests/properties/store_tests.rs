//! Property-based tests for the credential store

use autokit_core::secret::{CredentialStore, DEFAULT_SECTION};
use proptest::prelude::*;
use secrecy::ExposeSecret;
use tempfile::TempDir;

// ========== Generators ==========

fn arb_account() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_. -]{0,20}"
        .prop_filter("reserved section", |s| s != DEFAULT_SECTION && !s.trim().is_empty())
}

fn arb_secret() -> impl Strategy<Value = String> {
    "\\PC{0,32}"
}

fn open_temp() -> (CredentialStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = CredentialStore::open(temp_dir.path().join("credentials.toml"))
        .expect("Failed to open store");
    (store, temp_dir)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// add, read, update, read, remove, read behaves as a map entry lifecycle
    #[test]
    fn account_lifecycle(account in arb_account(), first in arb_secret(), second in arb_secret()) {
        let (store, _temp) = open_temp();

        store.add(&account, &first).unwrap();
        let read = store.read(&account).unwrap().unwrap();
        prop_assert_eq!(read.expose_secret(), first.as_str());

        prop_assert!(store.update(&account, &second).unwrap());
        let read = store.read(&account).unwrap().unwrap();
        prop_assert_eq!(read.expose_secret(), second.as_str());

        prop_assert!(store.remove(&account).unwrap());
        prop_assert!(store.read(&account).unwrap().is_none());
        prop_assert_eq!(store.list().unwrap(), vec![DEFAULT_SECTION.to_string()]);
    }

    /// Secrets never appear in the file as plain text
    #[test]
    fn secrets_are_ciphered_on_disk(account in arb_account(), secret in "[a-z]{8,16}") {
        let (store, _temp) = open_temp();
        store.add(&account, &secret).unwrap();
        let content = std::fs::read_to_string(store.path()).unwrap();
        prop_assert!(!content.contains(&secret));
    }

    /// Removing an absent account leaves the file byte-for-byte unchanged
    #[test]
    fn remove_missing_is_noop(present in arb_account(), missing in arb_account()) {
        prop_assume!(present != missing);
        let (store, _temp) = open_temp();
        store.add(&present, "secret").unwrap();
        let before = std::fs::read(store.path()).unwrap();

        prop_assert!(!store.remove(&missing).unwrap());
        prop_assert!(!store.update(&missing, "other").unwrap());
        prop_assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    /// Sections keep insertion order after DEFAULT
    #[test]
    fn list_preserves_insertion_order(accounts in prop::collection::vec(arb_account(), 1..8)) {
        let (store, _temp) = open_temp();
        let mut expected = vec![DEFAULT_SECTION.to_string()];
        for account in &accounts {
            store.add(account, "x").unwrap();
            if !expected.contains(account) {
                expected.push(account.clone());
            }
        }
        prop_assert_eq!(store.list().unwrap(), expected);
    }

    /// Reopening an existing store does not rewrite it
    #[test]
    fn reopen_is_idempotent(account in arb_account()) {
        let (store, _temp) = open_temp();
        store.add(&account, "secret").unwrap();
        let before = std::fs::read(store.path()).unwrap();
        let reopened = CredentialStore::open(store.path()).unwrap();
        prop_assert_eq!(std::fs::read(reopened.path()).unwrap(), before);
    }
}
