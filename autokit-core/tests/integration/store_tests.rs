//! Integration tests for the credential store driven by settings

use std::fs;

use autokit_core::config::{AppSettings, ConfigManager};
use autokit_core::secret::{build_cipher, open_store, CipherKind, CredentialStore};
use secrecy::{ExposeSecret, SecretString};
use tempfile::TempDir;

use crate::fixtures::LEGACY_CREDENTIALS;

#[test]
fn test_open_store_from_default_settings() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_config_dir(temp.path().join("autokit"));
    let settings = AppSettings::default();

    let store = open_store(&manager, &settings).unwrap();
    assert_eq!(store.path(), manager.config_dir().join("credentials.toml"));
    assert_eq!(store.list().unwrap(), vec!["DEFAULT"]);
}

#[test]
fn test_existing_file_is_readable() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("credentials.toml");
    fs::write(&path, LEGACY_CREDENTIALS).unwrap();

    let store = CredentialStore::open(&path).unwrap();
    assert_eq!(store.list().unwrap(), vec!["DEFAULT", "mail", "build server"]);
    assert_eq!(store.read("mail").unwrap().unwrap().expose_secret(), "pw1");
    assert_eq!(
        store.read("build server").unwrap().unwrap().expose_secret(),
        "hidden"
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), LEGACY_CREDENTIALS);
}

#[test]
fn test_aes_store_round_trip_and_wrong_passphrase() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("credentials.toml");
    let passphrase = SecretString::from("correct horse battery staple".to_string());
    let cipher = build_cipher(CipherKind::AesGcm, Some(&passphrase)).unwrap();

    let store = CredentialStore::open_with_cipher(&path, cipher).unwrap();
    store.add("vault", "s3cret").unwrap();
    assert_eq!(store.read("vault").unwrap().unwrap().expose_secret(), "s3cret");
    assert!(!fs::read_to_string(&path).unwrap().contains("s3cret"));

    let wrong = SecretString::from("wrong passphrase".to_string());
    let other = CredentialStore::open_with_cipher(
        &path,
        build_cipher(CipherKind::AesGcm, Some(&wrong)).unwrap(),
    )
    .unwrap();
    assert!(other.read("vault").is_err());
}

#[test]
fn test_aes_settings_without_env_fail() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_config_dir(temp.path());
    let mut settings = AppSettings::default();
    settings.store.cipher = CipherKind::AesGcm;
    settings.store.passphrase_env = Some("AUTOKIT_TEST_PASSPHRASE_NEVER_SET".to_string());

    assert!(open_store(&manager, &settings).is_err());
    assert!(!manager.default_store_path().exists());
}

#[test]
fn test_settings_store_path_is_honoured() {
    let temp = TempDir::new().unwrap();
    let manager = ConfigManager::with_config_dir(temp.path().join("config"));
    let mut settings = AppSettings::default();
    let custom = temp.path().join("nested/dir/creds.toml");
    settings.store.path = Some(custom.clone());
    manager.save_settings(&settings).unwrap();

    let loaded = manager.load_settings().unwrap();
    let store = open_store(&manager, &loaded).unwrap();
    assert_eq!(store.path(), custom);
    assert!(custom.exists());
}
