//! Property-based tests for settings persistence through ConfigManager

use std::path::PathBuf;

use autokit_core::browser::BrowserKind;
use autokit_core::config::{AppSettings, ConfigManager};
use autokit_core::secret::CipherKind;
use proptest::prelude::*;
use tempfile::TempDir;

// ========== Generators ==========

fn arb_browser_kind() -> impl Strategy<Value = BrowserKind> {
    prop_oneof![
        Just(BrowserKind::Edge),
        Just(BrowserKind::Chrome),
        Just(BrowserKind::Firefox),
    ]
}

fn arb_settings() -> impl Strategy<Value = AppSettings> {
    (
        prop::option::of("[a-z]{1,10}\\.toml"),
        any::<bool>(),
        arb_browser_kind(),
        1u16..=65535u16,
        1u64..=600u64,
        prop::collection::vec("--[a-z-]{1,16}", 0..4),
        prop::collection::vec("[a-z_]{1,12}", 0..6),
        "(trace|debug|info|warn|error)",
    )
        .prop_map(
            |(path, aes, kind, port, timeout, arguments, packages, filter)| {
                let mut settings = AppSettings::default();
                settings.store.path = path.map(PathBuf::from);
                if aes {
                    settings.store.cipher = CipherKind::AesGcm;
                    settings.store.passphrase_env = Some("AUTOKIT_PASSPHRASE".to_string());
                }
                settings.browser.kind = kind;
                settings.browser.port = port;
                settings.browser.timeout_secs = timeout;
                settings.browser.arguments = arguments;
                settings.bootstrap.packages = packages;
                settings.logging.filter = filter;
                settings
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Saved settings load back unchanged
    #[test]
    fn settings_round_trip(settings in arb_settings()) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp_dir.path());

        manager.save_settings(&settings).expect("Failed to save settings");
        let loaded = manager.load_settings().expect("Failed to load settings");
        prop_assert_eq!(loaded, settings);
    }

    /// Relative store paths are used as given, unset ones fall back to the config dir
    #[test]
    fn store_path_resolution(settings in arb_settings()) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp_dir.path());
        let resolved = manager.store_path(&settings);
        match &settings.store.path {
            Some(path) => prop_assert_eq!(&resolved, path),
            None => prop_assert_eq!(resolved, temp_dir.path().join("credentials.toml")),
        }
    }
}
