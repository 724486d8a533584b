//! Property-based tests for backend selection

use autokit_core::config::DatabaseSettings;
use autokit_core::error::ExportError;
use autokit_core::export::{fetch_tagged, Backend, BackendKind, DescriptorBackend};
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = BackendKind> {
    prop_oneof![
        Just(BackendKind::Driver),
        Just(BackendKind::Descriptor),
        Just(BackendKind::Url),
    ]
}

fn is_known_tag(tag: &str) -> bool {
    tag.parse::<BackendKind>().is_ok()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every tag parses back to its kind, in any letter case
    #[test]
    fn tag_round_trip(kind in arb_kind(), upper in any::<bool>()) {
        let tag = if upper { kind.tag().to_uppercase() } else { kind.tag().to_lowercase() };
        prop_assert_eq!(tag.parse::<BackendKind>().unwrap(), kind);
    }

    /// Building a backend from a kind keeps the kind
    #[test]
    fn from_kind_matches(kind in arb_kind()) {
        let backend = Backend::from_kind(kind, &DatabaseSettings::default());
        prop_assert_eq!(backend.kind(), kind);
    }

    /// Unknown tags fail before any connection is attempted
    #[test]
    fn unknown_tags_rejected(tag in "[A-Za-z0-9]{1,12}") {
        prop_assume!(!is_known_tag(&tag));
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let result = runtime.block_on(fetch_tagged("SELECT 1", &tag, &DatabaseSettings::default()));
        prop_assert!(matches!(result, Err(ExportError::UnsupportedBackend(ref t)) if *t == tag));
    }

    /// The password never appears in the redacted descriptor or Debug output
    #[test]
    fn descriptor_hides_password(password in "[a-zA-Z0-9]{12,24}") {
        let descriptor = DescriptorBackend {
            password: password.clone(),
            ..DescriptorBackend::default()
        };
        prop_assert!(!descriptor.redacted_descriptor().contains(&password));
        let debug = format!("{descriptor:?}");
        prop_assert!(!debug.contains(&password));
    }
}
