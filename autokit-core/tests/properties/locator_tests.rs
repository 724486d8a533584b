//! Property-based tests for locator parsing

use autokit_core::browser::{Locator, LocatorStrategy};
use proptest::prelude::*;

fn arb_strategy() -> impl Strategy<Value = LocatorStrategy> {
    prop::sample::select(LocatorStrategy::all().to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Display output parses back to the same locator
    #[test]
    fn display_parse_round_trip(strategy in arb_strategy(), value in "[^\\s]{1,24}") {
        let locator = Locator::new(strategy, value);
        let parsed: Locator = locator.to_string().parse().unwrap();
        prop_assert_eq!(parsed, locator);
    }

    /// Strings without a separator are rejected
    #[test]
    fn missing_separator_rejected(text in "[a-z]{0,16}") {
        prop_assert!(text.parse::<Locator>().is_err());
    }
}
