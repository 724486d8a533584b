//! Property-based tests for the secret ciphers

use autokit_core::secret::{AeadCipher, SecretCipher, ShiftCipher};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Deciphering a shifted string yields the original
    #[test]
    fn shift_round_trip(plain in "\\PC{0,64}") {
        let cipher = ShiftCipher;
        let encrypted = cipher.encrypt(&plain).unwrap();
        prop_assert_eq!(cipher.decrypt(&encrypted).unwrap(), plain);
    }

    /// The shift keeps the character count
    #[test]
    fn shift_preserves_length(plain in "\\PC{0,64}") {
        let encrypted = ShiftCipher.encrypt(&plain).unwrap();
        prop_assert_eq!(encrypted.chars().count(), plain.chars().count());
    }

    /// Each ASCII letter moves exactly one code point
    #[test]
    fn shift_moves_each_char_by_one(plain in "[a-yA-Y0-8]{1,32}") {
        let encrypted = ShiftCipher.encrypt(&plain).unwrap();
        for (a, b) in plain.chars().zip(encrypted.chars()) {
            prop_assert_eq!(u32::from(a) + 1, u32::from(b));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// AES-GCM round trips arbitrary text under a fixed key
    #[test]
    fn aead_round_trip(plain in "\\PC{0,64}", key in prop::array::uniform32(any::<u8>())) {
        let cipher = AeadCipher::new(&key).unwrap();
        let encrypted = cipher.encrypt(&plain).unwrap();
        prop_assert_ne!(&encrypted, &plain);
        prop_assert_eq!(cipher.decrypt(&encrypted).unwrap(), plain);
    }

    /// A ciphertext never opens under a different key
    #[test]
    fn aead_rejects_other_key(plain in "[a-z]{1,16}", key in prop::array::uniform32(any::<u8>())) {
        let mut other = key;
        other[0] ^= 0xFF;
        let encrypted = AeadCipher::new(&key).unwrap().encrypt(&plain).unwrap();
        prop_assert!(AeadCipher::new(&other).unwrap().decrypt(&encrypted).is_err());
    }
}
