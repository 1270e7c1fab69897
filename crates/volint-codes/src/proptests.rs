//! Property-based tests for label derivation.
//!
//! Invariants checked:
//! - derived labels always have the requested length
//! - the same seed always yields the same letters
//! - output is drawn from upper-case A..Z only

use crate::label::{Label, hash_letters};
use proptest::prelude::*;

proptest! {
    #[test]
    fn derived_label_is_always_four_uppercase_letters(seed in ".*") {
        let label = Label::derived(&seed);
        let s = label.as_str();
        prop_assert_eq!(s.len(), 4);
        prop_assert!(s.bytes().all(|b| b.is_ascii_uppercase()));
    }

    #[test]
    fn derivation_is_deterministic(seed in ".*") {
        prop_assert_eq!(Label::derived(&seed), Label::derived(&seed));
    }

    #[test]
    fn hash_letters_fills_any_requested_length(seed in ".*", n in 0usize..12) {
        let mut buf = vec![0u8; n];
        hash_letters(&seed, &mut buf);
        prop_assert_eq!(buf.len(), n);
        prop_assert!(buf.iter().all(|b| (b'A'..=b'Z').contains(b)));
    }

    #[test]
    fn label_construction_never_panics(text in ".*") {
        let label = Label::new(&text);
        prop_assert_eq!(label.as_str().len(), 4);
    }
}
