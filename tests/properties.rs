// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Property tests for masking invariants

use popia_mask::masking::strategies::{partial_mask, tokenize_value};
use popia_mask::{MaskingConfig, PiiMasker, Secret};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn masker() -> PiiMasker {
    PiiMasker::new(MaskingConfig::default()).unwrap()
}

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("password".to_string()),
        Just("otp".to_string()),
        "[a-zA-Z]{1,10}",
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z0-9@. ]{0,24}".prop_map(Value::String),
    ];

    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn has_key_anywhere(value: &Value, key: &str) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key(key) || map.values().any(|v| has_key_anywhere(v, key))
        }
        Value::Array(items) => items.iter().any(|v| has_key_anywhere(v, key)),
        _ => false,
    }
}

proptest! {
    #[test]
    fn text_without_pii_is_unchanged(text in "[a-zA-Z ,.!?'-]{0,80}") {
        let masker = masker();
        for strategy in ["redact", "partial", "tokenize"] {
            prop_assert_eq!(masker.mask_text(&text, Some(strategy)), text.as_str());
        }
    }

    #[test]
    fn email_redacts_to_label(email in "[a-z]{1,10}(\\.[a-z]{1,6})?@[a-z]{1,10}\\.(com|org|co\\.za)") {
        let masker = masker();
        prop_assert_eq!(masker.mask_text(&email, Some("redact")), "[EMAIL]");
    }

    #[test]
    fn partial_keeps_prefix_and_suffix(value in "\\PC{5,40}") {
        let masked = partial_mask(&value);
        let original: Vec<char> = value.chars().collect();
        let out: Vec<char> = masked.chars().collect();

        prop_assert_eq!(out.len(), original.len());
        prop_assert_eq!(&out[..3], &original[..3]);
        prop_assert_eq!(&out[out.len() - 2..], &original[original.len() - 2..]);
        prop_assert!(out[3..out.len() - 2].iter().all(|c| *c == '*'));
    }

    #[test]
    fn partial_stars_short_values(value in "\\PC{0,4}") {
        let masked = partial_mask(&value);
        prop_assert_eq!(masked, "*".repeat(value.chars().count()));
    }

    #[test]
    fn tokenize_is_deterministic_and_keyed(
        value in "\\PC{0,40}",
        a in "[a-z0-9]{1,16}",
        b in "[a-z0-9]{1,16}",
    ) {
        prop_assume!(a != b);
        let first = tokenize_value(&value, &Secret::from(a.as_str()));
        let again = tokenize_value(&value, &Secret::from(a.as_str()));
        let other = tokenize_value(&value, &Secret::from(b.as_str()));

        prop_assert_eq!(&first, &again);
        prop_assert_ne!(&first, &other);
        prop_assert_eq!(first.len(), 36);
    }

    #[test]
    fn dropped_fields_never_appear(payload in arb_json()) {
        let masker = masker();
        for strategy in ["redact", "partial", "tokenize"] {
            let masked = masker.mask_payload(&payload, Some(strategy));
            prop_assert!(!has_key_anywhere(&masked, "password"));
            prop_assert!(!has_key_anywhere(&masked, "otp"));
        }
    }
}
