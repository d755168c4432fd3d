// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Masking strategies for labeled PII values

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::config::{MaskingStrategy, PiiLabel, Secret};

type HmacSha256 = Hmac<Sha256>;

pub const TOKEN_PREFIX: &str = "pii_";
const TOKEN_HEX_LEN: usize = 32;

/// Apply a masking strategy to a single value
///
/// # Arguments
/// * `value` - Raw value to mask
/// * `label` - Category the value was classified as
/// * `strategy` - Which transformation to apply
/// * `secret` - HMAC key, only read by [`MaskingStrategy::Tokenize`]
pub fn apply_strategy(
    value: &str,
    label: PiiLabel,
    strategy: MaskingStrategy,
    secret: &Secret,
) -> String {
    match strategy {
        MaskingStrategy::Redact => redact_label(label),
        MaskingStrategy::Partial => partial_mask(value),
        MaskingStrategy::Tokenize => tokenize_value(value, secret),
    }
}

/// Full redaction: `[EMAIL]`, `[SA_ID]`, ...
pub fn redact_label(label: PiiLabel) -> String {
    format!("[{}]", label.as_str())
}

/// Keep the first 3 and last 2 characters, star out the middle.
///
/// Values of 4 characters or fewer are starred out entirely. Counts are in
/// characters, not bytes.
pub fn partial_mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();

    if len <= 4 {
        return "*".repeat(len);
    }

    let mut masked = String::with_capacity(value.len());
    masked.extend(&chars[..3]);
    masked.push_str(&"*".repeat(len.saturating_sub(5)));
    masked.extend(&chars[len - 2..]);
    masked
}

/// Deterministic keyed token: `pii_` + first 32 hex chars of HMAC-SHA256
pub fn tokenize_value(value: &str, secret: &Secret) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.expose()).expect("HMAC accepts keys of any length");
    mac.update(value.as_bytes());
    let digest = hex::encode(mac.finalize().into_bytes());
    format!("{}{}", TOKEN_PREFIX, &digest[..TOKEN_HEX_LEN])
}
