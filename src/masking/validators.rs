// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// South African identity number validation
//
// Two checks live here on purpose. `is_valid_identity` gates masking of
// 13-digit runs in free text; `validate_identity_number` backs the standalone
// validation call and reports why a number was rejected.

use chrono::NaiveDate;
use serde::Serialize;

pub const REASON_BAD_FORMAT: &str = "ID must be 13 digits";
pub const REASON_BAD_BIRTHDATE: &str = "Invalid birthdate";
pub const REASON_BAD_CHECKSUM: &str = "Checksum invalid";
pub const REASON_VALID: &str = "Checksum valid, birthdate valid";

const ID_LENGTH: usize = 13;

/// Outcome of the standalone validation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdValidation {
    #[serde(rename = "idNumber")]
    pub id_number: String,
    pub valid: bool,
    pub reason: &'static str,
}

impl IdValidation {
    fn new(candidate: &str, valid: bool, reason: &'static str) -> Self {
        Self {
            id_number: candidate.to_string(),
            valid,
            reason,
        }
    }
}

/// Digits of `candidate` if it is exactly 13 ASCII digits
fn id_digits(candidate: &str) -> Option<Vec<u32>> {
    if candidate.len() != ID_LENGTH || !candidate.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(candidate.bytes().map(|b| u32::from(b - b'0')).collect())
}

/// YYMMDD is a real calendar date in either the 1900s or the 2000s
fn has_plausible_birthdate(digits: &[u32]) -> bool {
    let yy = (digits[0] * 10 + digits[1]) as i32;
    let mm = digits[2] * 10 + digits[3];
    let dd = digits[4] * 10 + digits[5];

    [1900, 2000]
        .iter()
        .any(|century| NaiveDate::from_ymd_opt(century + yy, mm, dd).is_some())
}

fn luhn_double(digit: u32) -> u32 {
    let doubled = digit * 2;
    if doubled > 9 {
        doubled - 9
    } else {
        doubled
    }
}

/// Check digit over the first 12 digits, doubling odd 0-based positions
fn weighted_check_digit(digits: &[u32]) -> u32 {
    let total: u32 = digits[..12]
        .iter()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 1 { luhn_double(d) } else { d })
        .sum();
    (10 - total % 10) % 10
}

/// Luhn over the whole number, doubling positions that share parity with the length
fn luhn_checksum(digits: &[u32]) -> bool {
    let parity = digits.len() % 2;
    let total: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| if i % 2 == parity { luhn_double(d) } else { d })
        .sum();
    total % 10 == 0
}

/// Masking gate for 13-digit candidates found in text.
///
/// Accepts only 13 ASCII digits whose first six form a plausible birthdate
/// and whose last digit matches the weighted check digit.
pub fn is_valid_identity(candidate: &str) -> bool {
    let Some(digits) = id_digits(candidate) else {
        return false;
    };
    has_plausible_birthdate(&digits) && weighted_check_digit(&digits) == digits[12]
}

/// Standalone validation with a human-readable reason.
///
/// Uses the full-length Luhn check rather than the masking gate's fixed
/// weighting.
pub fn validate_identity_number(candidate: &str) -> IdValidation {
    let Some(digits) = id_digits(candidate) else {
        return IdValidation::new(candidate, false, REASON_BAD_FORMAT);
    };

    if !has_plausible_birthdate(&digits) {
        return IdValidation::new(candidate, false, REASON_BAD_BIRTHDATE);
    }

    if !luhn_checksum(&digits) {
        return IdValidation::new(candidate, false, REASON_BAD_CHECKSUM);
    }

    IdValidation::new(candidate, true, REASON_VALID)
}
