// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// POPIA PII masking
//
// - Ordered regex passes over free text, screened by a RegexSet
// - Field-name classification over JSON payload trees
// - Redact / partial / HMAC-tokenize strategies
// - South African identity number validation

pub mod config;
pub mod engine;
pub mod error;
pub mod patterns;
pub mod strategies;
pub mod validators;

pub use config::{MaskingConfig, MaskingStrategy, PiiLabel, Secret};
pub use engine::{mask_payload, mask_string, PiiMasker};
pub use error::MaskingError;
pub use validators::{is_valid_identity, validate_identity_number, IdValidation};

#[cfg(feature = "python")]
pub use engine::PiiMaskerRust;
