// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// POPIA-oriented PII masking for JSON payloads
// Optional PyO3 bindings behind the `python` feature

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod masking;

pub use masking::{
    is_valid_identity, mask_payload, mask_string, validate_identity_number, IdValidation,
    MaskingConfig, MaskingError, MaskingStrategy, PiiLabel, PiiMasker, Secret,
};

/// Python module: popia_mask
///
/// Masks personal information in JSON payloads and validates South African
/// ID numbers.
///
/// # Examples
///
/// ```python
/// from popia_mask import PiiMaskerRust
///
/// masker = PiiMaskerRust({
///     "default_strategy": "redact",
///     "secret": "s3cret",
///     "drop_fields": ["password", "otp"],
/// })
///
/// masker.mask_json('{"email": "john@example.com", "password": "x"}')
/// # '{"email":"[EMAIL]"}'
///
/// masker.mask_text("phone: 072 123 4567", "partial")
/// # 'phone: 072*******67'
/// ```
#[cfg(feature = "python")]
#[pymodule]
fn popia_mask(m: &Bound<'_, pyo3::types::PyModule>) -> PyResult<()> {
    m.add_class::<masking::PiiMaskerRust>()?;

    // Module metadata
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add(
        "__doc__",
        "PII masking and South African ID validation for JSON payloads",
    )?;

    Ok(())
}
