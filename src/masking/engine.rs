// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Core masking logic: free-text substitution and structured payload traversal

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::{debug, trace};

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::types::PyDict;

use super::config::{MaskingConfig, MaskingStrategy, PiiLabel, Secret};
use super::error::MaskingError;
use super::patterns::{compile_patterns, CompiledPatterns};
use super::strategies::apply_strategy;
use super::validators::is_valid_identity;

/// Field-name rule: any needle contained in the lower-cased key assigns `label`
struct FieldRule {
    needles: &'static [&'static str],
    label: PiiLabel,
    /// Only applies when the value is a string or number
    scalar_only: bool,
}

// First match wins.
const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        needles: &["email"],
        label: PiiLabel::Email,
        scalar_only: false,
    },
    FieldRule {
        needles: &["phone", "mobile"],
        label: PiiLabel::Phone,
        scalar_only: false,
    },
    FieldRule {
        needles: &["id"],
        label: PiiLabel::SaId,
        scalar_only: true,
    },
    FieldRule {
        needles: &["passport"],
        label: PiiLabel::Passport,
        scalar_only: false,
    },
    FieldRule {
        needles: &["name"],
        label: PiiLabel::Name,
        scalar_only: false,
    },
    FieldRule {
        needles: &["address"],
        label: PiiLabel::Address,
        scalar_only: false,
    },
];

/// Classify a mapping key by its name
pub fn classify_field(key: &str, value: &Value) -> Option<PiiLabel> {
    let key = key.to_lowercase();
    let scalar = scalar_text(value).is_some();

    FIELD_RULES
        .iter()
        .find(|rule| {
            (scalar || !rule.scalar_only) && rule.needles.iter().any(|n| key.contains(n))
        })
        .map(|rule| rule.label)
}

/// String form of a string or number; `None` for everything else
fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}

/// Mask PII-shaped substrings in free text
///
/// Matchers run in fixed order (email, phone, SA ID, IPv4, plate, address),
/// each over the output of the previous one. 13-digit runs are only replaced
/// when they pass [`is_valid_identity`].
///
/// Returns the input borrowed when nothing matched.
pub fn mask_string<'a>(
    text: &'a str,
    patterns: &CompiledPatterns,
    strategy: MaskingStrategy,
    secret: &Secret,
) -> Cow<'a, str> {
    if patterns.is_clean(text) {
        // Zero-copy when no matcher fires
        return Cow::Borrowed(text);
    }

    let mut masked = text.to_string();
    for pattern in &patterns.patterns {
        let replaced = match pattern
            .regex
            .replace_all(&masked, |caps: &regex::Captures<'_>| {
                let found = &caps[0];
                if pattern.needs_id_check && !is_valid_identity(found) {
                    found.to_string()
                } else {
                    apply_strategy(found, pattern.label, strategy, secret)
                }
            }) {
            Cow::Owned(next) => Some(next),
            Cow::Borrowed(_) => None,
        };

        if let Some(next) = replaced {
            masked = next;
        }
    }

    Cow::Owned(masked)
}

/// Read-only inputs shared by every node of one traversal
struct MaskContext<'a> {
    patterns: &'a CompiledPatterns,
    strategy: MaskingStrategy,
    secret: &'a Secret,
    drop_fields: &'a HashSet<String>,
}

/// Mask a whole payload tree, returning a new tree
///
/// # Arguments
/// * `payload` - Arbitrary JSON value; not modified
/// * `patterns` - Compiled matchers for free-text values
/// * `strategy` - Already-resolved masking strategy
/// * `secret` - HMAC key for tokenization
/// * `drop_fields` - Keys removed at every depth
pub fn mask_payload(
    payload: &Value,
    patterns: &CompiledPatterns,
    strategy: MaskingStrategy,
    secret: &Secret,
    drop_fields: &HashSet<String>,
) -> Value {
    let ctx = MaskContext {
        patterns,
        strategy,
        secret,
        drop_fields,
    };
    mask_any(payload, &ctx)
}

fn mask_any(value: &Value, ctx: &MaskContext<'_>) -> Value {
    match value {
        Value::Null | Value::Bool(_) => value.clone(),

        Value::String(s) => {
            Value::String(mask_string(s, ctx.patterns, ctx.strategy, ctx.secret).into_owned())
        }

        // Numbers are scanned as text so bare numeric IDs and phones are caught
        Value::Number(n) => Value::String(
            mask_string(&n.to_string(), ctx.patterns, ctx.strategy, ctx.secret).into_owned(),
        ),

        Value::Array(items) => Value::Array(items.iter().map(|v| mask_any(v, ctx)).collect()),

        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());

            for (key, item) in map {
                if ctx.drop_fields.contains(key) {
                    trace!(field = %key, "dropping configured field");
                    continue;
                }

                // A labeled scalar is masked whole, without pattern scanning
                let masked = match (classify_field(key, item), scalar_text(item)) {
                    (Some(label), Some(raw)) => {
                        Value::String(apply_strategy(&raw, label, ctx.strategy, ctx.secret))
                    }
                    _ => mask_any(item, ctx),
                };
                out.insert(key.clone(), masked);
            }

            Value::Object(out)
        }
    }
}

/// Compiled matchers plus the process-wide configuration.
///
/// Build once at startup and share by reference; every method is a pure
/// function of its arguments and the immutable state held here.
#[derive(Debug, Clone)]
pub struct PiiMasker {
    patterns: CompiledPatterns,
    config: MaskingConfig,
}

impl PiiMasker {
    pub fn new(config: MaskingConfig) -> Result<Self, MaskingError> {
        let patterns = compile_patterns()?;
        debug!(
            default_strategy = %config.default_strategy,
            drop_fields = config.drop_fields.len(),
            "PII masker ready"
        );
        Ok(Self { patterns, config })
    }

    pub fn config(&self) -> &MaskingConfig {
        &self.config
    }

    pub fn patterns(&self) -> &CompiledPatterns {
        &self.patterns
    }

    /// Per-request strategy name to strategy, using the configured default
    pub fn resolve_strategy(&self, name: Option<&str>) -> MaskingStrategy {
        MaskingStrategy::resolve(name, self.config.default_strategy)
    }

    pub fn mask_text<'a>(&self, text: &'a str, strategy: Option<&str>) -> Cow<'a, str> {
        let strategy = self.resolve_strategy(strategy);
        mask_string(text, &self.patterns, strategy, &self.config.secret)
    }

    pub fn mask_payload(&self, payload: &Value, strategy: Option<&str>) -> Value {
        let strategy = self.resolve_strategy(strategy);
        debug!(strategy = %strategy, "masking payload");
        mask_payload(
            payload,
            &self.patterns,
            strategy,
            &self.config.secret,
            &self.config.drop_fields,
        )
    }

    /// Mask several independent records with one strategy, preserving order
    pub fn mask_batch(&self, payloads: &[Value], strategy: Option<&str>) -> Vec<Value> {
        let strategy = self.resolve_strategy(strategy);
        debug!(strategy = %strategy, records = payloads.len(), "masking batch");
        payloads
            .iter()
            .map(|payload| {
                mask_payload(
                    payload,
                    &self.patterns,
                    strategy,
                    &self.config.secret,
                    &self.config.drop_fields,
                )
            })
            .collect()
    }
}

/// PII masker exposed to Python
///
/// # Example (Python)
/// ```python
/// from popia_mask import PiiMaskerRust
///
/// masker = PiiMaskerRust({"default_strategy": "partial", "secret": "s3cret"})
/// masker.mask_json('{"mobile": "0721234567"}')  # '{"mobile":"072*****67"}'
/// masker.validate_id("8001015009087")["valid"]   # True
/// ```
#[cfg(feature = "python")]
#[pyclass]
pub struct PiiMaskerRust {
    inner: PiiMasker,
}

#[cfg(feature = "python")]
#[pymethods]
impl PiiMaskerRust {
    /// Create a masker
    ///
    /// # Configuration Keys
    /// * `default_strategy` (str): "redact", "partial" or "tokenize"
    /// * `secret` (str): HMAC key for tokenization
    /// * `drop_fields` (list[str]): keys removed from payloads
    #[new]
    #[pyo3(signature = (config_dict=None))]
    pub fn new(config_dict: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config_dict {
            Some(dict) => MaskingConfig::from_py_dict(dict)?,
            None => MaskingConfig::default(),
        };

        let inner = PiiMasker::new(config)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Mask a JSON document, returning JSON
    #[pyo3(signature = (payload_json, strategy=None))]
    pub fn mask_json(&self, payload_json: &str, strategy: Option<&str>) -> PyResult<String> {
        let payload: Value = serde_json::from_str(payload_json).map_err(|e| {
            pyo3::exceptions::PyValueError::new_err(format!("Invalid JSON payload: {}", e))
        })?;
        let masked = self.inner.mask_payload(&payload, strategy);
        serde_json::to_string(&masked)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    /// Mask PII inside a block of free text
    #[pyo3(signature = (text, strategy=None))]
    pub fn mask_text(&self, text: &str, strategy: Option<&str>) -> String {
        self.inner.mask_text(text, strategy).into_owned()
    }

    /// Validate a South African ID number
    ///
    /// Returns `{"idNumber": str, "valid": bool, "reason": str}`
    pub fn validate_id(&self, py: Python<'_>, id_number: &str) -> PyResult<Py<PyAny>> {
        let result = super::validators::validate_identity_number(id_number);
        let py_dict = PyDict::new(py);
        py_dict.set_item("idNumber", result.id_number)?;
        py_dict.set_item("valid", result.valid)?;
        py_dict.set_item("reason", result.reason)?;
        Ok(py_dict.into_any().unbind())
    }
}
