// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Configuration types for PII masking

use std::collections::HashSet;
use std::env;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::types::PyDict;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::MaskingError;

/// Secret used when none is configured. Fine for local runs, never for production.
pub const PLACEHOLDER_SECRET: &str = "replace-me-with-secure-key";

/// Fields dropped from payloads when nothing else is configured.
pub const DEFAULT_DROP_FIELDS: &[&str] = &["password", "otp"];

/// PII categories a value or substring can be labeled with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiLabel {
    Email,
    Phone,
    SaId,
    Ip,
    Plate,
    Address,
    Passport,
    Name,
}

impl PiiLabel {
    /// Upper-case tag used inside redaction brackets, e.g. `SA_ID`
    pub fn as_str(&self) -> &'static str {
        match self {
            PiiLabel::Email => "EMAIL",
            PiiLabel::Phone => "PHONE",
            PiiLabel::SaId => "SA_ID",
            PiiLabel::Ip => "IP",
            PiiLabel::Plate => "PLATE",
            PiiLabel::Address => "ADDRESS",
            PiiLabel::Passport => "PASSPORT",
            PiiLabel::Name => "NAME",
        }
    }
}

impl fmt::Display for PiiLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Masking strategies for detected PII
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaskingStrategy {
    #[default]
    Redact, // Replace with [LABEL]
    Partial,  // Keep first 3 and last 2 chars (e.g., 072*****67)
    Tokenize, // Replace with keyed token (e.g., pii_3f9a...)
}

impl MaskingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskingStrategy::Redact => "redact",
            MaskingStrategy::Partial => "partial",
            MaskingStrategy::Tokenize => "tokenize",
        }
    }

    /// Resolve a per-request strategy name.
    ///
    /// Absent or empty names fall back to `default`. Any name other than
    /// `redact` or `partial` resolves to [`MaskingStrategy::Tokenize`].
    pub fn resolve(name: Option<&str>, default: MaskingStrategy) -> MaskingStrategy {
        match name {
            None | Some("") => default,
            Some("redact") => MaskingStrategy::Redact,
            Some("partial") => MaskingStrategy::Partial,
            Some(_) => MaskingStrategy::Tokenize,
        }
    }
}

impl FromStr for MaskingStrategy {
    type Err = MaskingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "redact" => Ok(MaskingStrategy::Redact),
            "partial" => Ok(MaskingStrategy::Partial),
            "tokenize" => Ok(MaskingStrategy::Tokenize),
            other => Err(MaskingError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for MaskingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HMAC key for tokenization. Never printed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

/// Process-wide masking configuration, resolved once at startup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MaskingConfig {
    /// Strategy used when a request names none
    pub default_strategy: MaskingStrategy,

    /// HMAC key for tokenization
    pub secret: Secret,

    /// Keys removed from payloads instead of masked (exact, case-sensitive)
    pub drop_fields: HashSet<String>,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            default_strategy: MaskingStrategy::Redact,
            secret: Secret::from(PLACEHOLDER_SECRET),
            drop_fields: DEFAULT_DROP_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MaskingConfig {
    /// Load configuration from `DEFAULT_STRATEGY`, `SECRET` and `DROP_FIELDS`.
    ///
    /// Unset variables keep their defaults. `DROP_FIELDS` is comma-separated.
    pub fn from_env() -> Result<Self, MaskingError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("DEFAULT_STRATEGY") {
            config.default_strategy = value.trim().parse().map_err(|e: MaskingError| {
                MaskingError::InvalidConfig {
                    key: "DEFAULT_STRATEGY",
                    reason: e.to_string(),
                }
            })?;
        }

        if let Ok(value) = env::var("SECRET") {
            if value.is_empty() {
                return Err(MaskingError::InvalidConfig {
                    key: "SECRET",
                    reason: "must not be empty".to_string(),
                });
            }
            config.secret = Secret::from(value);
        }

        if let Ok(value) = env::var("DROP_FIELDS") {
            config.drop_fields = parse_drop_fields(&value);
        }

        if config.uses_placeholder_secret() {
            warn!("SECRET is not set; tokens are derived from the placeholder key");
        }

        Ok(config)
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.secret.expose() == PLACEHOLDER_SECRET.as_bytes()
    }

    /// Extract configuration from Python dict
    #[cfg(feature = "python")]
    pub fn from_py_dict(dict: &Bound<'_, PyDict>) -> PyResult<Self> {
        let mut config = Self::default();

        if let Some(value) = dict.get_item("default_strategy")? {
            let name: String = value.extract()?;
            config.default_strategy = name
                .parse()
                .map_err(|e: MaskingError| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        }

        if let Some(value) = dict.get_item("secret")? {
            let secret: String = value.extract()?;
            config.secret = Secret::from(secret);
        }

        if let Some(value) = dict.get_item("drop_fields")? {
            let fields: Vec<String> = value.extract()?;
            config.drop_fields = fields.into_iter().collect();
        }

        Ok(config)
    }
}

/// Split a comma-separated field list, trimming and skipping blanks
pub fn parse_drop_fields(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pii_label_as_str() {
        assert_eq!(PiiLabel::Email.as_str(), "EMAIL");
        assert_eq!(PiiLabel::SaId.as_str(), "SA_ID");
        assert_eq!(PiiLabel::Ip.to_string(), "IP");
    }

    #[test]
    fn test_pii_label_serde_names() {
        assert_eq!(
            serde_json::to_string(&PiiLabel::SaId).unwrap(),
            "\"SA_ID\""
        );
    }

    #[test]
    fn test_default_config() {
        let config = MaskingConfig::default();
        assert_eq!(config.default_strategy, MaskingStrategy::Redact);
        assert!(config.drop_fields.contains("password"));
        assert!(config.drop_fields.contains("otp"));
        assert!(config.uses_placeholder_secret());
    }

    #[test]
    fn test_strategy_strict_parse() {
        assert_eq!("partial".parse::<MaskingStrategy>().unwrap(), MaskingStrategy::Partial);
        assert!(matches!(
            "Redact".parse::<MaskingStrategy>(),
            Err(MaskingError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_strategy_resolve_fallbacks() {
        let default = MaskingStrategy::Partial;
        assert_eq!(MaskingStrategy::resolve(None, default), default);
        assert_eq!(MaskingStrategy::resolve(Some(""), default), default);
        assert_eq!(
            MaskingStrategy::resolve(Some("redact"), default),
            MaskingStrategy::Redact
        );
        assert_eq!(
            MaskingStrategy::resolve(Some("hash"), default),
            MaskingStrategy::Tokenize
        );
    }

    #[test]
    fn test_parse_drop_fields() {
        let fields = parse_drop_fields(" password, otp ,,pin ");
        assert_eq!(fields.len(), 3);
        assert!(fields.contains("pin"));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::from("hunter2");
        assert_eq!(format!("{:?}", secret), "Secret([REDACTED])");
    }

    #[test]
    fn test_config_deserialize() {
        let config: MaskingConfig = serde_json::from_str(
            r#"{"default_strategy":"tokenize","secret":"k","drop_fields":["ssn"]}"#,
        )
        .unwrap();
        assert_eq!(config.default_strategy, MaskingStrategy::Tokenize);
        assert_eq!(config.secret.expose(), b"k");
        assert!(config.drop_fields.contains("ssn"));
        assert!(!config.drop_fields.contains("password"));
    }

    fn clear_config_env() {
        for key in ["DEFAULT_STRATEGY", "SECRET", "DROP_FIELDS"] {
            env::remove_var(key);
        }
    }

    // Process environment is global, so every from_env case lives in one test
    #[test]
    fn test_from_env() {
        clear_config_env();

        let config = MaskingConfig::from_env().unwrap();
        assert_eq!(config.default_strategy, MaskingStrategy::Redact);
        assert!(config.uses_placeholder_secret());
        assert_eq!(config.drop_fields, parse_drop_fields("password,otp"));

        env::set_var("DEFAULT_STRATEGY", "scramble");
        assert!(matches!(
            MaskingConfig::from_env(),
            Err(MaskingError::InvalidConfig {
                key: "DEFAULT_STRATEGY",
                ..
            })
        ));

        env::set_var("DEFAULT_STRATEGY", " partial ");
        env::set_var("SECRET", "");
        assert!(matches!(
            MaskingConfig::from_env(),
            Err(MaskingError::InvalidConfig { key: "SECRET", .. })
        ));

        env::set_var("SECRET", "prod-key");
        env::set_var("DROP_FIELDS", "pin, ssn,,");
        let config = MaskingConfig::from_env().unwrap();
        assert_eq!(config.default_strategy, MaskingStrategy::Partial);
        assert_eq!(config.secret, Secret::new(b"prod-key".to_vec()));
        assert!(!config.uses_placeholder_secret());
        assert_eq!(config.drop_fields.len(), 2);
        assert!(config.drop_fields.contains("pin"));
        assert!(config.drop_fields.contains("ssn"));
        assert!(!config.drop_fields.contains("password"));

        clear_config_env();
    }
}
