// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Error types for masker construction and configuration

/// Failures raised while building a masker or resolving its configuration.
///
/// Masking and validation never fail once a [`PiiMasker`](super::engine::PiiMasker)
/// exists; only setup does.
#[derive(Debug, thiserror::Error)]
pub enum MaskingError {
    /// Strategy name is not one of `redact`, `partial`, `tokenize`.
    #[error("Unknown masking strategy '{0}'. Expected one of: redact, partial, tokenize.")]
    UnknownStrategy(String),

    /// A built-in matcher failed to compile.
    #[error("Failed to compile pattern '{name}': {source}")]
    PatternCompile {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    /// A configuration value could not be used.
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_strategy_message() {
        let err = MaskingError::UnknownStrategy("scramble".to_string());
        assert!(err.to_string().contains("'scramble'"));
    }

    #[test]
    fn test_invalid_config_message() {
        let err = MaskingError::InvalidConfig {
            key: "DEFAULT_STRATEGY",
            reason: "empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration for DEFAULT_STRATEGY: empty"
        );
    }
}
