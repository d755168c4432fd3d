// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Regex pattern compilation for PII detection
// RegexSet screens text once; the individual regexes then substitute in order

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};

use super::config::PiiLabel;
use super::error::MaskingError;

/// Compiled matcher with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub name: &'static str,
    pub label: PiiLabel,
    pub regex: Regex,
    /// Only replace matches confirmed by the identity validator
    pub needs_id_check: bool,
}

/// All matchers in substitution order, plus a RegexSet over the same sources
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    pub regex_set: RegexSet,
    pub patterns: Vec<CompiledPattern>,
}

impl CompiledPatterns {
    /// True when no matcher finds anything in `text`
    pub fn is_clean(&self, text: &str) -> bool {
        !self.regex_set.is_match(text)
    }

    pub fn get(&self, name: &str) -> Option<&CompiledPattern> {
        self.patterns.iter().find(|p| p.name == name)
    }
}

/// Pattern definition (name, label, regex, case-insensitive, needs ID check)
type PatternDef = (&'static str, PiiLabel, &'static str, bool, bool);

// Order is substitution precedence: specific and validated categories first,
// loose heuristics (plate, address) last.
static PATTERN_DEFS: Lazy<Vec<PatternDef>> = Lazy::new(|| {
    vec![
        (
            "email",
            PiiLabel::Email,
            r"\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b",
            true,
            false,
        ),
        (
            "phone_za",
            PiiLabel::Phone,
            r"\b(?:\+?27|0)[\s-]?\d{2}[\s-]?\d{3}[\s-]?\d{4}\b",
            false,
            false,
        ),
        ("id_za", PiiLabel::SaId, r"\b\d{13}\b", false, true),
        ("ipv4", PiiLabel::Ip, r"\b(?:\d{1,3}\.){3}\d{1,3}\b", false, false),
        (
            "plate_za",
            PiiLabel::Plate,
            r"\b[A-Z]{2,3}\s?\d{2,3}\s?[A-Z]{0,2}\b",
            true,
            false,
        ),
        (
            "address_hint",
            PiiLabel::Address,
            r"\b\d{1,5}\s+[A-Za-z]+(?:\s+[A-Za-z]+)*\s+(?:Street|St|Road|Rd|Ave|Avenue|Drive|Dr|Close|Cl|Lane|Ln)\b",
            true,
            false,
        ),
    ]
});

/// Compile the built-in matchers
pub fn compile_patterns() -> Result<CompiledPatterns, MaskingError> {
    let mut patterns = Vec::with_capacity(PATTERN_DEFS.len());

    for &(name, label, source, case_insensitive, needs_id_check) in PATTERN_DEFS.iter() {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|source| MaskingError::PatternCompile { name, source })?;
        patterns.push(CompiledPattern {
            name,
            label,
            regex,
            needs_id_check,
        });
    }

    // Case sensitivity is per pattern, so the set gets inline flags
    let set_sources = PATTERN_DEFS.iter().map(|(_, _, source, ci, _)| {
        if *ci {
            format!("(?i){}", source)
        } else {
            source.to_string()
        }
    });
    let regex_set = RegexSetBuilder::new(set_sources)
        .build()
        .map_err(|source| MaskingError::PatternCompile {
            name: "regex_set",
            source,
        })?;

    Ok(CompiledPatterns {
        regex_set,
        patterns,
    })
}
