//! Error types for rule construction and engine configuration.
use crate::{Language, NameType, RuleType};

/// Raised when a `Rule` or guess rule cannot be constructed.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("rule input pattern must not be empty")]
    EmptyPattern,
    #[error("rule for pattern {pattern:?} lists no phoneme alternatives")]
    NoPhonemes { pattern: String },
    #[error("invalid context {context:?}: {source}")]
    InvalidContext {
        context: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid language guess pattern {pattern:?}: {source}")]
    InvalidGuessPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("language guess rule for {pattern:?} names no languages")]
    NoGuessLanguages { pattern: String },
}

/// Raised synchronously when a `PhoneticEngine` is constructed with a
/// configuration the rule table cannot serve.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("max_phonemes must be a positive integer, got {0}")]
    InvalidMaxPhonemes(usize),
    #[error("no languages declared for name type {0}")]
    NoLanguages(NameType),
    #[error("no {rule_type} rules for name type {name_type}, language {language}")]
    MissingRules {
        name_type: NameType,
        rule_type: RuleType,
        language: Language,
    },
    #[error("no {rule_type} finalization rules for name type {name_type}")]
    MissingFinalRules {
        name_type: NameType,
        rule_type: RuleType,
    },
    #[error("explicit language set is empty")]
    EmptyLanguageSet,
}

/// Raised when a `NameType` or `RuleType` is parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?}")]
pub struct ParseKindError {
    pub kind: &'static str,
    pub value: String,
}
