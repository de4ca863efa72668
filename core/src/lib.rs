//! bmpm-core
//!
//! Beider–Morse phonetic matching: rule model, bounded rule application,
//! language guessing and the name encoder shared by the rule loader and the
//! command-line tools.
//!
//! Rule data is never parsed here. An engine is handed a read-only
//! [`RuleTable`] (usually a [`RuleSet`] built by `bmpm-rules` or by hand in
//! tests) and only reads from it.
//!
//! Public API:
//! - `PhoneticEngine` - Name → phonetic alternatives encoder
//! - `RuleTable` / `RuleSet` - Rule lookup seam and its in-memory implementation
//! - `Rule` / `RuleList` / `Phoneme` - Context-sensitive rewrite rules
//! - `LanguageGuesser` / `LanguageRule` - Word → candidate languages
//! - `RuleApplier` / `Frontier` - Bounded branching rule application
//! - `Config` - Engine configuration
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{ConfigError, ParseKindError, RuleError};

pub mod language;
pub use language::{Language, LanguageSet};

pub mod rule;
pub use rule::{NameType, Phoneme, Rule, RuleList, RuleType};

pub mod frontier;
pub use frontier::Frontier;

pub mod applier;
pub use applier::{ApplyStats, RuleApplier};

pub mod guesser;
pub use guesser::{LanguageGuesser, LanguageRule};

pub mod table;
pub use table::{RuleSet, RuleTable};

pub mod engine;
pub use engine::PhoneticEngine;

/// Default bound on alternatives kept per frontier.
pub const DEFAULT_MAX_PHONEMES: usize = 20;

/// Engine configuration.
///
/// Every field is optional in TOML; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Which guess rules, rule tables and name prefixes apply
    pub name_type: NameType,
    /// Finalization rule set (approx collapses near-homophones)
    pub rule_type: RuleType,
    /// Join the words of a name into one set of alternatives
    pub concat: bool,
    /// Maximum alternatives kept at every branching step (must be > 0)
    pub max_phonemes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name_type: NameType::Generic,
            rule_type: RuleType::Approx,
            concat: true,
            max_phonemes: DEFAULT_MAX_PHONEMES,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check the settings that do not depend on a rule table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_phonemes == 0 {
            return Err(ConfigError::InvalidMaxPhonemes(self.max_phonemes));
        }
        Ok(())
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC), lower-case and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().to_lowercase().trim().to_string()
    }
}
