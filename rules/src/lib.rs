//! bmpm-rules crate root
//!
//! This crate reads Beider–Morse rule files into the in-memory `RuleSet`
//! used by `bmpm-core`, and provides an `Encoder` that builds engines over
//! the loaded rules.
//!
//! Public API exported here:
//! - `load_dir` and `RuleLoader` from `loader`
//! - rule-file parsers from `parser`
//! - `RulesConfig` from `config`
//! - `Encoder` from `engine`

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod parser;

pub use config::RulesConfig;
pub use engine::Encoder;
pub use error::{EncoderError, LoadError};
pub use loader::{load_dir, RuleLoader};

// Convenience re-exports for common types used by callers.
pub use bmpm_core::{
    Config, ConfigError, Language, LanguageSet, NameType, PhoneticEngine, RuleSet, RuleTable,
    RuleType,
};
