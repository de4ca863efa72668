//! Rule-directory backed encoder.
//!
//! Loads a rule directory once and hands out `PhoneticEngine`s for any
//! configuration. All engines share the same `Arc<RuleSet>`.

use std::path::Path;
use std::sync::Arc;

use bmpm_core::{Config, PhoneticEngine, RuleSet};
use tracing::debug;

use crate::config::RulesConfig;
use crate::error::EncoderError;
use crate::loader;

/// Public encoder for bmpm.
///
/// Cheap to clone; clones share the loaded rules.
#[derive(Debug, Clone)]
pub struct Encoder {
    rules: Arc<RuleSet>,
}

impl Encoder {
    /// Wrap an already built rule set.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    /// Load rule files from `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, EncoderError> {
        let dir = dir.as_ref();
        let rules = loader::load_dir(dir)?;
        debug!(dir = %dir.display(), name_types = ?rules.name_types(), "rules loaded");
        Ok(Self::new(rules))
    }

    /// Load the configured rule directory and build the configured engine.
    pub fn from_config(config: &RulesConfig) -> Result<(Self, PhoneticEngine), EncoderError> {
        let dir = config.rules_dir.as_ref().ok_or(EncoderError::NoRulesDir)?;
        let encoder = Self::load(dir)?;
        let engine = encoder.engine(config.base())?;
        Ok((encoder, engine))
    }

    /// An engine for `config` over the shared rules.
    pub fn engine(&self, config: &Config) -> Result<PhoneticEngine, EncoderError> {
        Ok(PhoneticEngine::from_config(Arc::clone(&self.rules), config)?)
    }

    /// Encode one name with a throwaway engine for `config`.
    pub fn encode(&self, config: &Config, name: &str) -> Result<String, EncoderError> {
        Ok(self.engine(config)?.encode(name))
    }

    pub fn rules(&self) -> &Arc<RuleSet> {
        &self.rules
    }
}
