//! Configuration for loading rule files, extending the base `Config` from
//! core.
//!
//! This configuration includes:
//! - All engine options from `bmpm_core::Config` (flattened via serde)
//! - The directory holding the rule files
//!
//! # Example
//!
//! ```rust
//! use bmpm_rules::RulesConfig;
//!
//! let config = RulesConfig::from_toml_str(
//!     "rules_dir = \"rules\"\nname_type = \"ashkenazi\"\n",
//! ).unwrap();
//! assert_eq!(config.base().max_phonemes, 20);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Directory with `{nt}_languages.txt`, `{nt}_rules_{lang}.txt`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_dir: Option<PathBuf>,

    /// Engine options (name type, rule type, concat, max_phonemes)
    #[serde(flatten)]
    pub base: bmpm_core::Config,
}

impl RulesConfig {
    pub fn new<P: Into<PathBuf>>(rules_dir: P) -> Self {
        Self {
            rules_dir: Some(rules_dir.into()),
            base: bmpm_core::Config::default(),
        }
    }

    /// Load configuration from a TOML file. A relative `rules_dir` is
    /// resolved against the file's directory.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base.validate()?;
        if let (Some(dir), Some(parent)) = (config.rules_dir.as_ref(), path.parent()) {
            if dir.is_relative() {
                config.rules_dir = Some(parent.join(dir));
            }
        }
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Convert this config into the base config for use with `PhoneticEngine`
    pub fn into_base(self) -> bmpm_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &bmpm_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut bmpm_core::Config {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmpm_core::{NameType, RuleType};

    #[test]
    fn flattened_fields() {
        let config = RulesConfig::from_toml_str(
            "rules_dir = \"/data/bm\"\nrule_type = \"exact\"\nconcat = false\n",
        )
        .unwrap();
        assert_eq!(config.rules_dir.as_deref(), Some(Path::new("/data/bm")));
        assert_eq!(config.base.rule_type, RuleType::Exact);
        assert!(!config.base.concat);
        assert_eq!(config.base.name_type, NameType::Generic);
    }

    #[test]
    fn empty_toml_is_default() {
        let config = RulesConfig::from_toml_str("").unwrap();
        assert_eq!(config, RulesConfig::default());
        assert!(config.rules_dir.is_none());
    }

    #[test]
    fn relative_rules_dir_follows_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bmpm.toml");
        std::fs::write(&path, "rules_dir = \"rules\"\nmax_phonemes = 4\n").unwrap();

        let config = RulesConfig::load_toml(&path).unwrap();
        assert_eq!(config.rules_dir, Some(dir.path().join("rules")));
        assert_eq!(config.into_base().max_phonemes, 4);

        std::fs::write(&path, "max_phonemes = 0\n").unwrap();
        assert!(RulesConfig::load_toml(&path).is_err());
    }

    #[test]
    fn round_trip() {
        let mut config = RulesConfig::new("/data/bm");
        config.base_mut().name_type = NameType::Sephardic;
        let text = config.to_toml_string().unwrap();
        assert_eq!(RulesConfig::from_toml_str(&text).unwrap(), config);
    }
}
