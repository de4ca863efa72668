use anyhow::{anyhow, Context, Result};
use bmpm_rules::{Encoder, NameType, PhoneticEngine, RuleType, RulesConfig};
use clap::Args;
use std::path::PathBuf;

/// Options shared by every command that builds an engine.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Directory holding the rule files
    #[arg(long, env = "BMPM_RULES_DIR")]
    pub rules_dir: Option<PathBuf>,

    /// TOML configuration file (flags override its values)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// generic, ashkenazi or sephardic (gen, ash, sep)
    #[arg(long)]
    pub name_type: Option<NameType>,

    /// approx or exact
    #[arg(long)]
    pub rule_type: Option<RuleType>,

    /// Encode each word separately and join the words with '-'
    #[arg(long)]
    pub no_concat: bool,

    /// Maximum alternatives kept at each step
    #[arg(long)]
    pub max_phonemes: Option<usize>,
}

impl EngineArgs {
    /// The configuration file (if any) with command-line overrides applied.
    pub fn resolve(&self) -> Result<RulesConfig> {
        let mut config = match &self.config {
            Some(path) => RulesConfig::load_toml(path)
                .map_err(|e| anyhow!("failed to load config {}: {}", path.display(), e))?,
            None => RulesConfig::default(),
        };

        if let Some(dir) = &self.rules_dir {
            config.rules_dir = Some(dir.clone());
        }
        let base = config.base_mut();
        if let Some(name_type) = self.name_type {
            base.name_type = name_type;
        }
        if let Some(rule_type) = self.rule_type {
            base.rule_type = rule_type;
        }
        if self.no_concat {
            base.concat = false;
        }
        if let Some(max) = self.max_phonemes {
            base.max_phonemes = max;
        }
        base.validate()?;
        Ok(config)
    }

    /// Load the rules and build the configured engine.
    pub fn build(&self) -> Result<(Encoder, PhoneticEngine)> {
        let config = self.resolve()?;
        let dir = config
            .rules_dir
            .as_ref()
            .context("no rules directory: pass --rules-dir, set BMPM_RULES_DIR or rules_dir in --config")?;
        let encoder = Encoder::load(dir)
            .with_context(|| format!("failed to load rules from {}", dir.display()))?;
        let engine = encoder
            .engine(config.base())
            .with_context(|| format!("rules in {} cannot serve this configuration", dir.display()))?;
        Ok((encoder, engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = EngineArgs {
            rules_dir: Some(PathBuf::from("/rules")),
            name_type: Some(NameType::Sephardic),
            no_concat: true,
            max_phonemes: Some(3),
            ..EngineArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.rules_dir, Some(PathBuf::from("/rules")));
        assert_eq!(config.base.name_type, NameType::Sephardic);
        assert_eq!(config.base.rule_type, RuleType::Approx);
        assert!(!config.base.concat);
        assert_eq!(config.base.max_phonemes, 3);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bmpm.toml");
        std::fs::write(&path, "rules_dir = \"rules\"\nrule_type = \"exact\"\nmax_phonemes = 8\n").unwrap();

        let args = EngineArgs {
            config: Some(path),
            max_phonemes: Some(2),
            ..EngineArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.rules_dir, Some(dir.path().join("rules")));
        assert_eq!(config.base.rule_type, RuleType::Exact);
        assert_eq!(config.base.max_phonemes, 2);
    }

    #[test]
    fn zero_cap_is_rejected() {
        let args = EngineArgs {
            max_phonemes: Some(0),
            ..EngineArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn missing_rules_dir_is_reported() {
        let err = EngineArgs::default().build().unwrap_err();
        assert!(err.to_string().contains("no rules directory"));
    }
}
