//! Errors raised while reading rule files.
use std::path::PathBuf;

use bmpm_core::{ConfigError, RuleError};

/// Raised when a rule directory cannot be turned into a `RuleSet`.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{file}:{line}: {message}")]
    Syntax {
        file: String,
        line: usize,
        message: String,
    },
    #[error("{file}:{line}: {source}")]
    InvalidRule {
        file: String,
        line: usize,
        #[source]
        source: RuleError,
    },
    #[error("include cycle: {chain}")]
    IncludeCycle { chain: String },
    #[error("missing rule file {path}")]
    MissingFile { path: PathBuf },
    #[error("no rule files found in {dir}")]
    Empty { dir: PathBuf },
}

impl LoadError {
    pub(crate) fn syntax(file: &str, line: usize, message: impl Into<String>) -> Self {
        LoadError::Syntax {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}

/// Raised by [`crate::Encoder`].
#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no rules directory configured")]
    NoRulesDir,
}
