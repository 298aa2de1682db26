//! Formatting options
//!
//! Loaded from an optional TOML file with kebab-case keys; every key may be
//! omitted.
//!
//! ```toml
//! print-width = 100
//! tab-width = 4
//! max-nesting-depth = 128
//! ```

use crate::parser::parse::{DEFAULT_MAX_DEPTH, MAX_NESTING_DEPTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FormatOptions {
    /// Column a line should not run past.
    pub print_width: usize,
    /// Spaces per indentation level.
    pub tab_width: usize,
    /// Deepest expression/statement/declarator nesting the parser accepts,
    /// at most [`MAX_NESTING_DEPTH`].
    pub max_nesting_depth: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: 80,
            tab_width: 2,
            max_nesting_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl FormatOptions {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(source)?;
        options.validate()?;
        Ok(options)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.print_width == 0 {
            return Err(ConfigError::Invalid("print-width must be at least 1".into()));
        }
        if self.tab_width == 0 {
            return Err(ConfigError::Invalid("tab-width must be at least 1".into()));
        }
        if self.max_nesting_depth == 0 || self.max_nesting_depth > MAX_NESTING_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "max-nesting-depth must be between 1 and {}",
                MAX_NESTING_DEPTH
            )));
        }
        Ok(())
    }
}
