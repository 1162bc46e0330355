//! Engine configuration, loaded from the `[engine]` table of a TOML file.
//!
//! ```toml
//! [engine]
//! max_call_depth = 256
//! max_prototype_chain_depth = 1000
//! max_argument_count = 4096
//! strict_by_default = true
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read engine configuration: {0}")]
    Io(#[from] io::Error),
    #[error("cannot parse engine configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Limits and defaults of one engine instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Nesting limit of the execution-context stack.
    pub max_call_depth: usize,
    /// Bound on prototype chain walks.
    pub max_prototype_chain_depth: usize,
    /// Largest argument list a call may spread from an array-like.
    pub max_argument_count: usize,
    /// Strictness of code units that don't declare it themselves.
    pub strict_by_default: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_call_depth: 512,
            max_prototype_chain_depth: 10_000,
            max_argument_count: 65_535,
            strict_by_default: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    engine: EngineConfig,
}

impl EngineConfig {
    /// Parses configuration text. Missing keys (or a missing `[engine]` table) keep their defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.engine)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::parse(&content)?;
        log::debug!(
            "loaded engine config from {}: {:?}",
            path.as_ref().display(),
            config
        );
        Ok(config)
    }
}
