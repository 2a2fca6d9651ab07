//! Configuration file parsing for .declgraph.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up by [`DeclgraphConfig::find_and_load`]
pub const CONFIG_FILE_NAME: &str = ".declgraph.toml";

/// Main configuration structure for .declgraph.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeclgraphConfig {
    #[serde(default)]
    pub parser: ParserConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParserConfig {
    /// Collect advisory diagnostics (unsupported kinds, malformed enum cases)
    #[serde(default)]
    pub verbose: bool,

    /// Module name stamped on every parsed file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl Default for DeclgraphConfig {
    fn default() -> Self {
        toml::from_str("").expect("empty TOML should parse to defaults")
    }
}

impl DeclgraphConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
    }

    /// Nearest `.declgraph.toml` at or above `start_dir`, defaults if none
    pub fn find_and_load(start_dir: &Path) -> Result<Self> {
        match start_dir
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
        {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading parser configuration");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
    }
}
