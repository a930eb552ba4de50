//! Exploration configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::PremiseFilter;
use crate::error::ConfigError;
use crate::implication::AttributeSet;

/// Tunables for an exploration session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    /// Upper bound on expert interactions in `explore()`. `None` for unbounded.
    pub max_steps: Option<usize>,
    /// Premises with more attributes than this are not surfaced.
    pub max_premise_size: Option<usize>,
    /// Whether exploration steps ask the context to complete unknown entries.
    pub complete_after_update: bool,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            max_premise_size: None,
            complete_after_update: true,
        }
    }
}

impl ExplorationConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// The premise filter described by this config.
    pub fn premise_filter(&self) -> PremiseFilter {
        match self.max_premise_size {
            Some(max) => Box::new(move |premise: &AttributeSet| premise.len() <= max),
            None => Box::new(|_: &AttributeSet| true),
        }
    }
}
