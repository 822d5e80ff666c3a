//! TOML settings: engine tuning plus an optional lexicon override.

use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{Context, Result};
use iskra_core::{EngineConfig, Lexicon, StateEngine};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "ISKRA_CONFIG";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineConfig,
    /// Replaces the built-in lexicon when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<Lexicon>,
}

/// Resolve the settings file.
/// Priority: explicit override > ISKRA_CONFIG env > none (built-in defaults).
pub fn resolve_config_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path.to_path_buf());
    }
    env::var(CONFIG_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

impl Settings {
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let Some(path) = resolve_config_path(override_path) else {
            tracing::debug!("no settings file, using built-in defaults");
            return Ok(Self::default());
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let settings = Self::from_toml(&content)
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        tracing::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content).context("failed to parse TOML")?;
        settings.engine.validate()?;
        if let Some(lexicon) = &settings.lexicon {
            lexicon.validate()?;
        }
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize settings")
    }

    pub fn lexicon(&self) -> &Lexicon {
        self.lexicon.as_ref().unwrap_or(Lexicon::builtin())
    }

    pub fn build_engine(&self) -> Result<StateEngine> {
        StateEngine::new(self.engine.clone(), self.lexicon().clone())
            .context("failed to build state engine")
    }
}
