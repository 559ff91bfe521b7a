//! Application settings stored in `studio.toml`.
//!
//! ```toml
//! locale = "zh"
//! state_dir = "/home/me/.local/state/gitconfig-studio"
//!
//! [paths]
//! global = "/home/me/.config/git/config"
//! system = "/usr/local/etc/gitconfig"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::paths::TierPaths;
use crate::types::Locale;

pub const SETTINGS_FILE_NAME: &str = "studio.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudioSettings {
    /// Locale used when no persisted UI state exists yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    /// Where UI state is persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
    #[serde(default)]
    pub paths: PathOverrides,
}

/// Replacement files for the global and system tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<PathBuf>,
}

impl StudioSettings {
    /// Load settings from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))
    }

    /// Tier files with overrides applied over the standard locations.
    pub fn tier_paths(&self, home_dir: &Path) -> TierPaths {
        let mut paths = TierPaths::from_home(home_dir);
        if let Some(global) = &self.paths.global {
            paths.global = global.clone();
        }
        if let Some(system) = &self.paths.system {
            paths.system = system.clone();
        }
        paths
    }
}

/// Attach the offending line to TOML errors that carry a span.
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();
    let Some(span) = error.span() else {
        return anyhow::anyhow!("TOML parsing error: {}", message);
    };

    let before = content.get(..span.start).unwrap_or(content);
    let line_num = before.matches('\n').count() + 1;
    let line = content.lines().nth(line_num - 1).unwrap_or_default();
    anyhow::anyhow!(
        "TOML parsing error at line {}:\n>>> {:4} | {}\n\nError: {}",
        line_num,
        line_num,
        line,
        message
    )
}
