//! UI continuity state persisted between sessions.
//!
//! The file is not a source of truth: it only lets the editor come back
//! showing the last scope, target and entries. Reads are best-effort and
//! fall back to defaults; writes are atomic (tmp + rename).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{ConfigEntry, Locale, Scope, Target};

/// Fixed storage name of the state file.
pub const STATE_FILE_NAME: &str = "config-store.json";

const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default = "default_version")]
    pub version: u32,
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(default)]
    pub entries: Vec<ConfigEntry>,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            scope: Scope::Merged,
            target: None,
            entries: Vec::new(),
            locale: Locale::default(),
            saved_at: None,
        }
    }
}

/// Location of the persisted state file.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// State file inside `state_dir`.
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(STATE_FILE_NAME))
    }

    /// Default state directory.
    ///
    /// - Unix: `$XDG_STATE_HOME/gitconfig-studio` or `~/.local/state/gitconfig-studio`
    /// - Windows: `%LOCALAPPDATA%\gitconfig-studio`
    pub fn default_state_dir() -> anyhow::Result<PathBuf> {
        let base = if cfg!(unix) {
            dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .ok_or_else(|| anyhow::anyhow!("Cannot determine state directory"))?
        } else {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Cannot determine local app data directory"))?
        };
        Ok(base.join("gitconfig-studio"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state; absence or corruption yields defaults.
    pub fn load(&self) -> PersistedState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => PersistedState::default(),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %format!("{err:#}"),
                    "Ignoring unreadable UI state"
                );
                PersistedState::default()
            }
        }
    }

    fn try_load(&self) -> anyhow::Result<Option<PersistedState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;
        let state = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;
        Ok(Some(state))
    }

    /// Save state atomically, stamping `saved_at`.
    pub fn save(&self, state: &PersistedState) -> anyhow::Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("State file has no parent: {}", self.path.display()))?;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;

        let mut stamped = state.clone();
        stamped.saved_at = Some(Utc::now());
        let bytes = serde_json::to_vec_pretty(&stamped).context("Failed to serialize UI state")?;

        let tmp_path = dir.join(format!("{}.{}.tmp", STATE_FILE_NAME, std::process::id()));
        fs::write(&tmp_path, bytes)
            .with_context(|| format!("Failed to write tmp state: {}", tmp_path.display()))?;

        // Remove first on Windows for replace semantics.
        if cfg!(windows) && self.path.exists() {
            fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove existing state: {}", self.path.display())
            })?;
        }
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to rename tmp state: {}", tmp_path.display()))?;

        debug!(path = %self.path.display(), "UI state saved");
        Ok(())
    }
}
