//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use crate::backend::GitConfigBackend;
use crate::config::settings::SETTINGS_FILE_NAME;
use crate::config::{StudioSettings, TierPaths};
use crate::session::Session;
use crate::store::StateFile;

/// Paths and settings a frontend needs, resolved once.
///
/// Frontends create this at startup and ask it for the backend, the state
/// file and a ready session.
#[derive(Debug, Clone)]
pub struct AppContext {
    home_dir: PathBuf,
    state_dir: PathBuf,
    settings_path: PathBuf,
    settings: StudioSettings,
}

impl AppContext {
    /// Create a context with explicit paths and settings.
    pub fn new(
        home_dir: PathBuf,
        state_dir: PathBuf,
        settings_path: PathBuf,
        settings: StudioSettings,
    ) -> Self {
        Self {
            home_dir,
            state_dir,
            settings_path,
            settings,
        }
    }

    /// Resolve standard locations and read `studio.toml`.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let settings_path = dirs::config_dir()
            .map(|dir| dir.join("gitconfig-studio"))
            .unwrap_or_else(|| home_dir.join(".config").join("gitconfig-studio"))
            .join(SETTINGS_FILE_NAME);
        let settings = StudioSettings::load(&settings_path)?;
        let state_dir = match &settings.state_dir {
            Some(dir) => dir.clone(),
            None => StateFile::default_state_dir()?,
        };

        Ok(Self::new(home_dir, state_dir, settings_path, settings))
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn settings(&self) -> &StudioSettings {
        &self.settings
    }

    pub fn tier_paths(&self) -> TierPaths {
        self.settings.tier_paths(&self.home_dir)
    }

    pub fn git_backend(&self) -> GitConfigBackend {
        GitConfigBackend::new(self.tier_paths())
    }

    pub fn state_file(&self) -> StateFile {
        StateFile::in_dir(&self.state_dir)
    }

    /// Session over the git backend with persisted UI state restored.
    ///
    /// The settings locale applies until a persisted one exists.
    pub fn session(&self) -> Session<GitConfigBackend> {
        let mut session = Session::new(self.git_backend());
        let state_file = self.state_file();
        let persisted_locale = state_file.path().exists();
        session.restore(state_file.load());
        if !persisted_locale && let Some(locale) = self.settings.locale {
            session.set_locale(locale);
        }
        session
    }
}
