//! Config path resolution helpers.

use std::path::{Path, PathBuf};

use crate::types::Scope;

/// Default machine-wide git configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/gitconfig";

/// On-disk files backing each storage tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierPaths {
    pub global: PathBuf,
    pub system: PathBuf,
}

impl TierPaths {
    /// Standard locations relative to a home directory.
    pub fn from_home(home_dir: &Path) -> Self {
        Self {
            global: home_dir.join(".gitconfig"),
            system: PathBuf::from(SYSTEM_CONFIG_PATH),
        }
    }

    /// File for `scope`; `local` needs the repository's git directory.
    ///
    /// Returns `None` for `merged`, and for `local` without a git dir.
    pub fn path_for_scope(&self, scope: Scope, git_dir: Option<&Path>) -> Option<PathBuf> {
        match scope {
            Scope::Local => git_dir.map(|dir| dir.join("config")),
            Scope::Global => Some(self.global.clone()),
            Scope::System => Some(self.system.clone()),
            Scope::Merged => None,
        }
    }
}
