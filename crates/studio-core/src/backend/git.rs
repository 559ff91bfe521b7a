//! Git config files through libgit2.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Config, Repository};
use tracing::debug;

use super::{BackendError, ConfigBackend};
use crate::config::{CONFIG_SCHEMA, ConfigMeta, TierPaths, canonical_key};
use crate::types::{ConfigEntry, Scope, Target, WireEntry};

/// Reads and writes the git config file behind each tier.
///
/// libgit2 calls run on tokio's blocking pool. Loaded names are reported in
/// the schema's spelling when git considers them the same key.
#[derive(Debug, Clone)]
pub struct GitConfigBackend {
    paths: TierPaths,
    schema: &'static [ConfigMeta],
}

impl GitConfigBackend {
    pub fn new(paths: TierPaths) -> Self {
        Self::with_schema(paths, CONFIG_SCHEMA)
    }

    pub fn with_schema(paths: TierPaths, schema: &'static [ConfigMeta]) -> Self {
        Self { paths, schema }
    }

    pub fn paths(&self) -> &TierPaths {
        &self.paths
    }

    /// Config file of `scope` for `target`.
    pub fn config_path(&self, scope: Scope, target: &Target) -> Result<PathBuf, BackendError> {
        match scope {
            Scope::Local => {
                let repo_root = target
                    .repository()
                    .ok_or(BackendError::NoRepository(scope))?;
                let repo = Repository::open(repo_root)?;
                self.paths
                    .path_for_scope(scope, Some(repo.path()))
                    .ok_or(BackendError::NoRepository(scope))
            }
            Scope::Global | Scope::System => self
                .paths
                .path_for_scope(scope, None)
                .ok_or(BackendError::NotATier(scope)),
            Scope::Merged => Err(BackendError::NotATier(scope)),
        }
    }
}

impl ConfigBackend for GitConfigBackend {
    async fn load_entries(
        &self,
        scope: Scope,
        target: &Target,
    ) -> Result<Vec<WireEntry>, BackendError> {
        let this = self.clone();
        let target = target.clone();
        run_blocking(move || {
            let path = this.config_path(scope, &target)?;
            read_config_file(&path, scope, this.schema)
        })
        .await
    }

    async fn save_entries(
        &self,
        scope: Scope,
        entries: &[ConfigEntry],
        target: &Target,
    ) -> Result<(), BackendError> {
        let this = self.clone();
        let target = target.clone();
        let entries = entries.to_vec();
        run_blocking(move || {
            let path = this.config_path(scope, &target)?;
            write_config_file(&path, &entries)
        })
        .await
    }

    async fn is_valid_repository(&self, path: &Path) -> Result<bool, BackendError> {
        let path = path.to_path_buf();
        run_blocking(move || Ok(Repository::open(&path).is_ok())).await
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T, BackendError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, BackendError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| BackendError::Unavailable(e.to_string()))?
}

/// Every name/value pair of one config file. A missing file has none.
fn read_config_file(
    path: &Path,
    scope: Scope,
    schema: &[ConfigMeta],
) -> Result<Vec<WireEntry>, BackendError> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file missing, treating as empty");
        return Ok(Vec::new());
    }
    let config = Config::open(path)?;
    let mut entries = Vec::new();
    let mut iter = config.entries(None)?;
    while let Some(entry) = iter.next() {
        let entry = entry?;
        if let (Some(name), Some(value)) = (entry.name(), entry.value()) {
            entries.push(WireEntry::new(canonical_key(schema, name), value, scope.as_str()));
        }
    }
    Ok(entries)
}

/// Set each entry in the file, creating it first when needed.
///
/// Keys not mentioned in `entries` are left as they are.
fn write_config_file(path: &Path, entries: &[ConfigEntry]) -> Result<(), BackendError> {
    ensure_file(path)?;
    let mut config = Config::open(path)?;
    for entry in entries {
        config.set_str(&entry.key, &entry.value)?;
    }
    debug!(path = %path.display(), count = entries.len(), "Config file written");
    Ok(())
}

fn ensure_file(path: &Path) -> Result<(), BackendError> {
    let io_err = |source| BackendError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    if !path.exists() {
        fs::File::create(path).map_err(io_err)?;
    }
    Ok(())
}
