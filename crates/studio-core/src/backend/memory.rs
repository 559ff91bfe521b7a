//! In-memory backend for demos and tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{BackendError, ConfigBackend};
use crate::types::{ConfigEntry, Scope, Target, WireEntry};

/// A call the backend received, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Load(Scope, Target),
    Save(Scope, Target, usize),
    Validate(PathBuf),
}

#[derive(Debug, Default)]
struct Inner {
    tiers: HashMap<(Target, Scope), Vec<WireEntry>>,
    repositories: HashSet<PathBuf>,
    fail_loads: bool,
    fail_saves: bool,
    fail_validation: bool,
    calls: Vec<BackendCall>,
}

/// Tier contents keyed by target and scope, with switchable failures.
///
/// Clones share state, so a test can keep a handle while a session owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicked test thread must not hide the data from the others.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed one tier with entries.
    pub fn insert(&self, target: &Target, entry: ConfigEntry) {
        let scope = entry.scope;
        self.insert_raw(target, scope, entry.into());
    }

    /// Seed a raw record under a tier, whatever its scope text says.
    pub fn insert_raw(&self, target: &Target, scope: Scope, record: WireEntry) {
        self.lock()
            .tiers
            .entry((target.clone(), scope))
            .or_default()
            .push(record);
    }

    pub fn add_repository(&self, path: impl Into<PathBuf>) {
        self.lock().repositories.insert(path.into());
    }

    pub fn fail_loads(&self, fail: bool) {
        self.lock().fail_loads = fail;
    }

    pub fn fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    pub fn fail_validation(&self, fail: bool) {
        self.lock().fail_validation = fail;
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Stored records of one tier.
    pub fn tier(&self, target: &Target, scope: Scope) -> Vec<WireEntry> {
        self.lock()
            .tiers
            .get(&(target.clone(), scope))
            .cloned()
            .unwrap_or_default()
    }
}

impl ConfigBackend for MemoryBackend {
    async fn load_entries(
        &self,
        scope: Scope,
        target: &Target,
    ) -> Result<Vec<WireEntry>, BackendError> {
        let mut inner = self.lock();
        inner.calls.push(BackendCall::Load(scope, target.clone()));
        if inner.fail_loads {
            return Err(BackendError::Unavailable("load disabled".to_string()));
        }
        if scope == Scope::Local && target.repository().is_none() {
            return Err(BackendError::NoRepository(scope));
        }
        Ok(inner
            .tiers
            .get(&(target.clone(), scope))
            .cloned()
            .unwrap_or_default())
    }

    /// Upsert semantics: keys missing from `entries` stay stored.
    async fn save_entries(
        &self,
        scope: Scope,
        entries: &[ConfigEntry],
        target: &Target,
    ) -> Result<(), BackendError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(BackendCall::Save(scope, target.clone(), entries.len()));
        if inner.fail_saves {
            return Err(BackendError::Unavailable("save disabled".to_string()));
        }
        if !scope.is_tier() {
            return Err(BackendError::NotATier(scope));
        }
        let tier = inner.tiers.entry((target.clone(), scope)).or_default();
        for entry in entries {
            match tier.iter_mut().find(|record| record.key == entry.key) {
                Some(record) => record.value = entry.value.clone(),
                None => tier.push(WireEntry::new(&entry.key, &entry.value, scope.as_str())),
            }
        }
        Ok(())
    }

    async fn is_valid_repository(&self, path: &Path) -> Result<bool, BackendError> {
        let mut inner = self.lock();
        inner.calls.push(BackendCall::Validate(path.to_path_buf()));
        if inner.fail_validation {
            return Err(BackendError::Unavailable("validation disabled".to_string()));
        }
        Ok(inner.repositories.contains(path))
    }
}
