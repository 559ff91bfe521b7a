//! Backend capability that loads, saves and validates configuration.
//!
//! The core only ever talks to a [`ConfigBackend`]. [`GitConfigBackend`]
//! reads and writes real git config files; [`MemoryBackend`] keeps
//! everything in memory and can be told to fail.

pub mod git;
pub mod memory;

use std::future::Future;
use std::path::Path;

use crate::config::ConfigMeta;
use crate::config::schema::ValueType;
use crate::types::{ConfigEntry, Scope, Target, WireEntry};

pub use git::GitConfigBackend;
pub use memory::{BackendCall, MemoryBackend};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("configuration backend unavailable: {0}")]
    Unavailable(String),
    #[error("scope '{0}' needs a repository target")]
    NoRepository(Scope),
    #[error("scope '{0}' is not a storage tier")]
    NotATier(Scope),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("git config error: {0}")]
    Git(#[from] git2::Error),
}

/// Load/save/validate operations against wherever configuration lives.
///
/// `scope` passed to `load_entries` and `save_entries` is always a storage
/// tier; callers expand `merged` themselves.
pub trait ConfigBackend: Send + Sync {
    /// Raw records of one tier for one target.
    fn load_entries(
        &self,
        scope: Scope,
        target: &Target,
    ) -> impl Future<Output = Result<Vec<WireEntry>, BackendError>> + Send;

    /// Persist entries already filtered to `scope`.
    fn save_entries(
        &self,
        scope: Scope,
        entries: &[ConfigEntry],
        target: &Target,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn is_valid_repository(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<bool, BackendError>> + Send;
}

/// Stand-in entries shown when the backend cannot be reached.
///
/// One entry per schema key: booleans get `"false"`, everything else a
/// `mock-<index>` marker. For a storage tier every entry lands in that tier;
/// for `merged` entries rotate over the tiers the target has.
pub fn placeholder_entries(schema: &[ConfigMeta], scope: Scope, target: &Target) -> Vec<ConfigEntry> {
    let tiers = target.tiers();
    schema
        .iter()
        .enumerate()
        .map(|(index, meta)| {
            let value = match meta.value_type {
                ValueType::Boolean => "false".to_string(),
                _ => format!("mock-{index}"),
            };
            let entry_scope = if scope.is_tier() {
                scope
            } else {
                tiers[index % tiers.len()]
            };
            ConfigEntry::new(meta.key, value, entry_scope)
        })
        .collect()
}
