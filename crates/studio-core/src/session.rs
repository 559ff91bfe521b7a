//! Editing session: ties the entry store to a backend and a target.
//!
//! Loads are tagged with a generation number. Every change of target or
//! scope, and every wholesale replacement of the entries, bumps the
//! generation, so a response that arrives after a newer request (or after a
//! local replacement) is discarded instead of applied. Issuing, fetching
//! and applying are separate steps so an event loop can run the fetch
//! elsewhere; [`Session::reload`] does all three in a row.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::backend::{BackendError, ConfigBackend, placeholder_entries};
use crate::config::{CONFIG_SCHEMA, ConfigMeta, SchemaGroup, default_value_for, group_schema};
use crate::resolve::{merged_view, resolve_effective};
use crate::store::{EntryStore, PersistedState, StoreError, UpsertOutcome};
use crate::types::{ConfigEntry, Locale, Scope, Target, WireEntry};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no configuration target selected; open the global config or a repository first")]
    NoTarget,
    #[error("select a repository before viewing repository (local) configuration")]
    RepositoryRequired,
    #[error("not a valid git repository: {}", .0.display())]
    InvalidRepository(PathBuf),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to save {scope} configuration: {source}")]
    Save {
        scope: Scope,
        #[source]
        source: BackendError,
    },
}

/// A load issued for one target and scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    generation: u64,
    scope: Scope,
    target: Target,
}

impl LoadRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Fetch the records this request asks for.
    ///
    /// `merged` expands to every tier the target has, highest precedence
    /// first; any tier failing fails the whole fetch.
    pub async fn fetch<B: ConfigBackend>(&self, backend: &B) -> Result<Vec<WireEntry>, BackendError> {
        if self.scope.is_tier() {
            return backend.load_entries(self.scope, &self.target).await;
        }
        let mut records = Vec::new();
        for tier in self.target.tiers() {
            records.extend(backend.load_entries(*tier, &self.target).await?);
        }
        Ok(records)
    }
}

/// Where the current entries came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySource {
    /// Nothing loaded yet.
    Empty,
    Backend,
    /// Backend failed; schema-derived stand-ins.
    Placeholder,
    /// Restored from persisted UI state.
    Restored,
    /// Replaced by the caller.
    Replaced,
}

/// Result of applying a load response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { entries: usize, flagged: usize },
    /// Backend failed; placeholder entries applied.
    Fallback { entries: usize },
    /// A newer request or change superseded this one.
    Stale,
}

/// Result of the add-configuration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    Overwritten,
    /// The pair existed and the user kept the previous value.
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub scope: Scope,
    pub saved: usize,
}

pub struct Session<B> {
    backend: B,
    schema: &'static [ConfigMeta],
    store: EntryStore,
    target: Option<Target>,
    locale: Locale,
    generation: u64,
    source: EntrySource,
}

impl<B: ConfigBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self::with_schema(backend, CONFIG_SCHEMA)
    }

    pub fn with_schema(backend: B, schema: &'static [ConfigMeta]) -> Self {
        Self {
            backend,
            schema,
            store: EntryStore::new(),
            target: None,
            locale: Locale::default(),
            generation: 0,
            source: EntrySource::Empty,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn schema(&self) -> &'static [ConfigMeta] {
        self.schema
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn scope(&self) -> Scope {
        self.store.scope()
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        self.store.entries()
    }

    pub fn source(&self) -> EntrySource {
        self.source
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    fn invalidate_pending(&mut self) {
        self.generation += 1;
    }

    /// Point the session at user-wide configuration, viewing `global`.
    pub fn open_global(&mut self) {
        self.target = Some(Target::Global);
        self.store.set_scope(Scope::Global);
        self.invalidate_pending();
        info!("Opened global configuration");
    }

    /// Point the session at a repository, viewing `local`.
    ///
    /// The path is validated first; a rejected or unverifiable path leaves
    /// target and scope untouched.
    pub async fn open_repository(&mut self, path: impl Into<PathBuf>) -> Result<(), SessionError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(SessionError::InvalidRepository(path));
        }
        let valid = match self.backend.is_valid_repository(&path).await {
            Ok(valid) => valid,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Repository check failed");
                false
            }
        };
        if !valid {
            return Err(SessionError::InvalidRepository(path));
        }

        info!(path = %path.display(), "Opened repository configuration");
        self.target = Some(Target::Repository(path));
        self.store.set_scope(Scope::Local);
        self.invalidate_pending();
        Ok(())
    }

    /// Drop the target and go back to the target picker.
    pub fn close_target(&mut self) {
        self.target = None;
        self.store.set_scope(Scope::Global);
        self.invalidate_pending();
    }

    /// Switch the viewed scope. `local` needs a repository target.
    pub fn set_scope(&mut self, scope: Scope) -> Result<(), SessionError> {
        let has_repository = self
            .target
            .as_ref()
            .is_some_and(|target| target.repository().is_some());
        if scope == Scope::Local && !has_repository {
            return Err(SessionError::RepositoryRequired);
        }
        if scope != self.store.scope() {
            self.store.set_scope(scope);
            self.invalidate_pending();
        }
        Ok(())
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.store.set_search(text);
    }

    /// Issue a load for the current target and scope.
    pub fn request_load(&mut self) -> Result<LoadRequest, SessionError> {
        let target = self.target.clone().ok_or(SessionError::NoTarget)?;
        self.invalidate_pending();
        Ok(LoadRequest {
            generation: self.generation,
            scope: self.store.scope(),
            target,
        })
    }

    fn is_current(&self, request: &LoadRequest) -> bool {
        request.generation == self.generation
            && request.scope == self.store.scope()
            && self.target.as_ref() == Some(&request.target)
    }

    /// Apply a fetched response if `request` is still the latest one.
    pub fn apply_load(
        &mut self,
        request: &LoadRequest,
        result: Result<Vec<WireEntry>, BackendError>,
    ) -> LoadOutcome {
        if !self.is_current(request) {
            debug!(
                generation = request.generation,
                current = self.generation,
                scope = %request.scope,
                "Discarding stale load response"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(records) => {
                self.store.set_wire_entries(records);
                self.source = EntrySource::Backend;
                let outcome = LoadOutcome::Applied {
                    entries: self.store.entries().len(),
                    flagged: self.store.flagged().len(),
                };
                info!(scope = %request.scope, target = %request.target, ?outcome, "Entries loaded");
                outcome
            }
            Err(err) => {
                warn!(
                    scope = %request.scope,
                    target = %request.target,
                    error = %err,
                    "Backend unavailable, using placeholder entries"
                );
                let entries = placeholder_entries(self.schema, request.scope, &request.target);
                let count = entries.len();
                self.store.set_entries(entries);
                self.source = EntrySource::Placeholder;
                LoadOutcome::Fallback { entries: count }
            }
        }
    }

    /// Issue, fetch and apply a load in one go.
    pub async fn reload(&mut self) -> Result<LoadOutcome, SessionError> {
        let request = self.request_load()?;
        let result = request.fetch(&self.backend).await;
        Ok(self.apply_load(&request, result))
    }

    /// Replace the entries wholesale; pending loads become stale.
    pub fn replace_entries(&mut self, entries: Vec<ConfigEntry>) {
        self.store.set_entries(entries);
        self.source = EntrySource::Replaced;
        self.invalidate_pending();
    }

    /// Edit an existing key+scope pair. Returns `false` when it does not exist.
    pub fn update_value(&mut self, key: &str, scope: Scope, value: impl Into<String>) -> bool {
        self.store.update_value(key, scope, value)
    }

    /// Add a key to the active scope.
    ///
    /// The key is trimmed; an empty `value` takes the schema default. When
    /// the pair already exists `confirm` decides whether to overwrite it.
    pub fn add_entry(
        &mut self,
        key: &str,
        value: Option<&str>,
        confirm: impl FnOnce(&ConfigEntry) -> bool,
    ) -> Result<AddOutcome, SessionError> {
        let key = key.trim();
        let scope = self.store.scope();
        if key.is_empty() {
            return Err(StoreError::EmptyKey.into());
        }
        if !scope.is_tier() {
            return Err(StoreError::MergedScope.into());
        }

        let value = match value {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => default_value_for(self.schema, key).to_string(),
        };
        if let Some(existing) = self.store.get(key, scope)
            && !confirm(existing)
        {
            return Ok(AddOutcome::Declined);
        }

        Ok(match self.store.upsert(key, scope, value)? {
            UpsertOutcome::Inserted => AddOutcome::Inserted,
            UpsertOutcome::Overwritten => AddOutcome::Overwritten,
        })
    }

    /// Send the active scope's entries to the backend.
    ///
    /// Nothing is rolled back on failure: the entries stay as edited. While
    /// `merged` is active there is nothing to send.
    pub async fn save(&self) -> Result<SaveReport, SessionError> {
        let target = self.target.as_ref().ok_or(SessionError::NoTarget)?;
        let scope = self.store.scope();
        if !scope.is_tier() {
            debug!("Merged view has no entries of its own to save");
            return Ok(SaveReport { scope, saved: 0 });
        }

        let entries = self.store.entries_for_save();
        match self.backend.save_entries(scope, &entries, target).await {
            Ok(()) => {
                info!(%scope, %target, count = entries.len(), "Entries saved");
                Ok(SaveReport {
                    scope,
                    saved: entries.len(),
                })
            }
            Err(source) => {
                warn!(%scope, %target, error = %source, "Save failed, keeping edits in memory");
                Err(SessionError::Save { scope, source })
            }
        }
    }

    /// Effective entry for `key` across the loaded tiers.
    pub fn effective(&self, key: &str) -> Option<ConfigEntry> {
        resolve_effective(self.store.entries(), key)
    }

    pub fn merged(&self) -> Vec<ConfigEntry> {
        merged_view(self.store.entries())
    }

    /// Schema grouped by category under the current search text.
    pub fn groups(&self) -> Vec<SchemaGroup<'static>> {
        group_schema(self.schema, self.store.search())
    }

    /// Snapshot for persisting between runs.
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            scope: self.store.scope(),
            target: self.target.clone(),
            entries: self.store.entries().to_vec(),
            locale: self.locale,
            ..PersistedState::default()
        }
    }

    /// Bring back persisted UI state. Pending loads become stale.
    ///
    /// A persisted `local` scope without a repository target falls back to
    /// `global`.
    pub fn restore(&mut self, state: PersistedState) {
        let has_repository = state
            .target
            .as_ref()
            .is_some_and(|target| target.repository().is_some());
        let scope = if state.scope == Scope::Local && !has_repository {
            Scope::Global
        } else {
            state.scope
        };

        self.target = state.target;
        self.locale = state.locale;
        self.store.set_scope(scope);
        self.store.set_entries(state.entries);
        self.source = EntrySource::Restored;
        self.invalidate_pending();
    }
}
