//! Working set of configuration entries for the active target.
//!
//! The store owns the entries, the selected scope and the search text. It
//! keeps one invariant across every operation: at most one entry per
//! key+scope pair, and never an entry stored with the `merged` scope.

pub mod persisted;

use std::collections::HashSet;

use tracing::warn;

use crate::types::{ConfigEntry, Scope, WireEntry};

pub use persisted::{PersistedState, STATE_FILE_NAME, StateFile};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("configuration key must not be empty")]
    EmptyKey,
    #[error("entries cannot be stored with the merged scope; pick local, global or system")]
    MergedScope,
}

/// What `upsert` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Overwritten,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStore {
    scope: Scope,
    entries: Vec<ConfigEntry>,
    search: String,
    flagged: Vec<WireEntry>,
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore {
    /// Empty store viewing the merged scope.
    pub fn new() -> Self {
        Self {
            scope: Scope::Merged,
            entries: Vec::new(),
            search: String::new(),
            flagged: Vec::new(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Records that could not be stored (unknown or merged scope).
    ///
    /// They are kept for display and never take part in resolution.
    pub fn flagged(&self) -> &[WireEntry] {
        &self.flagged
    }

    pub fn get(&self, key: &str, scope: Scope) -> Option<&ConfigEntry> {
        self.entries.iter().find(|entry| entry.is(key, scope))
    }

    pub fn contains(&self, key: &str, scope: Scope) -> bool {
        self.get(key, scope).is_some()
    }

    /// Replace the working set wholesale.
    ///
    /// No schema validation happens here. Entries with the `merged` scope are
    /// moved to the flagged list; for a repeated key+scope pair the last one
    /// wins. Resolution annotations are cleared.
    pub fn set_entries(&mut self, entries: Vec<ConfigEntry>) {
        self.set_records(entries, Vec::new());
    }

    /// Replace the working set from backend records, flagging malformed ones.
    pub fn set_wire_entries(&mut self, records: Vec<WireEntry>) {
        let mut entries = Vec::with_capacity(records.len());
        let mut flagged = Vec::new();
        for record in records {
            match ConfigEntry::try_from(record.clone()) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    warn!(error = %err, "Malformed configuration entry flagged");
                    flagged.push(record);
                }
            }
        }
        self.set_records(entries, flagged);
    }

    fn set_records(&mut self, entries: Vec<ConfigEntry>, mut flagged: Vec<WireEntry>) {
        let mut kept: Vec<ConfigEntry> = Vec::with_capacity(entries.len());
        let mut seen: HashSet<(String, Scope)> = HashSet::new();

        // Walk backwards so the last occurrence of a pair is the one kept.
        for mut entry in entries.into_iter().rev() {
            if !entry.scope.is_tier() {
                warn!(key = %entry.key, "Entry stored with merged scope flagged");
                flagged.push(entry.into());
                continue;
            }
            if !seen.insert((entry.key.clone(), entry.scope)) {
                warn!(
                    key = %entry.key,
                    scope = %entry.scope,
                    "Duplicate key+scope pair dropped"
                );
                continue;
            }
            entry.overridden_by = None;
            kept.push(entry);
        }
        kept.reverse();

        self.entries = kept;
        self.flagged = flagged;
    }

    /// Replace the value of an existing key+scope pair.
    ///
    /// Returns `false` and leaves the store untouched when the pair does not
    /// exist; creating entries goes through [`EntryStore::upsert`].
    pub fn update_value(&mut self, key: &str, scope: Scope, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|entry| entry.is(key, scope)) {
            Some(entry) => {
                entry.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Overwrite the key+scope pair if present, otherwise append it.
    ///
    /// Overwrite intent must already be confirmed by the caller.
    pub fn upsert(
        &mut self,
        key: &str,
        scope: Scope,
        value: impl Into<String>,
    ) -> Result<UpsertOutcome, StoreError> {
        if key.trim().is_empty() {
            return Err(StoreError::EmptyKey);
        }
        if !scope.is_tier() {
            return Err(StoreError::MergedScope);
        }
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.is(key, scope)) {
            entry.value = value;
            return Ok(UpsertOutcome::Overwritten);
        }
        self.entries.push(ConfigEntry::new(key, value, scope));
        Ok(UpsertOutcome::Inserted)
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Entries belonging to the active scope, the only ones a save may send.
    pub fn entries_for_save(&self) -> Vec<ConfigEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.scope == self.scope)
            .cloned()
            .collect()
    }
}
