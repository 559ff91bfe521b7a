//! Side-by-side tier values for spotting conflicting settings.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::ConfigMeta;
use crate::types::{ConfigEntry, Scope};

/// Values of one key across the three storage tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDiff {
    pub key: String,
    pub local: Option<String>,
    pub global: Option<String>,
    pub system: Option<String>,
}

impl KeyDiff {
    fn collect(key: &str, entries: &[ConfigEntry]) -> Self {
        let value_in = |scope: Scope| {
            entries
                .iter()
                .find(|entry| entry.is(key, scope))
                .map(|entry| entry.value.clone())
        };
        Self {
            key: key.to_string(),
            local: value_in(Scope::Local),
            global: value_in(Scope::Global),
            system: value_in(Scope::System),
        }
    }

    /// More than one distinct non-empty value across tiers.
    pub fn has_conflict(&self) -> bool {
        let values: HashSet<&str> = [&self.local, &self.global, &self.system]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .collect();
        values.len() > 1
    }
}

/// Tier values for every schema key that has at least one non-empty value.
pub fn diff_summary(schema: &[ConfigMeta], entries: &[ConfigEntry]) -> Vec<KeyDiff> {
    schema
        .iter()
        .filter(|meta| {
            entries
                .iter()
                .any(|entry| entry.key == meta.key && !entry.value.is_empty())
        })
        .map(|meta| KeyDiff::collect(meta.key, entries))
        .collect()
}
