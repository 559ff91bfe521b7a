//! Scope resolution: which tier's value wins for a key, and what it shadows.
//!
//! Precedence is `local > global > system`. Every function here is pure and
//! leaves its input untouched, so callers may resolve on every render.

pub mod diff;

use std::collections::HashSet;

use tracing::warn;

use crate::types::{ConfigEntry, Scope};

pub use diff::{KeyDiff, diff_summary};

/// Compute the effective entry for `key`.
///
/// Matches are ordered by precedence rank with a stable sort, so duplicate
/// key+scope pairs resolve to the one that appears first in `entries`.
///
/// The winner is annotated with the *lowest-precedence* tier that also
/// holds a value: with `local`, `global` and `system` all present the local
/// value wins and reports `overridden_by = system`, meaning it shadows
/// configuration all the way down to that tier. A lone match carries no
/// annotation.
///
/// Entries whose scope has no precedence rank (`merged`) are left out of the
/// ranking.
pub fn resolve_effective(entries: &[ConfigEntry], key: &str) -> Option<ConfigEntry> {
    let mut ranked: Vec<(usize, &ConfigEntry)> = Vec::new();
    for entry in entries.iter().filter(|entry| entry.key == key) {
        match entry.scope.rank() {
            Some(rank) => ranked.push((rank, entry)),
            None => warn!(
                key = %entry.key,
                scope = %entry.scope,
                "Entry without a storage tier left out of resolution"
            ),
        }
    }
    ranked.sort_by_key(|(rank, _)| *rank);

    let (_, primary) = ranked.first()?;
    let competitors = &ranked[1..];
    let overridden_by = Scope::TIERS
        .into_iter()
        .rev()
        .find(|tier| competitors.iter().any(|(_, entry)| entry.scope == *tier));

    Some(ConfigEntry {
        overridden_by,
        ..(*primary).clone()
    })
}

/// One resolved entry per distinct key, in first-seen order.
pub fn merged_view(entries: &[ConfigEntry]) -> Vec<ConfigEntry> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert(entry.key.as_str()))
        .filter_map(|entry| resolve_effective(entries, &entry.key))
        .collect()
}

/// Every entry stored for `key`, highest precedence first.
pub fn entries_for_key<'a>(entries: &'a [ConfigEntry], key: &str) -> Vec<&'a ConfigEntry> {
    let mut matches: Vec<&ConfigEntry> = entries.iter().filter(|e| e.key == key).collect();
    matches.sort_by_key(|entry| entry.scope.rank().unwrap_or(usize::MAX));
    matches
}
