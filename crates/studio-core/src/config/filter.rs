//! Read-only projection of the schema by category and search text.

use std::collections::HashSet;

use serde::Serialize;

use super::schema::ConfigMeta;
use crate::types::ConfigEntry;

/// Schema entries of one category that pass the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaGroup<'a> {
    pub category: &'a str,
    pub items: Vec<&'a ConfigMeta>,
}

/// True when `meta` passes the (already lowercased, trimmed) search term.
fn matches_term(meta: &ConfigMeta, term: &str) -> bool {
    term.is_empty()
        || meta.key.to_lowercase().contains(term)
        || meta.label.to_lowercase().contains(term)
}

/// Group schema entries by category, keeping those whose key or label
/// contains `filter` (case-insensitive).
///
/// Categories come out in first-appearance order of the schema, so every
/// schema entry belongs to exactly one group. A category whose entries are
/// all filtered out is still present with no items.
pub fn group_schema<'a>(schema: &'a [ConfigMeta], filter: &str) -> Vec<SchemaGroup<'a>> {
    let term = filter.trim().to_lowercase();
    let mut groups: Vec<SchemaGroup<'a>> = Vec::new();

    for meta in schema {
        let index = match groups.iter().position(|g| g.category == meta.category) {
            Some(index) => index,
            None => {
                groups.push(SchemaGroup {
                    category: meta.category,
                    items: Vec::new(),
                });
                groups.len() - 1
            }
        };
        if matches_term(meta, &term) {
            groups[index].items.push(meta);
        }
    }

    groups
}

/// Keys that have entries but no schema description, in first-seen order.
pub fn ungrouped_keys<'e>(schema: &[ConfigMeta], entries: &'e [ConfigEntry]) -> Vec<&'e str> {
    let known: HashSet<&str> = schema.iter().map(|meta| meta.key).collect();
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|entry| entry.key.as_str())
        .filter(|key| !known.contains(key) && seen.insert(*key))
        .collect()
}
