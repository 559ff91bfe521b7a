//! Static table of known git configuration keys.
//!
//! The table is read-only input: it drives grouping, defaults for the add
//! flow and key suggestions. Entries for keys missing from it are still
//! valid and are shown ungrouped.

use serde::Serialize;

/// Semantic type of a key's value. Entries themselves only carry strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Boolean,
    Enum,
    Path,
}

/// Description of one known key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMeta {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub category: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "no_values")]
    pub enum_values: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<&'static str>,
}

impl ConfigMeta {
    const fn new(
        key: &'static str,
        label: &'static str,
        value_type: ValueType,
        category: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            label,
            value_type,
            category,
            description,
            enum_values: &[],
            default_value: None,
        }
    }

    const fn with_enum(mut self, values: &'static [&'static str]) -> Self {
        self.enum_values = values;
        self
    }

    const fn with_default(mut self, value: &'static str) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Value used when a user adds this key without typing one.
    ///
    /// Schema default first, then `"false"` for booleans, then the first
    /// allowed enum value, else empty.
    pub fn fallback_value(&self) -> &'static str {
        if let Some(value) = self.default_value {
            return value;
        }
        match self.value_type {
            ValueType::Boolean => "false",
            ValueType::Enum => self.enum_values.first().copied().unwrap_or(""),
            ValueType::String | ValueType::Path => "",
        }
    }
}

fn no_values(values: &&'static [&'static str]) -> bool {
    values.is_empty()
}

/// Category display order.
pub const CATEGORIES: &[&str] = &["User", "Core", "Alias", "Remote", "Workflow", "Security"];

pub static CONFIG_SCHEMA: &[ConfigMeta] = &[
    ConfigMeta::new(
        "user.name",
        "User Name",
        ValueType::String,
        "User",
        "Name used to identify the author for commits.",
    ),
    ConfigMeta::new(
        "user.email",
        "User Email",
        ValueType::String,
        "User",
        "Email used to identify the author for commits.",
    ),
    ConfigMeta::new(
        "core.autocrlf",
        "Auto CRLF",
        ValueType::Enum,
        "Core",
        "Control line ending conversion on checkout/commit.",
    )
    .with_enum(&["true", "false", "input"])
    .with_default("input"),
    ConfigMeta::new(
        "core.filemode",
        "File Mode",
        ValueType::Boolean,
        "Core",
        "Check file permission bit changes.",
    )
    .with_default("true"),
    ConfigMeta::new(
        "core.editor",
        "Editor",
        ValueType::Path,
        "Core",
        "Default text editor path.",
    ),
    ConfigMeta::new(
        "core.ignorecase",
        "Ignore Case",
        ValueType::Boolean,
        "Core",
        "Ignore case in filenames.",
    )
    .with_default("true"),
    ConfigMeta::new(
        "init.defaultBranch",
        "Default Branch",
        ValueType::String,
        "Core",
        "Default branch name when initializing repositories.",
    )
    .with_default("main"),
    ConfigMeta::new(
        "color.ui",
        "Color UI",
        ValueType::Enum,
        "Core",
        "Enable colored output in the command line.",
    )
    .with_enum(&["auto", "true", "false"])
    .with_default("auto"),
    ConfigMeta::new(
        "alias.st",
        "Alias: st",
        ValueType::String,
        "Alias",
        "Shortcut for git status.",
    ),
    ConfigMeta::new(
        "alias.ci",
        "Alias: ci",
        ValueType::String,
        "Alias",
        "Shortcut for git commit.",
    ),
    ConfigMeta::new(
        "remote.origin.url",
        "Remote origin URL",
        ValueType::String,
        "Remote",
        "Fetch URL for origin.",
    ),
    ConfigMeta::new(
        "remote.origin.pushurl",
        "Remote origin Push URL",
        ValueType::String,
        "Remote",
        "Push URL for origin.",
    ),
    ConfigMeta::new(
        "fetch.prune",
        "Fetch Prune",
        ValueType::Boolean,
        "Remote",
        "Auto prune removed remote branches when fetching.",
    )
    .with_default("false"),
    ConfigMeta::new(
        "push.autoSetupRemote",
        "Auto Setup Remote",
        ValueType::Boolean,
        "Remote",
        "Auto create upstream tracking on first push.",
    )
    .with_default("true"),
    ConfigMeta::new(
        "pull.rebase",
        "Pull Rebase",
        ValueType::Enum,
        "Workflow",
        "Default strategy for git pull.",
    )
    .with_enum(&["false", "true", "merges"])
    .with_default("false"),
    ConfigMeta::new(
        "merge.ff",
        "Merge Fast-Forward",
        ValueType::Enum,
        "Workflow",
        "Allow fast-forward merges.",
    )
    .with_enum(&["true", "false", "only"])
    .with_default("true"),
    ConfigMeta::new(
        "commit.gpgsign",
        "Commit GPG Sign",
        ValueType::Boolean,
        "Security",
        "Sign commits with GPG by default.",
    )
    .with_default("false"),
    ConfigMeta::new(
        "gpg.format",
        "GPG Format",
        ValueType::Enum,
        "Security",
        "Format used for signatures.",
    )
    .with_enum(&["openpgp", "ssh"])
    .with_default("openpgp"),
];

/// Maximum number of key suggestions offered while typing a new key.
pub const MAX_SUGGESTIONS: usize = 8;

pub fn find_meta<'a>(schema: &'a [ConfigMeta], key: &str) -> Option<&'a ConfigMeta> {
    schema.iter().find(|meta| meta.key == key)
}

/// Whether two config names denote the same git key.
///
/// Section and variable names compare case-insensitively; the subsection
/// (everything between the first and the last dot) compares exactly.
pub fn same_git_key(a: &str, b: &str) -> bool {
    match (split_git_key(a), split_git_key(b)) {
        (Some((section_a, sub_a, var_a)), Some((section_b, sub_b, var_b))) => {
            section_a.eq_ignore_ascii_case(section_b)
                && sub_a == sub_b
                && var_a.eq_ignore_ascii_case(var_b)
        }
        _ => a == b,
    }
}

fn split_git_key(key: &str) -> Option<(&str, Option<&str>, &str)> {
    let (section, rest) = key.split_once('.')?;
    Some(match rest.rsplit_once('.') {
        Some((subsection, variable)) => (section, Some(subsection), variable),
        None => (section, None, rest),
    })
}

/// Schema spelling of `name` when git would treat them as the same key.
///
/// libgit2 hands names back lowercased (`init.defaultbranch`); unknown keys
/// pass through unchanged.
pub fn canonical_key<'a>(schema: &'a [ConfigMeta], name: &'a str) -> &'a str {
    schema
        .iter()
        .find(|meta| same_git_key(meta.key, name))
        .map_or(name, |meta| meta.key)
}

/// Default value for a key about to be added; empty for unknown keys.
pub fn default_value_for(schema: &[ConfigMeta], key: &str) -> &'static str {
    find_meta(schema, key)
        .map(ConfigMeta::fallback_value)
        .unwrap_or("")
}

/// Known keys containing the typed fragment, in schema order.
pub fn suggest_keys<'a>(schema: &'a [ConfigMeta], partial: &str) -> Vec<&'a ConfigMeta> {
    let partial = partial.trim();
    schema
        .iter()
        .filter(|meta| meta.key.contains(partial))
        .take(MAX_SUGGESTIONS)
        .collect()
}
