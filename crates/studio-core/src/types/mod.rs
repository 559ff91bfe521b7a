//! Shared core types used across the store, resolution and backend layers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Configuration scope levels.
///
/// `Local`, `Global` and `System` are storage tiers, highest precedence
/// first. `Merged` is a display-only aggregate and never appears on a
/// stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Repository-specific (`<repo>/.git/config`).
    Local,
    /// User-wide (`~/.gitconfig`).
    Global,
    /// Machine-wide (`/etc/gitconfig`).
    System,
    /// Aggregate view across every tier.
    Merged,
}

impl Scope {
    /// Storage tiers in precedence order, highest first.
    pub const TIERS: [Scope; 3] = [Scope::Local, Scope::Global, Scope::System];

    /// Precedence rank of a storage tier (`local` = 0). `Merged` has none.
    pub fn rank(self) -> Option<usize> {
        match self {
            Scope::Local => Some(0),
            Scope::Global => Some(1),
            Scope::System => Some(2),
            Scope::Merged => None,
        }
    }

    pub fn is_tier(self) -> bool {
        self.rank().is_some()
    }

    pub fn label(self) -> &'static str {
        match self {
            Scope::Local => "Local",
            Scope::Global => "Global",
            Scope::System => "System",
            Scope::Merged => "Merged",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Global => "global",
            Scope::System => "system",
            Scope::Merged => "merged",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when scope text names no known scope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope '{0}' (expected local, global, system or merged)")]
pub struct UnknownScope(pub String);

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Scope::Local),
            "global" => Ok(Scope::Global),
            "system" => Ok(Scope::System),
            "merged" => Ok(Scope::Merged),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

/// One concrete value for one key in one storage tier.
///
/// `overridden_by` is only ever filled in by the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overridden_by: Option<Scope>,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, scope: Scope) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            scope,
            overridden_by: None,
        }
    }

    /// True when this entry has the given key+scope identity.
    pub fn is(&self, key: &str, scope: Scope) -> bool {
        self.key == key && self.scope == scope
    }
}

/// Raw record as a backend hands it over, scope still in text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEntry {
    pub key: String,
    pub value: String,
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overridden_by: Option<String>,
}

impl WireEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            scope: scope.into(),
            overridden_by: None,
        }
    }
}

impl From<ConfigEntry> for WireEntry {
    fn from(entry: ConfigEntry) -> Self {
        Self {
            key: entry.key,
            value: entry.value,
            scope: entry.scope.to_string(),
            overridden_by: entry.overridden_by.map(|scope| scope.to_string()),
        }
    }
}

/// Why a wire record could not become a stored entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedEntry {
    #[error("entry '{key}' has unknown scope '{scope}'")]
    UnknownScope { key: String, scope: String },
    #[error("entry '{key}' is stored with the merged scope")]
    MergedScope { key: String },
}

impl TryFrom<WireEntry> for ConfigEntry {
    type Error = MalformedEntry;

    fn try_from(wire: WireEntry) -> Result<Self, Self::Error> {
        let scope = wire
            .scope
            .parse::<Scope>()
            .map_err(|_| MalformedEntry::UnknownScope {
                key: wire.key.clone(),
                scope: wire.scope.clone(),
            })?;
        if !scope.is_tier() {
            return Err(MalformedEntry::MergedScope { key: wire.key });
        }
        // Storage never carries override annotations; drop whatever came in.
        Ok(ConfigEntry::new(wire.key, wire.value, scope))
    }
}

/// What the editor is pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "path")]
pub enum Target {
    /// User-wide settings, no repository selected.
    Global,
    /// A specific repository working directory.
    Repository(PathBuf),
}

impl Target {
    pub fn repository(&self) -> Option<&Path> {
        match self {
            Target::Global => None,
            Target::Repository(path) => Some(path),
        }
    }

    /// Storage tiers that exist for this target, highest precedence first.
    pub fn tiers(&self) -> &'static [Scope] {
        match self {
            Target::Global => &[Scope::Global, Scope::System],
            Target::Repository(_) => &Scope::TIERS,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Global => f.write_str("global"),
            Target::Repository(path) => write!(f, "repository {}", path.display()),
        }
    }
}

/// UI language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "zh" => Ok(Locale::Zh),
            other => anyhow::bail!("Unknown locale: {}. Use 'en' or 'zh'", other),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::Zh => f.write_str("zh"),
        }
    }
}
