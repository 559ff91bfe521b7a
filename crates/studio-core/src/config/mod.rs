//! Schema, search projection, tier file locations and application settings.

pub mod filter;
pub mod paths;
pub mod schema;
pub mod settings;

pub use filter::{SchemaGroup, group_schema, ungrouped_keys};
pub use paths::TierPaths;
pub use schema::{
    CATEGORIES, CONFIG_SCHEMA, ConfigMeta, ValueType, canonical_key, default_value_for, find_meta,
    same_git_key, suggest_keys,
};
pub use settings::{PathOverrides, StudioSettings};
