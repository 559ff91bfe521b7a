//! GitConfig Studio Core Library
//!
//! Domain logic for editing layered git configuration: which tier's value
//! is effective for a key, what it overrides, and a working set of entries
//! that loads from and saves to the local, global and system tiers.

pub mod backend;
pub mod config;
pub mod context;
pub mod resolve;
pub mod session;
pub mod store;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Types
    pub use crate::types::{ConfigEntry, Locale, Scope, Target, WireEntry};

    // Schema and projection
    pub use crate::config::{
        CATEGORIES, CONFIG_SCHEMA, ConfigMeta, SchemaGroup, StudioSettings, ValueType,
        group_schema,
    };

    // Resolution
    pub use crate::resolve::{KeyDiff, diff_summary, merged_view, resolve_effective};

    // Store
    pub use crate::store::{EntryStore, PersistedState, StateFile, StoreError, UpsertOutcome};

    // Backend
    pub use crate::backend::{BackendError, ConfigBackend, GitConfigBackend, MemoryBackend};

    // Session
    pub use crate::context::AppContext;
    pub use crate::session::{AddOutcome, LoadOutcome, LoadRequest, SaveReport, Session, SessionError};
}
