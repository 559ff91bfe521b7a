use studio_core::backend::{BackendCall, BackendError, MemoryBackend};
use studio_core::config::CONFIG_SCHEMA;
use studio_core::session::{EntrySource, LoadOutcome, Session};
use studio_core::types::{ConfigEntry, Scope, Target, WireEntry};

fn repo() -> Target {
    Target::Repository("/work/project".into())
}

fn backend_with_tiers() -> MemoryBackend {
    let backend = MemoryBackend::new();
    backend.add_repository("/work/project");
    backend.insert(&repo(), ConfigEntry::new("user.name", "Ada L.", Scope::Local));
    backend.insert(&repo(), ConfigEntry::new("user.name", "Ada", Scope::Global));
    backend.insert(&repo(), ConfigEntry::new("core.editor", "vim", Scope::System));
    backend
}

async fn repo_session(backend: &MemoryBackend) -> Session<MemoryBackend> {
    let mut session = Session::new(backend.clone());
    session.open_repository("/work/project").await.unwrap();
    session
}

#[tokio::test]
async fn reload_applies_the_active_tier() {
    let backend = backend_with_tiers();
    let mut session = repo_session(&backend).await;

    let outcome = session.reload().await.unwrap();

    assert_eq!(outcome, LoadOutcome::Applied { entries: 1, flagged: 0 });
    assert_eq!(
        session.entries(),
        &[ConfigEntry::new("user.name", "Ada L.", Scope::Local)]
    );
    assert_eq!(session.source(), EntrySource::Backend);
}

#[tokio::test]
async fn merged_reload_collects_every_tier_of_the_target() {
    let backend = backend_with_tiers();
    let mut session = repo_session(&backend).await;
    session.set_scope(Scope::Merged).unwrap();

    let outcome = session.reload().await.unwrap();

    assert_eq!(outcome, LoadOutcome::Applied { entries: 3, flagged: 0 });
    let effective = session.effective("user.name").unwrap();
    assert_eq!(effective.value, "Ada L.");
    assert_eq!(effective.overridden_by, Some(Scope::Global));

    let loads: Vec<Scope> = backend
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            BackendCall::Load(scope, _) => Some(scope),
            _ => None,
        })
        .collect();
    assert_eq!(loads, vec![Scope::Local, Scope::Global, Scope::System]);
}

#[tokio::test]
async fn merged_reload_on_global_target_skips_local_tier() {
    let backend = MemoryBackend::new();
    backend.insert(&Target::Global, ConfigEntry::new("color.ui", "auto", Scope::Global));
    let mut session = Session::new(backend.clone());
    session.open_global();
    session.set_scope(Scope::Merged).unwrap();

    let outcome = session.reload().await.unwrap();

    assert_eq!(outcome, LoadOutcome::Applied { entries: 1, flagged: 0 });
    assert!(
        !backend
            .calls()
            .contains(&BackendCall::Load(Scope::Local, Target::Global))
    );
}

#[tokio::test]
async fn response_after_scope_change_is_discarded() {
    let backend = backend_with_tiers();
    let mut session = repo_session(&backend).await;

    let first = session.request_load().unwrap();
    session.set_scope(Scope::Global).unwrap();
    let second = session.request_load().unwrap();

    let second_result = second.fetch(session.backend()).await;
    let first_result = first.fetch(session.backend()).await;

    assert!(matches!(
        session.apply_load(&second, second_result),
        LoadOutcome::Applied { .. }
    ));
    assert_eq!(session.apply_load(&first, first_result), LoadOutcome::Stale);

    assert_eq!(session.scope(), Scope::Global);
    assert_eq!(
        session.entries(),
        &[ConfigEntry::new("user.name", "Ada", Scope::Global)]
    );
}

#[tokio::test]
async fn older_request_for_same_scope_is_discarded() {
    let backend = backend_with_tiers();
    let mut session = repo_session(&backend).await;

    let first = session.request_load().unwrap();
    let second = session.request_load().unwrap();

    let result = first.fetch(session.backend()).await;
    assert_eq!(session.apply_load(&first, result), LoadOutcome::Stale);
    assert!(session.entries().is_empty());

    let result = second.fetch(session.backend()).await;
    assert!(matches!(
        session.apply_load(&second, result),
        LoadOutcome::Applied { .. }
    ));
}

#[tokio::test]
async fn replaced_entries_are_not_clobbered_by_a_pending_load() {
    let backend = backend_with_tiers();
    let mut session = repo_session(&backend).await;

    let pending = session.request_load().unwrap();
    let replacement = vec![ConfigEntry::new("user.email", "ada@example.com", Scope::Local)];
    session.replace_entries(replacement.clone());

    let result = pending.fetch(session.backend()).await;
    assert_eq!(session.apply_load(&pending, result), LoadOutcome::Stale);
    assert_eq!(session.entries(), replacement.as_slice());
    assert_eq!(session.source(), EntrySource::Replaced);
}

#[tokio::test]
async fn response_after_target_change_is_discarded() {
    let backend = backend_with_tiers();
    let mut session = repo_session(&backend).await;
    session.set_scope(Scope::Global).unwrap();

    let pending = session.request_load().unwrap();
    session.open_global();

    let result = pending.fetch(session.backend()).await;
    assert_eq!(session.apply_load(&pending, result), LoadOutcome::Stale);
}

#[tokio::test]
async fn failed_load_falls_back_to_placeholders() {
    let backend = MemoryBackend::new();
    backend.fail_loads(true);
    let mut session = Session::new(backend);
    session.open_global();

    let outcome = session.reload().await.unwrap();

    assert_eq!(
        outcome,
        LoadOutcome::Fallback {
            entries: CONFIG_SCHEMA.len()
        }
    );
    assert_eq!(session.source(), EntrySource::Placeholder);
    assert!(session.entries().iter().all(|e| e.scope == Scope::Global));
    let prune = session.store().get("fetch.prune", Scope::Global).unwrap();
    assert_eq!(prune.value, "false");
    assert_eq!(session.entries()[0].value, "mock-0");
}

#[tokio::test]
async fn stale_failure_does_not_install_placeholders() {
    let backend = backend_with_tiers();
    let mut session = repo_session(&backend).await;
    session.reload().await.unwrap();

    let stale = session.request_load().unwrap();
    session.reload().await.unwrap();

    let outcome = session.apply_load(
        &stale,
        Err(BackendError::Unavailable("gone".to_string())),
    );

    assert_eq!(outcome, LoadOutcome::Stale);
    assert_eq!(session.entries().len(), 1);
    assert_eq!(session.source(), EntrySource::Backend);
}

#[tokio::test]
async fn malformed_records_are_flagged() {
    let backend = MemoryBackend::new();
    backend.insert_raw(
        &Target::Global,
        Scope::Global,
        WireEntry::new("user.name", "Ada", "global"),
    );
    backend.insert_raw(
        &Target::Global,
        Scope::Global,
        WireEntry::new("core.editor", "vim", "worktree"),
    );
    backend.insert_raw(
        &Target::Global,
        Scope::Global,
        WireEntry::new("color.ui", "auto", "merged"),
    );
    let mut session = Session::new(backend);
    session.open_global();

    let outcome = session.reload().await.unwrap();

    assert_eq!(outcome, LoadOutcome::Applied { entries: 1, flagged: 2 });
    assert_eq!(session.store().flagged().len(), 2);
}

#[tokio::test]
async fn reload_without_target_is_an_error() {
    let mut session = Session::new(MemoryBackend::new());

    assert!(session.reload().await.is_err());
    assert!(session.request_load().is_err());
}
