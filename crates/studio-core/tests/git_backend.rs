use std::path::Path;

use git2::Repository;
use tempfile::TempDir;

use studio_core::backend::{BackendError, ConfigBackend, GitConfigBackend};
use studio_core::config::TierPaths;
use studio_core::session::{AddOutcome, LoadOutcome, Session};
use studio_core::types::{ConfigEntry, Scope, Target, WireEntry};

fn backend_in(dir: &Path) -> GitConfigBackend {
    GitConfigBackend::new(TierPaths {
        global: dir.join("home").join(".gitconfig"),
        system: dir.join("etc").join("gitconfig"),
    })
}

fn value_of<'a>(records: &'a [WireEntry], key: &str) -> Option<&'a str> {
    records
        .iter()
        .find(|record| record.key == key)
        .map(|record| record.value.as_str())
}

#[tokio::test]
async fn missing_tier_file_loads_as_empty() {
    let temp = TempDir::new().unwrap();
    let backend = backend_in(temp.path());

    let records = backend
        .load_entries(Scope::System, &Target::Global)
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn global_save_then_load_round_trips() {
    let temp = TempDir::new().unwrap();
    let backend = backend_in(temp.path());
    let entries = vec![
        ConfigEntry::new("user.name", "Ada", Scope::Global),
        ConfigEntry::new("pull.rebase", "true", Scope::Global),
    ];

    backend
        .save_entries(Scope::Global, &entries, &Target::Global)
        .await
        .unwrap();
    let records = backend
        .load_entries(Scope::Global, &Target::Global)
        .await
        .unwrap();

    assert!(temp.path().join("home").join(".gitconfig").exists());
    assert_eq!(value_of(&records, "user.name"), Some("Ada"));
    assert_eq!(value_of(&records, "pull.rebase"), Some("true"));
    assert!(records.iter().all(|record| record.scope == "global"));
}

#[tokio::test]
async fn camel_case_schema_keys_round_trip() {
    let temp = TempDir::new().unwrap();
    let backend = backend_in(temp.path());
    let entries = vec![
        ConfigEntry::new("init.defaultBranch", "main", Scope::Global),
        ConfigEntry::new("push.autoSetupRemote", "true", Scope::Global),
    ];

    backend
        .save_entries(Scope::Global, &entries, &Target::Global)
        .await
        .unwrap();
    let records = backend
        .load_entries(Scope::Global, &Target::Global)
        .await
        .unwrap();

    let mut keys: Vec<&str> = records.iter().map(|record| record.key.as_str()).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["init.defaultBranch", "push.autoSetupRemote"]);
    assert_eq!(value_of(&records, "init.defaultBranch"), Some("main"));
}

#[tokio::test]
async fn hand_written_mixed_case_keys_load_in_schema_spelling() {
    let temp = TempDir::new().unwrap();
    let backend = backend_in(temp.path());
    let path = temp.path().join("home").join(".gitconfig");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        "[INIT]\n\tDefaultBranch = trunk\n[remote \"Upstream\"]\n\turl = git@example.com:x.git\n",
    )
    .unwrap();

    let records = backend
        .load_entries(Scope::Global, &Target::Global)
        .await
        .unwrap();

    assert_eq!(value_of(&records, "init.defaultBranch"), Some("trunk"));
    assert_eq!(
        value_of(&records, "remote.Upstream.url"),
        Some("git@example.com:x.git")
    );
}

#[tokio::test]
async fn adding_a_key_already_in_the_file_asks_before_overwriting() {
    let temp = TempDir::new().unwrap();
    let backend = backend_in(temp.path());
    backend
        .save_entries(
            Scope::Global,
            &[ConfigEntry::new("init.defaultBranch", "master", Scope::Global)],
            &Target::Global,
        )
        .await
        .unwrap();
    let mut session = Session::new(backend.clone());
    session.open_global();
    session.reload().await.unwrap();

    let mut asked_with = None;
    let outcome = session
        .add_entry("init.defaultBranch", Some("main"), |existing| {
            asked_with = Some(existing.value.clone());
            true
        })
        .unwrap();

    assert_eq!(asked_with.as_deref(), Some("master"));
    assert_eq!(outcome, AddOutcome::Overwritten);
    assert_eq!(
        session.entries(),
        &[ConfigEntry::new("init.defaultBranch", "main", Scope::Global)]
    );

    session.save().await.unwrap();
    let records = backend
        .load_entries(Scope::Global, &Target::Global)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(value_of(&records, "init.defaultBranch"), Some("main"));
}

#[tokio::test]
async fn save_leaves_unmentioned_keys_in_place() {
    let temp = TempDir::new().unwrap();
    let backend = backend_in(temp.path());
    let first = vec![ConfigEntry::new("user.name", "Ada", Scope::Global)];
    let second = vec![ConfigEntry::new("user.email", "ada@example.com", Scope::Global)];

    backend
        .save_entries(Scope::Global, &first, &Target::Global)
        .await
        .unwrap();
    backend
        .save_entries(Scope::Global, &second, &Target::Global)
        .await
        .unwrap();
    let records = backend
        .load_entries(Scope::Global, &Target::Global)
        .await
        .unwrap();

    assert_eq!(value_of(&records, "user.name"), Some("Ada"));
    assert_eq!(value_of(&records, "user.email"), Some("ada@example.com"));
}

#[tokio::test]
async fn local_tier_lives_in_the_repository() {
    let temp = TempDir::new().unwrap();
    let repo_dir = temp.path().join("project");
    Repository::init(&repo_dir).unwrap();
    let backend = backend_in(temp.path());
    let target = Target::Repository(repo_dir.clone());
    let entries = vec![ConfigEntry::new("user.name", "Ada L.", Scope::Local)];

    backend
        .save_entries(Scope::Local, &entries, &target)
        .await
        .unwrap();
    let records = backend.load_entries(Scope::Local, &target).await.unwrap();

    assert_eq!(value_of(&records, "user.name"), Some("Ada L."));
    let written = std::fs::read_to_string(repo_dir.join(".git").join("config")).unwrap();
    assert!(written.contains("Ada L."));
    assert!(!temp.path().join("home").join(".gitconfig").exists());
}

#[tokio::test]
async fn local_tier_needs_a_repository_target() {
    let temp = TempDir::new().unwrap();
    let backend = backend_in(temp.path());

    let err = backend
        .load_entries(Scope::Local, &Target::Global)
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::NoRepository(Scope::Local)));
}

#[tokio::test]
async fn merged_is_not_a_storage_tier() {
    let temp = TempDir::new().unwrap();
    let backend = backend_in(temp.path());

    let err = backend
        .save_entries(Scope::Merged, &[], &Target::Global)
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::NotATier(Scope::Merged)));
}

#[tokio::test]
async fn repository_validation_uses_git() {
    let temp = TempDir::new().unwrap();
    let repo_dir = temp.path().join("project");
    Repository::init(&repo_dir).unwrap();
    let plain_dir = temp.path().join("plain");
    std::fs::create_dir_all(&plain_dir).unwrap();
    let backend = backend_in(temp.path());

    assert!(backend.is_valid_repository(&repo_dir).await.unwrap());
    assert!(!backend.is_valid_repository(&plain_dir).await.unwrap());
    assert!(
        !backend
            .is_valid_repository(&temp.path().join("missing"))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn session_resolves_across_real_tier_files() {
    let temp = TempDir::new().unwrap();
    let repo_dir = temp.path().join("project");
    Repository::init(&repo_dir).unwrap();
    let backend = backend_in(temp.path());
    let target = Target::Repository(repo_dir.clone());
    backend
        .save_entries(
            Scope::Global,
            &[ConfigEntry::new("user.name", "Ada", Scope::Global)],
            &target,
        )
        .await
        .unwrap();
    backend
        .save_entries(
            Scope::Local,
            &[ConfigEntry::new("user.name", "Ada L.", Scope::Local)],
            &target,
        )
        .await
        .unwrap();

    let mut session = Session::new(backend);
    session.open_repository(&repo_dir).await.unwrap();
    session.set_scope(Scope::Merged).unwrap();
    let outcome = session.reload().await.unwrap();

    assert!(matches!(outcome, LoadOutcome::Applied { flagged: 0, .. }));
    let effective = session.effective("user.name").unwrap();
    assert_eq!(effective.value, "Ada L.");
    assert_eq!(effective.scope, Scope::Local);
    assert_eq!(effective.overridden_by, Some(Scope::Global));
}
