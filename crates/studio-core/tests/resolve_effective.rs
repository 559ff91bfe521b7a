use studio_core::resolve::{entries_for_key, merged_view, resolve_effective};
use studio_core::types::{ConfigEntry, Scope};

fn entry(key: &str, value: &str, scope: Scope) -> ConfigEntry {
    ConfigEntry::new(key, value, scope)
}

#[test]
fn local_wins_and_reports_lowest_tier_present() {
    let entries = vec![
        entry("user.name", "C", Scope::System),
        entry("user.name", "B", Scope::Global),
        entry("user.name", "A", Scope::Local),
    ];

    let effective = resolve_effective(&entries, "user.name").expect("key has values");

    assert_eq!(effective.value, "A");
    assert_eq!(effective.scope, Scope::Local);
    assert_eq!(effective.overridden_by, Some(Scope::System));
}

#[test]
fn local_over_global_reports_global() {
    let entries = vec![
        entry("user.name", "A", Scope::Local),
        entry("user.name", "B", Scope::Global),
    ];

    let effective = resolve_effective(&entries, "user.name").unwrap();

    assert_eq!(effective.value, "A");
    assert_eq!(effective.overridden_by, Some(Scope::Global));
}

#[test]
fn global_over_system_reports_system() {
    let entries = vec![
        entry("color.ui", "never", Scope::System),
        entry("color.ui", "auto", Scope::Global),
    ];

    let effective = resolve_effective(&entries, "color.ui").unwrap();

    assert_eq!(effective.scope, Scope::Global);
    assert_eq!(effective.overridden_by, Some(Scope::System));
}

#[test]
fn single_entry_in_any_tier_has_no_override() {
    for scope in Scope::TIERS {
        let entries = vec![entry("core.editor", "vim", scope)];

        let effective = resolve_effective(&entries, "core.editor").unwrap();

        assert_eq!(effective, entries[0]);
        assert_eq!(effective.overridden_by, None);
    }
}

#[test]
fn missing_key_resolves_to_none() {
    let entries = vec![entry("user.name", "A", Scope::Local)];

    assert!(resolve_effective(&entries, "user.email").is_none());
    assert!(resolve_effective(&[], "user.name").is_none());
}

#[test]
fn keys_match_exactly() {
    let entries = vec![entry("init.defaultbranch", "trunk", Scope::Global)];

    assert!(resolve_effective(&entries, "init.defaultBranch").is_none());
    assert!(resolve_effective(&entries, "init.defaultbranch ").is_none());
}

#[test]
fn input_is_not_mutated_and_values_pass_through() {
    let entries = vec![
        entry("pull.rebase", "true", Scope::Global),
        entry("pull.rebase", "merges", Scope::Local),
    ];
    let before = entries.clone();

    let effective = resolve_effective(&entries, "pull.rebase").unwrap();

    assert_eq!(entries, before);
    assert_eq!(effective.key, "pull.rebase");
    assert_eq!(effective.value, "merges");
    assert!(entries.iter().all(|e| e.overridden_by.is_none()));
}

#[test]
fn stale_annotations_on_input_are_replaced() {
    let mut lone = entry("user.name", "A", Scope::Global);
    lone.overridden_by = Some(Scope::System);

    let effective = resolve_effective(&[lone], "user.name").unwrap();

    assert_eq!(effective.overridden_by, None);
}

#[test]
fn duplicate_scope_resolves_to_first_in_input_order() {
    let entries = vec![
        entry("user.name", "first", Scope::Local),
        entry("user.name", "second", Scope::Local),
    ];

    let effective = resolve_effective(&entries, "user.name").unwrap();

    assert_eq!(effective.value, "first");
    assert_eq!(effective.overridden_by, Some(Scope::Local));
    assert_eq!(resolve_effective(&entries, "user.name"), Some(effective));
}

#[test]
fn merged_scope_entries_are_left_out_of_ranking() {
    let entries = vec![
        entry("user.name", "bogus", Scope::Merged),
        entry("user.name", "B", Scope::Global),
    ];

    let effective = resolve_effective(&entries, "user.name").unwrap();

    assert_eq!(effective.value, "B");
    assert_eq!(effective.overridden_by, None);
    assert!(resolve_effective(&entries[..1], "user.name").is_none());
}

#[test]
fn merged_view_has_one_entry_per_key_in_first_seen_order() {
    let entries = vec![
        entry("user.email", "b@home", Scope::Global),
        entry("user.name", "A", Scope::System),
        entry("user.email", "a@work", Scope::Local),
    ];

    let merged = merged_view(&entries);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].key, "user.email");
    assert_eq!(merged[0].value, "a@work");
    assert_eq!(merged[0].overridden_by, Some(Scope::Global));
    assert_eq!(merged[1].key, "user.name");
    assert_eq!(merged[1].overridden_by, None);
}

#[test]
fn entries_for_key_are_ordered_by_precedence() {
    let entries = vec![
        entry("merge.ff", "only", Scope::System),
        entry("merge.ff", "true", Scope::Local),
        entry("merge.ff", "false", Scope::Global),
    ];

    let scopes: Vec<Scope> = entries_for_key(&entries, "merge.ff")
        .iter()
        .map(|e| e.scope)
        .collect();

    assert_eq!(scopes, vec![Scope::Local, Scope::Global, Scope::System]);
}
