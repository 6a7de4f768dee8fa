//! End-to-end engine flows over a simulated window.

use chrono::{Duration, Utc};
use tabweave_engine::{EngineState, build_snapshot, cluster, duplicates, focus, sessions, suspend};
use tabweave_provider::TabProvider;
use tabweave_testing::{WorldBuilder, mixed_window, research_window};
use tabweave_types::GroupColor;

fn group_id_by_name(provider: &dyn TabProvider, name: &str) -> String {
    build_snapshot(provider)
        .unwrap()
        .groups
        .iter()
        .find(|group| group.name == name)
        .map(|group| group.id.clone())
        .unwrap()
}

#[test]
fn test_focus_save_restore_round_trip() {
    let world = research_window().build();
    let mut state = EngineState::new();

    let papers = group_id_by_name(world.provider(), "papers");
    focus::focus(
        world.provider(),
        world.store(),
        &mut state,
        &world.settings,
        &papers,
    )
    .unwrap();

    let saved = sessions::save(world.provider(), world.store(), "checkpoint", 10).unwrap();
    assert_eq!(saved.name, "checkpoint");
    assert_eq!(saved.tab_count, build_snapshot(world.provider()).unwrap().tab_count());

    // Wreck the window, then restore.
    let docs = build_snapshot(world.provider())
        .unwrap()
        .groups
        .iter()
        .find(|group| group.name == "docs")
        .unwrap()
        .provider_group_id
        .unwrap();
    world.provider().remove_group(docs).unwrap();

    sessions::restore(world.provider(), world.store(), &saved.id, false).unwrap();

    let snapshot = build_snapshot(world.provider()).unwrap();
    let names: Vec<&str> = snapshot.groups.iter().map(|group| group.name.as_str()).collect();
    assert!(names.contains(&"papers"));
    assert!(names.contains(&"docs"));
    // The active tab survives the replacement alongside the restored set.
    assert_eq!(snapshot.tab_count(), saved.tab_count + 1);

    let papers = snapshot
        .groups
        .iter()
        .find(|group| group.name == "papers")
        .unwrap();
    assert_eq!(papers.color, GroupColor::Blue);
    assert_eq!(papers.tabs.len(), 2);
}

#[test]
fn test_restore_append_keeps_current_window() {
    let world = research_window().build();
    let saved = sessions::save(world.provider(), world.store(), "base", 10).unwrap();
    let before = build_snapshot(world.provider()).unwrap().tab_count();

    sessions::restore(world.provider(), world.store(), &saved.id, true).unwrap();

    let after = build_snapshot(world.provider()).unwrap().tab_count();
    assert_eq!(after, before + saved.tab_count);
}

#[test]
fn test_auto_group_clusters_mixed_window() {
    let world = mixed_window().build();

    // The single pinned mail tab stays below the pair threshold.
    let created = cluster::auto_group_all(world.provider()).unwrap();
    assert_eq!(created, 2);

    let snapshot = build_snapshot(world.provider()).unwrap();
    let shop = snapshot
        .groups
        .iter()
        .find(|group| group.name == "shop.example.com")
        .unwrap();
    assert_eq!(shop.tabs.len(), 3);
    assert_ne!(shop.color, GroupColor::Grey);

    let news = snapshot
        .groups
        .iter()
        .find(|group| group.name == "news.example.org")
        .unwrap();
    assert_eq!(news.tabs.len(), 2);
}

#[test]
fn test_idle_sweep_and_unsuspend() {
    let world = mixed_window()
        .settings(|settings| settings.suspension_timeout_minutes = 30)
        .build();
    let mut state = EngineState::new();

    let now = Utc::now();
    // First sweep only seeds the activity clock.
    let first = suspend::sweep_idle(
        world.provider(),
        &mut state,
        &world.settings,
        now,
    )
    .unwrap();
    assert_eq!(first, 0);

    let later = now + Duration::minutes(31);
    let suspended = suspend::sweep_idle(
        world.provider(),
        &mut state,
        &world.settings,
        later,
    )
    .unwrap();
    // Everything but the pinned mail tab times out.
    assert_eq!(suspended, 5);

    let snapshot = build_snapshot(world.provider()).unwrap();
    let mail = snapshot
        .all_tabs()
        .find(|tab| tab.url.contains("mail.example.com"))
        .unwrap();
    assert!(!mail.suspended);

    let listed = suspend::list_suspended(world.provider(), &mut state).unwrap();
    assert_eq!(listed.len(), 5);

    // Bring one back.
    let victim = listed[0].tab_id;
    let original = listed[0].url.clone();
    assert!(suspend::unsuspend_tab(world.provider(), &mut state, victim).unwrap());
    let tab = world.provider().find_tab(victim).unwrap();
    assert_eq!(tab.url, original);
    assert_eq!(
        suspend::list_suspended(world.provider(), &mut state)
            .unwrap()
            .len(),
        4
    );
}

#[test]
fn test_duplicate_detection_and_cleanup() {
    let world = WorldBuilder::new()
        .tab("https://docs.example.com/guide")
        .tab("https://docs.example.com/guide#intro")
        .tab("https://docs.example.com/guide/")
        .tab("https://other.example.com/")
        .build();

    let snapshot = build_snapshot(world.provider()).unwrap();
    let buckets = duplicates::find_duplicates(&snapshot, false);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].tabs.len(), 3);

    let closed = duplicates::close_all(world.provider(), false).unwrap();
    assert_eq!(closed, 2);
    assert_eq!(build_snapshot(world.provider()).unwrap().tab_count(), 2);
}
