//! Single-group focus: deterministic hide/show transitions.
//!
//! "Hiding" a tab is approximated by deactivating it (the provider has no
//! native hide primitive for ungrouped tabs); grouped tabs additionally
//! use the provider's collapse primitive. Hidden is therefore a
//! best-effort visual state, not a strict guarantee.

use tabweave_provider::{GroupUpdate, TabProvider};
use tabweave_store::{KeyValueStore, keys};
use tabweave_types::Settings;
use tracing::debug;

use crate::state::EngineState;
use crate::{Error, Result, build_snapshot};

/// Enforces single-group focus on `group_id`.
///
/// Every other group has its non-pinned tabs deactivated and recorded in
/// the hidden set, and is collapsed if real; the synthetic bucket is
/// exempt from hiding when `show_ungrouped_tabs` is set. The target is
/// expanded and its first tab activated. Pinned tabs are never touched.
/// Idempotent: focusing the already-active group re-applies the same
/// operations.
pub fn focus(
    provider: &dyn TabProvider,
    store: &dyn KeyValueStore,
    state: &mut EngineState,
    settings: &Settings,
    group_id: &str,
) -> Result<()> {
    let snapshot = build_snapshot(provider)?;
    let target = snapshot
        .find_group(group_id)
        .ok_or_else(|| Error::not_found(format!("group {}", group_id)))?;

    for group in &snapshot.groups {
        if group.id == group_id {
            continue;
        }
        if group.is_synthetic() && settings.show_ungrouped_tabs {
            continue;
        }

        for tab in &group.tabs {
            if tab.pinned {
                continue;
            }
            provider.deactivate_tab(tab.id)?;
            state.hidden_tab_ids.insert(tab.id);
        }

        if let Some(provider_group_id) = group.provider_group_id {
            provider.update_group(provider_group_id, GroupUpdate::collapsed(true))?;
        }
    }

    // Tabs of the target are visible by definition, even if a previous
    // focus hid them.
    for tab in &target.tabs {
        state.hidden_tab_ids.remove(&tab.id);
    }

    if let Some(provider_group_id) = target.provider_group_id {
        provider.update_group(provider_group_id, GroupUpdate::collapsed(false))?;
    }
    if let Some(first) = target.tabs.first() {
        provider.activate_tab(first.id)?;
    }

    state.active_group_id = Some(group_id.to_string());
    tabweave_store::put_typed(store, keys::ACTIVE_GROUP_ID, &group_id)?;
    debug!(group = group_id, hidden = state.hidden_tab_ids.len(), "focus applied");
    Ok(())
}

/// Switches to a group without hiding the others: expands the target,
/// activates its first tab, and records it as active. Used when
/// single-group view is turned off.
pub fn activate_group(
    provider: &dyn TabProvider,
    store: &dyn KeyValueStore,
    state: &mut EngineState,
    group_id: &str,
) -> Result<()> {
    let snapshot = build_snapshot(provider)?;
    let target = snapshot
        .find_group(group_id)
        .ok_or_else(|| Error::not_found(format!("group {}", group_id)))?;

    if let Some(provider_group_id) = target.provider_group_id {
        provider.update_group(provider_group_id, GroupUpdate::collapsed(false))?;
    }
    if let Some(first) = target.tabs.first() {
        provider.activate_tab(first.id)?;
    }

    state.active_group_id = Some(group_id.to_string());
    tabweave_store::put_typed(store, keys::ACTIVE_GROUP_ID, &group_id)?;
    Ok(())
}

/// Leaves focus mode: expands every real group, empties the hidden set,
/// and clears the persisted focus indicator.
pub fn unfocus(
    provider: &dyn TabProvider,
    store: &dyn KeyValueStore,
    state: &mut EngineState,
) -> Result<()> {
    let snapshot = build_snapshot(provider)?;

    for group in &snapshot.groups {
        if let Some(provider_group_id) = group.provider_group_id {
            provider.update_group(provider_group_id, GroupUpdate::collapsed(false))?;
        }
    }

    state.hidden_tab_ids.clear();
    state.active_group_id = None;
    store.remove(keys::ACTIVE_GROUP_ID)?;
    debug!("focus cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabweave_provider::SimulatedProvider;
    use tabweave_store::MemoryStore;
    use tabweave_types::GroupColor;

    struct Fixture {
        provider: SimulatedProvider,
        store: MemoryStore,
        state: EngineState,
        settings: Settings,
        work: String,
        news: String,
    }

    fn fixture() -> Fixture {
        let provider = SimulatedProvider::new();
        let a = provider.seed_tab("https://a.com", false, None);
        let b = provider.seed_tab("https://b.com", false, None);
        let c = provider.seed_tab("https://c.com", false, None);
        let d = provider.seed_tab("https://d.com", true, None);
        provider.seed_tab("https://loose.com", false, None);
        let work = provider.seed_group("work", GroupColor::Blue, &[a, b]);
        let news = provider.seed_group("news", GroupColor::Red, &[c, d]);

        Fixture {
            provider,
            store: MemoryStore::new(),
            state: EngineState::new(),
            settings: Settings::default(),
            work: work.to_string(),
            news: news.to_string(),
        }
    }

    fn collapsed_by_name(provider: &SimulatedProvider, name: &str) -> bool {
        provider
            .groups()
            .unwrap()
            .into_iter()
            .find(|group| group.name == name)
            .unwrap()
            .collapsed
    }

    #[test]
    fn test_focus_collapses_others_and_activates_target() {
        let mut fx = fixture();
        focus(
            &fx.provider,
            &fx.store,
            &mut fx.state,
            &fx.settings,
            &fx.work,
        )
        .unwrap();

        assert!(!collapsed_by_name(&fx.provider, "work"));
        assert!(collapsed_by_name(&fx.provider, "news"));
        assert_eq!(fx.state.active_group_id.as_deref(), Some(fx.work.as_str()));

        // First tab of the focused group is active.
        let tabs = fx.provider.tabs().unwrap();
        assert!(tabs[0].tab.active);
    }

    #[test]
    fn test_focus_never_hides_pinned_tabs() {
        let mut fx = fixture();
        focus(
            &fx.provider,
            &fx.store,
            &mut fx.state,
            &fx.settings,
            &fx.work,
        )
        .unwrap();

        // Tab d (id 4) is pinned and lives in the unfocused "news" group.
        let pinned = fx.provider.tabs().unwrap()[3].tab.clone();
        assert!(pinned.pinned);
        assert!(!fx.state.hidden_tab_ids.contains(&pinned.id));
    }

    #[test]
    fn test_show_ungrouped_setting_exempts_bucket() {
        let mut fx = fixture();
        fx.settings.show_ungrouped_tabs = true;
        focus(
            &fx.provider,
            &fx.store,
            &mut fx.state,
            &fx.settings,
            &fx.work,
        )
        .unwrap();
        let loose = fx.provider.tabs().unwrap()[4].tab.id;
        assert!(!fx.state.hidden_tab_ids.contains(&loose));

        fx.settings.show_ungrouped_tabs = false;
        focus(
            &fx.provider,
            &fx.store,
            &mut fx.state,
            &fx.settings,
            &fx.work,
        )
        .unwrap();
        assert!(fx.state.hidden_tab_ids.contains(&loose));
    }

    #[test]
    fn test_focus_unknown_group_is_not_found() {
        let mut fx = fixture();
        let result = focus(
            &fx.provider,
            &fx.store,
            &mut fx.state,
            &fx.settings,
            "999",
        );
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_unfocus_restores_everything() {
        let mut fx = fixture();
        focus(
            &fx.provider,
            &fx.store,
            &mut fx.state,
            &fx.settings,
            &fx.work,
        )
        .unwrap();
        unfocus(&fx.provider, &fx.store, &mut fx.state).unwrap();

        assert!(!collapsed_by_name(&fx.provider, "work"));
        assert!(!collapsed_by_name(&fx.provider, "news"));
        assert!(fx.state.hidden_tab_ids.is_empty());
        assert!(fx.state.active_group_id.is_none());
        assert!(fx.store.get(keys::ACTIVE_GROUP_ID).unwrap().is_none());
    }

    #[test]
    fn test_focus_switch_never_leaves_both_expanded() {
        let mut fx = fixture();
        let work = fx.work.clone();
        let news = fx.news.clone();

        focus(&fx.provider, &fx.store, &mut fx.state, &fx.settings, &work).unwrap();
        focus(&fx.provider, &fx.store, &mut fx.state, &fx.settings, &news).unwrap();

        assert!(collapsed_by_name(&fx.provider, "work"));
        assert!(!collapsed_by_name(&fx.provider, "news"));
        // The new target's tabs are no longer considered hidden.
        let snapshot = build_snapshot(&fx.provider).unwrap();
        for tab in &snapshot.find_group(&news).unwrap().tabs {
            assert!(!fx.state.hidden_tab_ids.contains(&tab.id));
        }
    }

    #[test]
    fn test_activate_group_leaves_others_expanded() {
        let mut fx = fixture();
        let news = fx.news.clone();
        activate_group(&fx.provider, &fx.store, &mut fx.state, &news).unwrap();

        assert!(!collapsed_by_name(&fx.provider, "work"));
        assert!(!collapsed_by_name(&fx.provider, "news"));
        assert!(fx.state.hidden_tab_ids.is_empty());
        assert_eq!(fx.state.active_group_id.as_deref(), Some(news.as_str()));
    }

    #[test]
    fn test_focus_is_idempotent() {
        let mut fx = fixture();
        let work = fx.work.clone();
        focus(&fx.provider, &fx.store, &mut fx.state, &fx.settings, &work).unwrap();
        let hidden_before = fx.state.hidden_tab_ids.clone();

        focus(&fx.provider, &fx.store, &mut fx.state, &fx.settings, &work).unwrap();
        assert_eq!(fx.state.hidden_tab_ids, hidden_before);
        assert_eq!(fx.state.active_group_id.as_deref(), Some(work.as_str()));
    }
}
