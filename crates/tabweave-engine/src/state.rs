use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use tabweave_store::{KeyValueStore, keys};
use tabweave_types::TabId;

use crate::Result;

/// What a suspended tab needs to come back: held only while the tab is
/// suspended, removed when it is closed or unsuspended.
#[derive(Debug, Clone, PartialEq)]
pub struct SuspensionRecord {
    pub original_url: String,
    pub title: String,
    pub favicon_url: Option<String>,
}

/// Process-wide mutable state, owned by the dispatcher and passed by
/// reference into component calls.
///
/// Everything here is volatile except `active_group_id`, which is
/// mirrored into the persisted store so a restart can restore the focus
/// indicator. The hidden-tab set and suspension records are deliberately
/// NOT persisted: after a restart, tabs hidden by focus mode are simply
/// deactivated tabs, and suspended tabs are only recoverable through the
/// URL carried by their placeholder page.
#[derive(Debug, Default)]
pub struct EngineState {
    /// Focused group, if focus mode is active.
    pub active_group_id: Option<String>,

    /// Tabs deactivated by the focus controller.
    pub hidden_tab_ids: BTreeSet<TabId>,

    /// Suspension records keyed by tab id. Ordered so listings are
    /// deterministic.
    pub suspended: BTreeMap<TabId, SuspensionRecord>,

    /// Last-active timestamp per tab, seeded lazily on first observation.
    pub last_active: HashMap<TabId, DateTime<Utc>>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit initialization at process start: restores the focus
    /// indicator from the store; everything else rebuilds empty.
    pub fn restore(store: &dyn KeyValueStore) -> Result<Self> {
        let active_group_id = tabweave_store::get_typed(store, keys::ACTIVE_GROUP_ID)?;
        Ok(Self {
            active_group_id,
            ..Self::default()
        })
    }

    /// Explicit teardown: drops all volatile state and the persisted
    /// focus mirror.
    pub fn reset(&mut self, store: &dyn KeyValueStore) -> Result<()> {
        *self = Self::default();
        store.remove(keys::ACTIVE_GROUP_ID)?;
        Ok(())
    }

    pub fn note_activity(&mut self, tab: TabId, now: DateTime<Utc>) {
        self.last_active.insert(tab, now);
    }

    /// Forgets every trace of a closed tab.
    pub fn forget_tab(&mut self, tab: TabId) {
        self.hidden_tab_ids.remove(&tab);
        self.suspended.remove(&tab);
        self.last_active.remove(&tab);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabweave_store::MemoryStore;

    #[test]
    fn test_restore_reads_focus_mirror() {
        let store = MemoryStore::new();
        tabweave_store::put_typed(&store, keys::ACTIVE_GROUP_ID, &"3".to_string()).unwrap();

        let state = EngineState::restore(&store).unwrap();
        assert_eq!(state.active_group_id.as_deref(), Some("3"));
        assert!(state.hidden_tab_ids.is_empty());
        assert!(state.suspended.is_empty());
    }

    #[test]
    fn test_restore_without_mirror_is_empty() {
        let store = MemoryStore::new();
        let state = EngineState::restore(&store).unwrap();
        assert!(state.active_group_id.is_none());
    }

    #[test]
    fn test_forget_tab_clears_all_maps() {
        let mut state = EngineState::new();
        let tab = TabId::new(4);
        state.hidden_tab_ids.insert(tab);
        state.suspended.insert(
            tab,
            SuspensionRecord {
                original_url: "https://a.com".to_string(),
                title: "a".to_string(),
                favicon_url: None,
            },
        );
        state.note_activity(tab, Utc::now());

        state.forget_tab(tab);
        assert!(state.hidden_tab_ids.is_empty());
        assert!(state.suspended.is_empty());
        assert!(state.last_active.is_empty());
    }

    #[test]
    fn test_reset_clears_store_mirror() {
        let store = MemoryStore::new();
        tabweave_store::put_typed(&store, keys::ACTIVE_GROUP_ID, &"7".to_string()).unwrap();

        let mut state = EngineState::restore(&store).unwrap();
        state.reset(&store).unwrap();

        assert!(state.active_group_id.is_none());
        assert!(store.get(keys::ACTIVE_GROUP_ID).unwrap().is_none());
    }
}
