//! Whole-browser layout snapshots: save, restore, delete, list.

use tabweave_provider::TabProvider;
use tabweave_store::{KeyValueStore, keys};
use tabweave_types::{Session, TabId};
use tracing::{debug, warn};

use crate::{Error, Result, build_snapshot};

/// Loads the retained session list, most-recent-first. A missing key is
/// an empty list.
pub fn list(store: &dyn KeyValueStore) -> Result<Vec<Session>> {
    Ok(tabweave_store::get_typed(store, keys::SESSIONS)?.unwrap_or_default())
}

/// Snapshots the current layout into a named session, prepends it to the
/// persisted list, and truncates the list to `max_sessions` (oldest
/// dropped first).
pub fn save(
    provider: &dyn TabProvider,
    store: &dyn KeyValueStore,
    name: &str,
    max_sessions: usize,
) -> Result<Session> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("session name must not be empty"));
    }

    let snapshot = build_snapshot(provider)?;
    let session = Session::new(name, snapshot.groups);

    let mut sessions = list(store)?;
    sessions.insert(0, session.clone());
    sessions.truncate(max_sessions);
    tabweave_store::put_typed(store, keys::SESSIONS, &sessions)?;

    debug!(session = %session.id, tabs = session.tab_count, "session saved");
    Ok(session)
}

/// Recreates a saved layout.
///
/// With `append = false`, every current tab except the currently active
/// one is closed first (avoiding a transient empty window); with
/// `append = true` the close step is skipped. Real groups are recreated
/// as new provider groups with the recorded name and color; synthetic
/// bucket tabs come back ungrouped. Tabs are created sequentially
/// group-by-group with no atomicity across provider calls: a mid-restore
/// failure leaves a partially restored window.
pub fn restore(
    provider: &dyn TabProvider,
    store: &dyn KeyValueStore,
    session_id: &str,
    append: bool,
) -> Result<()> {
    let sessions = list(store)?;
    let session = sessions
        .iter()
        .find(|session| session.id == session_id)
        .ok_or_else(|| Error::not_found(format!("session {}", session_id)))?;

    if !append {
        let current = provider.tabs()?;
        let keep: Option<TabId> = current
            .iter()
            .find(|entry| entry.tab.active)
            .map(|entry| entry.tab.id);
        let to_close: Vec<TabId> = current
            .iter()
            .map(|entry| entry.tab.id)
            .filter(|id| Some(*id) != keep)
            .collect();
        provider.close_tabs(&to_close)?;

        // The kept tab's old group would otherwise survive alongside its
        // restored twin; it continues life in the ungrouped bucket.
        if let Some(keep) = keep {
            provider.ungroup_tabs(&[keep])?;
        }
    }

    for group in &session.groups {
        let mut created: Vec<TabId> = Vec::with_capacity(group.tabs.len());
        for tab in &group.tabs {
            let new_tab = provider.create_tab(&tab.url, tab.pinned, None)?;
            created.push(new_tab.id);
        }

        if group.is_synthetic() || created.is_empty() {
            continue;
        }
        provider.create_group(&created, &group.name, group.color)?;
    }

    debug!(session = session_id, append, "session restored");
    Ok(())
}

/// Removes a session by id; a no-op when the id is absent.
pub fn delete(store: &dyn KeyValueStore, session_id: &str) -> Result<()> {
    let mut sessions = list(store)?;
    let before = sessions.len();
    sessions.retain(|session| session.id != session_id);

    if sessions.len() == before {
        warn!(session = session_id, "delete of unknown session ignored");
        return Ok(());
    }
    tabweave_store::put_typed(store, keys::SESSIONS, &sessions)?;
    Ok(())
}
