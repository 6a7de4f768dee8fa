//! Idle-tab suspension: placeholder swap-out and on-demand restore.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tabweave_provider::TabProvider;
use tabweave_types::{Settings, Tab, TabId};
use tracing::debug;

use crate::state::{EngineState, SuspensionRecord};
use crate::{Error, Result, urls};

/// Listing entry for a currently suspended tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspendedTab {
    pub tab_id: TabId,
    pub title: String,
    pub url: String,
}

fn is_whitelisted(url: &str, whitelist: &[String]) -> bool {
    let host = urls::origin(url).map(|origin| urls::origin_label(&origin).to_string());

    whitelist
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .any(|entry| match &host {
            Some(host) => host.contains(entry),
            None => url.contains(entry),
        })
}

/// The permissive eligibility gate: pinned, active, already-suspended,
/// system, and whitelisted tabs are silently left alone.
fn eligible(tab: &Tab, settings: &Settings) -> bool {
    !tab.pinned
        && !tab.active
        && !urls::is_placeholder(&tab.url)
        && !urls::is_system(&tab.url)
        && !is_whitelisted(&tab.url, &settings.suspension_whitelist)
}

fn suspend_eligible_tab(
    provider: &dyn TabProvider,
    state: &mut EngineState,
    settings: &Settings,
    tab: &Tab,
) -> Result<bool> {
    if !eligible(tab, settings) {
        return Ok(false);
    }

    let placeholder = urls::placeholder_url(&tab.url, &tab.title, tab.favicon_url.as_deref());
    provider.set_tab_url(tab.id, &placeholder)?;
    state.suspended.insert(
        tab.id,
        SuspensionRecord {
            original_url: tab.url.clone(),
            title: tab.title.clone(),
            favicon_url: tab.favicon_url.clone(),
        },
    );
    debug!(tab = %tab.id, "tab suspended");
    Ok(true)
}

/// Suspends one tab on demand. Returns `false` (without error) when the
/// tab is ineligible; fails with `NotFound` when the provider no longer
/// knows the id.
pub fn suspend_tab(
    provider: &dyn TabProvider,
    state: &mut EngineState,
    settings: &Settings,
    tab_id: TabId,
) -> Result<bool> {
    let tabs = provider.tabs()?;
    let entry = tabs
        .iter()
        .find(|entry| entry.tab.id == tab_id)
        .ok_or_else(|| Error::not_found(format!("tab {}", tab_id)))?;

    suspend_eligible_tab(provider, state, settings, &entry.tab)
}

/// Restores a suspended tab to its original URL and drops the record.
/// Returns `false` when no record exists for the id.
pub fn unsuspend_tab(
    provider: &dyn TabProvider,
    state: &mut EngineState,
    tab_id: TabId,
) -> Result<bool> {
    let Some(record) = state.suspended.get(&tab_id).cloned() else {
        return Ok(false);
    };

    provider.set_tab_url(tab_id, &record.original_url)?;
    state.suspended.remove(&tab_id);
    state.note_activity(tab_id, Utc::now());
    debug!(tab = %tab_id, "tab restored from placeholder");
    Ok(true)
}

/// Suspends every tab whose idle duration exceeds the configured
/// timeout. Last-active timestamps are seeded to `now` on first
/// observation, so brand-new tabs are never immediately eligible. Runs
/// only while the timeout setting is non-zero. Returns the number of
/// tabs suspended.
pub fn sweep_idle(
    provider: &dyn TabProvider,
    state: &mut EngineState,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Result<usize> {
    if settings.suspension_timeout_minutes == 0 {
        return Ok(0);
    }
    let timeout = Duration::minutes(settings.suspension_timeout_minutes as i64);

    let tabs = provider.tabs()?;
    let live: HashSet<TabId> = tabs.iter().map(|entry| entry.tab.id).collect();
    state.last_active.retain(|id, _| live.contains(id));

    let mut suspended = 0;
    for entry in &tabs {
        let last_active = *state.last_active.entry(entry.tab.id).or_insert(now);
        if now - last_active < timeout {
            continue;
        }
        if suspend_eligible_tab(provider, state, settings, &entry.tab)? {
            suspended += 1;
        }
    }

    if suspended > 0 {
        debug!(count = suspended, "idle sweep suspended tabs");
    }
    Ok(suspended)
}

/// Current suspension records, pruned against the provider's live tabs
/// so stale entries self-heal.
pub fn list_suspended(
    provider: &dyn TabProvider,
    state: &mut EngineState,
) -> Result<Vec<SuspendedTab>> {
    let live: HashSet<TabId> = provider
        .tabs()?
        .iter()
        .map(|entry| entry.tab.id)
        .collect();
    state.suspended.retain(|id, _| live.contains(id));

    Ok(state
        .suspended
        .iter()
        .map(|(id, record)| SuspendedTab {
            tab_id: *id,
            title: record.title.clone(),
            url: record.original_url.clone(),
        })
        .collect())
}
