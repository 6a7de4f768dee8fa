//! Single entry point translating external commands into engine calls.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tabweave_engine::{EngineState, build_snapshot, cluster, duplicates, focus, sessions, suspend};
use tabweave_provider::{ProviderEvent, TabProvider};
use tabweave_store::{KeyValueStore, keys};
use tabweave_types::{Settings, UNGROUPED_GROUP_ID};
use tracing::{debug, warn};

use crate::command::{Command, CommandResponse, TabMatch};

fn to_value<T: Serialize>(value: &T) -> tabweave_engine::Result<Value> {
    serde_json::to_value(value).map_err(|err| tabweave_engine::Error::Store(err.into()))
}

/// Owns the provider/store handles, the explicit state container, and
/// the loaded settings; every external command funnels through
/// [`Dispatcher::handle`], which re-derives a fresh snapshot before
/// acting and converts every failure into the `{success:false, error}`
/// envelope.
pub struct Dispatcher {
    provider: Arc<dyn TabProvider>,
    store: Arc<dyn KeyValueStore>,
    state: EngineState,
    settings: Settings,
}

impl Dispatcher {
    /// Bootstraps from the persisted store: settings (clamped) and the
    /// focus indicator. The hidden-tab set and suspension records are
    /// rebuilt empty; a restart during focus mode or with suspended tabs
    /// is a documented limitation.
    pub fn new(
        provider: Arc<dyn TabProvider>,
        store: Arc<dyn KeyValueStore>,
    ) -> crate::Result<Self> {
        let mut settings: Settings =
            tabweave_store::get_typed(store.as_ref(), keys::SETTINGS)?.unwrap_or_default();
        settings.clamp();
        let state = EngineState::restore(store.as_ref())?;

        Ok(Self {
            provider,
            store,
            state,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Handles one command, catching all failures at this boundary.
    pub fn handle(&mut self, command: Command) -> CommandResponse {
        debug!(?command, "dispatching");
        match self.dispatch(command) {
            Ok(data) => CommandResponse::ok(data),
            Err(err) => {
                warn!(%err, "command failed");
                CommandResponse::fail(err.to_string())
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> tabweave_engine::Result<Option<Value>> {
        let provider = self.provider.as_ref();
        let store = self.store.as_ref();

        match command {
            Command::GetGroups => {
                let snapshot = build_snapshot(provider)?;
                Ok(Some(json!({
                    "groups": to_value(&snapshot.groups)?,
                    "activeGroupId": self.state.active_group_id.clone(),
                })))
            }

            Command::CreateGroup { name, color } => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(tabweave_engine::Error::validation(
                        "group name must not be empty",
                    ));
                }

                // Provider groups cannot be empty, so the new group is
                // seeded with the currently active tab.
                let tabs = provider.tabs()?;
                let seed = tabs
                    .iter()
                    .find(|entry| entry.tab.active)
                    .or_else(|| tabs.first())
                    .ok_or_else(|| {
                        tabweave_engine::Error::validation(
                            "cannot create a group in a window with no tabs",
                        )
                    })?
                    .tab
                    .id;

                let group_id = provider.create_group(&[seed], &name, color)?;
                let snapshot = build_snapshot(provider)?;
                let group = snapshot
                    .find_group(&group_id.to_string())
                    .ok_or_else(|| tabweave_engine::Error::not_found(format!("group {group_id}")))?;
                Ok(Some(to_value(group)?))
            }

            Command::RenameGroup { group_id, name } => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(tabweave_engine::Error::validation(
                        "group name must not be empty",
                    ));
                }
                let provider_group_id = self.require_real_group(&group_id, "renamed")?;
                provider.update_group(
                    provider_group_id,
                    tabweave_provider::GroupUpdate::named(name),
                )?;
                Ok(None)
            }

            Command::DeleteGroup { group_id } => {
                let provider_group_id = self.require_real_group(&group_id, "deleted")?;

                let snapshot = build_snapshot(provider)?;
                let members: Vec<_> = snapshot
                    .find_group(&group_id)
                    .map(|group| group.tabs.iter().map(|tab| tab.id).collect())
                    .unwrap_or_default();

                provider.remove_group(provider_group_id)?;
                for tab in members {
                    self.state.forget_tab(tab);
                }
                if self.state.active_group_id.as_deref() == Some(group_id.as_str()) {
                    self.state.active_group_id = None;
                    store.remove(keys::ACTIVE_GROUP_ID)?;
                }
                Ok(None)
            }

            Command::HideOtherGroups { group_id } => {
                if self.settings.view_one_group_at_a_time {
                    focus::focus(provider, store, &mut self.state, &self.settings, &group_id)?;
                } else {
                    focus::activate_group(provider, store, &mut self.state, &group_id)?;
                }
                Ok(None)
            }

            Command::ShowAllGroups => {
                focus::unfocus(provider, store, &mut self.state)?;
                Ok(None)
            }

            Command::CloseTab { tab_id } => {
                let snapshot = build_snapshot(provider)?;
                if snapshot.find_tab(tab_id).is_none() {
                    return Err(tabweave_engine::Error::not_found(format!("tab {tab_id}")));
                }
                provider.close_tabs(&[tab_id])?;
                self.state.forget_tab(tab_id);
                Ok(None)
            }

            Command::SearchTabs { query } => {
                let needle = query.trim().to_lowercase();
                let snapshot = build_snapshot(provider)?;

                let mut matches: Vec<TabMatch> = Vec::new();
                if !needle.is_empty() {
                    for group in &snapshot.groups {
                        for tab in &group.tabs {
                            if tab.title.to_lowercase().contains(&needle)
                                || tab.url.to_lowercase().contains(&needle)
                            {
                                matches.push(TabMatch {
                                    tab: tab.clone(),
                                    group_id: group.id.clone(),
                                });
                            }
                        }
                    }
                }
                Ok(Some(to_value(&matches)?))
            }

            Command::SaveSession { name } => {
                let session =
                    sessions::save(provider, store, &name, self.settings.max_sessions)?;
                Ok(Some(to_value(&session)?))
            }

            Command::GetSessions => Ok(Some(to_value(&sessions::list(store)?)?)),

            Command::RestoreSession { session_id, append } => {
                sessions::restore(provider, store, &session_id, append)?;
                if !append {
                    // The layout was replaced wholesale; any focus state
                    // refers to groups that no longer exist.
                    self.state.hidden_tab_ids.clear();
                    self.state.active_group_id = None;
                    store.remove(keys::ACTIVE_GROUP_ID)?;
                }
                Ok(None)
            }

            Command::DeleteSession { session_id } => {
                sessions::delete(store, &session_id)?;
                Ok(None)
            }

            Command::GetSettings => Ok(Some(to_value(&self.settings)?)),

            Command::UpdateSettings { settings: patch } => {
                self.settings.apply(patch);
                tabweave_store::put_typed(store, keys::SETTINGS, &self.settings)?;
                Ok(Some(to_value(&self.settings)?))
            }

            Command::AutoGroupByDomain => {
                let created = cluster::auto_group_all(provider)?;
                Ok(Some(json!({ "groupsCreated": created })))
            }

            Command::GetDuplicates {
                ignore_query_params,
            } => {
                let snapshot = build_snapshot(provider)?;
                let buckets = duplicates::find_duplicates(&snapshot, ignore_query_params);
                Ok(Some(to_value(&buckets)?))
            }

            Command::CloseDuplicates {
                ignore_query_params,
            } => {
                let closed = duplicates::close_all(provider, ignore_query_params)?;
                Ok(Some(json!({ "closed": closed })))
            }

            Command::SuspendTab { tab_id } => {
                suspend::suspend_tab(provider, &mut self.state, &self.settings, tab_id)?;
                Ok(None)
            }

            Command::UnsuspendTab { tab_id } => {
                suspend::unsuspend_tab(provider, &mut self.state, tab_id)?;
                Ok(None)
            }

            Command::GetSuspendedTabs => Ok(Some(to_value(&suspend::list_suspended(
                provider,
                &mut self.state,
            )?)?)),
        }
    }

    /// Resolves a group id to its provider id, rejecting the synthetic
    /// bucket and unknown ids.
    fn require_real_group(
        &self,
        group_id: &str,
        action: &str,
    ) -> tabweave_engine::Result<tabweave_types::ProviderGroupId> {
        if group_id == UNGROUPED_GROUP_ID {
            return Err(tabweave_engine::Error::validation(format!(
                "the ungrouped bucket cannot be {action}"
            )));
        }
        let snapshot = build_snapshot(self.provider.as_ref())?;
        snapshot
            .find_group(group_id)
            .and_then(|group| group.provider_group_id)
            .ok_or_else(|| tabweave_engine::Error::not_found(format!("group {group_id}")))
    }

    /// Reacts to a provider-originated event. Returns true when the
    /// event changed the layout and the debounced persistence deadline
    /// should be (re)armed.
    pub fn on_provider_event(&mut self, event: ProviderEvent) -> bool {
        match &event {
            ProviderEvent::TabActivated { tab } => {
                self.state.note_activity(*tab, Utc::now());
            }
            ProviderEvent::TabRemoved { tab } => {
                self.state.forget_tab(*tab);
            }
            ProviderEvent::TabLoadComplete { tab, url } => {
                self.maybe_auto_group(*tab, url);
            }
            ProviderEvent::TabCreated { .. } | ProviderEvent::GroupsChanged => {}
        }
        event.is_structural()
    }

    fn maybe_auto_group(&mut self, tab: tabweave_types::TabId, url: &str) {
        if !self.settings.auto_group_by_domain {
            return;
        }

        // Only loads of still-ungrouped tabs trigger clustering.
        let ungrouped = match self.provider.tabs() {
            Ok(tabs) => tabs
                .iter()
                .any(|entry| entry.tab.id == tab && entry.group.is_none()),
            Err(err) => {
                warn!(%err, "skipping auto-group check, provider unavailable");
                return;
            }
        };
        if !ungrouped {
            return;
        }

        if let Err(err) =
            cluster::check_auto_group(self.provider.as_ref(), &self.settings, Some(url))
        {
            warn!(%err, "auto-group check failed");
        }
    }

    /// Debounce fire and auto-save body: caches the current layout under
    /// the `groups` key and stamps `lastSaveTime`.
    pub fn persist_layout(&mut self) -> crate::Result<()> {
        let snapshot = build_snapshot(self.provider.as_ref())?;
        tabweave_store::put_typed(self.store.as_ref(), keys::GROUPS, &snapshot.groups)?;
        tabweave_store::put_typed(
            self.store.as_ref(),
            keys::LAST_SAVE_TIME,
            &Utc::now().to_rfc3339(),
        )?;
        debug!(groups = snapshot.groups.len(), "layout persisted");
        Ok(())
    }

    /// `auto-save` alarm body.
    pub fn run_auto_save(&mut self) {
        if !self.settings.auto_save_enabled {
            return;
        }
        if let Err(err) = self.persist_layout() {
            warn!(%err, "auto-save failed");
        }
    }

    /// `idle-check` alarm body.
    pub fn run_idle_sweep(&mut self) {
        let settings = self.settings.clone();
        if let Err(err) = suspend::sweep_idle(
            self.provider.as_ref(),
            &mut self.state,
            &settings,
            Utc::now(),
        ) {
            warn!(%err, "idle sweep failed");
        }
    }
}
