use std::sync::Mutex;
use std::sync::mpsc::Sender;

use chrono::{DateTime, Utc};
use tabweave_types::{GroupColor, ProviderGroupId, Tab, TabId};

use crate::event::ProviderEvent;
use crate::traits::{GroupUpdate, ProviderGroup, ProviderTab, TabProvider};
use crate::{Error, Result};

struct SimTab {
    tab: Tab,
    group: Option<ProviderGroupId>,
}

struct SimGroup {
    id: ProviderGroupId,
    name: String,
    color: GroupColor,
    collapsed: bool,
    created_at: DateTime<Utc>,
}

struct Inner {
    tabs: Vec<SimTab>,
    groups: Vec<SimGroup>,
    next_tab_id: i64,
    next_group_id: i64,
    sink: Option<Sender<ProviderEvent>>,
    fail_next: Option<String>,
}

/// In-memory provider with host-environment-like semantics.
///
/// Used by fixtures and tests in place of a real browser window: ids are
/// provider-assigned and incrementing, empty groups are dropped
/// automatically, and every mutation emits a [`ProviderEvent`] when a
/// sink is attached. A single failure can be injected to exercise error
/// paths.
pub struct SimulatedProvider {
    inner: Mutex<Inner>,
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedProvider {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                tabs: Vec::new(),
                groups: Vec::new(),
                next_tab_id: 1,
                next_group_id: 1,
                sink: None,
                fail_next: None,
            }),
        }
    }

    /// Attaches the channel that receives provider events.
    pub fn set_event_sink(&self, sink: Sender<ProviderEvent>) {
        self.inner.lock().unwrap().sink = Some(sink);
    }

    /// Makes the next trait call fail with a backend error.
    pub fn fail_next_call(&self, message: impl Into<String>) {
        self.inner.lock().unwrap().fail_next = Some(message.into());
    }

    /// Test harness: opens a tab without going through the trait, so
    /// fixtures can build a window without tripping failure injection.
    pub fn seed_tab(&self, url: &str, pinned: bool, group: Option<ProviderGroupId>) -> TabId {
        let mut inner = self.inner.lock().unwrap();
        inner.push_tab(url, pinned, group).id
    }

    /// Test harness: seeds a real group over already-seeded tabs.
    pub fn seed_group(&self, name: &str, color: GroupColor, ids: &[TabId]) -> ProviderGroupId {
        let mut inner = self.inner.lock().unwrap();
        let id = ProviderGroupId::new(inner.next_group_id);
        inner.next_group_id += 1;
        inner.groups.push(SimGroup {
            id,
            name: name.to_string(),
            color,
            collapsed: false,
            created_at: Utc::now(),
        });
        for sim in inner.tabs.iter_mut() {
            if ids.contains(&sim.tab.id) {
                sim.group = Some(id);
            }
        }
        id
    }

    /// Test harness: simulates a document finishing its load.
    pub fn complete_load(&self, id: TabId) {
        let inner = self.inner.lock().unwrap();
        if let Some(sim) = inner.tabs.iter().find(|sim| sim.tab.id == id) {
            let event = ProviderEvent::TabLoadComplete {
                tab: id,
                url: sim.tab.url.clone(),
            };
            inner.emit(event);
        }
    }

    /// Test harness: current snapshot of one tab.
    pub fn find_tab(&self, id: TabId) -> Option<Tab> {
        let inner = self.inner.lock().unwrap();
        inner
            .tabs
            .iter()
            .find(|sim| sim.tab.id == id)
            .map(|sim| sim.tab.clone())
    }

    /// Test harness: membership of one tab.
    pub fn group_of(&self, id: TabId) -> Option<ProviderGroupId> {
        let inner = self.inner.lock().unwrap();
        inner
            .tabs
            .iter()
            .find(|sim| sim.tab.id == id)
            .and_then(|sim| sim.group)
    }

    fn take_injected_failure(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        match inner.fail_next.take() {
            Some(message) => Err(Error::Backend(message)),
            None => Ok(()),
        }
    }
}

impl Inner {
    fn push_tab(&mut self, url: &str, pinned: bool, group: Option<ProviderGroupId>) -> Tab {
        let id = TabId::new(self.next_tab_id);
        self.next_tab_id += 1;
        let tab = Tab {
            id,
            url: url.to_string(),
            title: default_title(url),
            favicon_url: None,
            pinned,
            active: false,
            suspended: false,
        };
        self.tabs.push(SimTab {
            tab: tab.clone(),
            group,
        });
        tab
    }

    fn emit(&self, event: ProviderEvent) {
        if let Some(sink) = &self.sink {
            let _ = sink.send(event);
        }
    }

    fn tab_position(&self, id: TabId) -> Result<usize> {
        self.tabs
            .iter()
            .position(|sim| sim.tab.id == id)
            .ok_or(Error::TabNotFound(id))
    }

    fn require_group(&self, id: ProviderGroupId) -> Result<()> {
        if self.groups.iter().any(|group| group.id == id) {
            Ok(())
        } else {
            Err(Error::GroupNotFound(id))
        }
    }

    /// Groups with no remaining members disappear, like in the host
    /// environment.
    fn drop_empty_groups(&mut self) {
        let tabs = &self.tabs;
        self.groups
            .retain(|group| tabs.iter().any(|sim| sim.group == Some(group.id)));
    }
}

fn default_title(url: &str) -> String {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .to_string()
}

impl TabProvider for SimulatedProvider {
    fn tabs(&self) -> Result<Vec<ProviderTab>> {
        self.take_injected_failure()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .tabs
            .iter()
            .map(|sim| ProviderTab {
                tab: sim.tab.clone(),
                group: sim.group,
            })
            .collect())
    }

    fn groups(&self) -> Result<Vec<ProviderGroup>> {
        self.take_injected_failure()?;
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .groups
            .iter()
            .map(|group| ProviderGroup {
                id: group.id,
                name: group.name.clone(),
                color: group.color,
                collapsed: group.collapsed,
                created_at: group.created_at,
            })
            .collect())
    }

    fn create_tab(&self, url: &str, pinned: bool, group: Option<ProviderGroupId>) -> Result<Tab> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().unwrap();
        if let Some(group) = group {
            inner.require_group(group)?;
        }
        let tab = inner.push_tab(url, pinned, group);
        inner.emit(ProviderEvent::TabCreated { tab: tab.id });
        Ok(tab)
    }

    fn close_tabs(&self, ids: &[TabId]) -> Result<()> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().unwrap();
        let mut removed = Vec::new();
        inner.tabs.retain(|sim| {
            if ids.contains(&sim.tab.id) {
                removed.push(sim.tab.id);
                false
            } else {
                true
            }
        });
        inner.drop_empty_groups();
        for id in removed {
            inner.emit(ProviderEvent::TabRemoved { tab: id });
        }
        Ok(())
    }

    fn activate_tab(&self, id: TabId) -> Result<()> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().unwrap();
        inner.tab_position(id)?;
        for sim in inner.tabs.iter_mut() {
            sim.tab.active = sim.tab.id == id;
        }
        inner.emit(ProviderEvent::TabActivated { tab: id });
        Ok(())
    }

    fn deactivate_tab(&self, id: TabId) -> Result<()> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().unwrap();
        let pos = inner.tab_position(id)?;
        inner.tabs[pos].tab.active = false;
        Ok(())
    }

    fn set_tab_url(&self, id: TabId, url: &str) -> Result<()> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().unwrap();
        let pos = inner.tab_position(id)?;
        inner.tabs[pos].tab.url = url.to_string();
        let event = ProviderEvent::TabLoadComplete {
            tab: id,
            url: url.to_string(),
        };
        inner.emit(event);
        Ok(())
    }

    fn create_group(
        &self,
        ids: &[TabId],
        name: &str,
        color: GroupColor,
    ) -> Result<ProviderGroupId> {
        self.take_injected_failure()?;
        if ids.is_empty() {
            return Err(Error::InvalidRequest(
                "a group needs at least one tab".to_string(),
            ));
        }
        let mut inner = self.inner.lock().unwrap();
        for id in ids {
            inner.tab_position(*id)?;
        }
        let group_id = ProviderGroupId::new(inner.next_group_id);
        inner.next_group_id += 1;
        inner.groups.push(SimGroup {
            id: group_id,
            name: name.to_string(),
            color,
            collapsed: false,
            created_at: Utc::now(),
        });
        for sim in inner.tabs.iter_mut() {
            if ids.contains(&sim.tab.id) {
                sim.group = Some(group_id);
            }
        }
        inner.drop_empty_groups();
        inner.emit(ProviderEvent::GroupsChanged);
        Ok(group_id)
    }

    fn ungroup_tabs(&self, ids: &[TabId]) -> Result<()> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().unwrap();
        for sim in inner.tabs.iter_mut() {
            if ids.contains(&sim.tab.id) {
                sim.group = None;
            }
        }
        inner.drop_empty_groups();
        inner.emit(ProviderEvent::GroupsChanged);
        Ok(())
    }

    fn update_group(&self, id: ProviderGroupId, update: GroupUpdate) -> Result<()> {
        self.take_injected_failure()?;
        let mut inner = self.inner.lock().unwrap();
        let group = inner
            .groups
            .iter_mut()
            .find(|group| group.id == id)
            .ok_or(Error::GroupNotFound(id))?;
        if let Some(name) = update.name {
            group.name = name;
        }
        if let Some(color) = update.color {
            group.color = color;
        }
        if let Some(collapsed) = update.collapsed {
            group.collapsed = collapsed;
        }
        inner.emit(ProviderEvent::GroupsChanged);
        Ok(())
    }

    fn remove_group(&self, id: ProviderGroupId) -> Result<()> {
        self.take_injected_failure()?;
        let member_ids: Vec<TabId> = {
            let inner = self.inner.lock().unwrap();
            inner.require_group(id)?;
            inner
                .tabs
                .iter()
                .filter(|sim| sim.group == Some(id))
                .map(|sim| sim.tab.id)
                .collect()
        };
        self.close_tabs(&member_ids)?;
        let mut inner = self.inner.lock().unwrap();
        inner.groups.retain(|group| group.id != id);
        inner.emit(ProviderEvent::GroupsChanged);
        Ok(())
    }
}
