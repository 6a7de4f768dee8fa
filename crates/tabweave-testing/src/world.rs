use std::sync::Arc;

use tabweave_provider::{SimulatedProvider, TabProvider};
use tabweave_store::{KeyValueStore, MemoryStore, keys};
use tabweave_types::{GroupColor, Settings, TabId};

enum TabSpec {
    Plain(String),
    Pinned(String),
    Active(String),
}

struct GroupSpec {
    name: String,
    color: GroupColor,
    urls: Vec<String>,
}

/// Declarative builder for a simulated window and a seeded store.
///
/// # Example
/// ```
/// use tabweave_provider::TabProvider;
/// use tabweave_testing::WorldBuilder;
/// use tabweave_types::GroupColor;
///
/// let world = WorldBuilder::new()
///     .tab("https://loose.example.com")
///     .group("work", GroupColor::Blue, &["https://a.com", "https://b.com"])
///     .build();
///
/// assert_eq!(world.provider.tabs().unwrap().len(), 3);
/// ```
#[derive(Default)]
pub struct WorldBuilder {
    tabs: Vec<TabSpec>,
    groups: Vec<GroupSpec>,
    settings: Settings,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an ungrouped tab.
    pub fn tab(mut self, url: &str) -> Self {
        self.tabs.push(TabSpec::Plain(url.to_string()));
        self
    }

    /// Adds a pinned, ungrouped tab.
    pub fn pinned_tab(mut self, url: &str) -> Self {
        self.tabs.push(TabSpec::Pinned(url.to_string()));
        self
    }

    /// Adds an ungrouped tab and makes it the active one.
    pub fn active_tab(mut self, url: &str) -> Self {
        self.tabs.push(TabSpec::Active(url.to_string()));
        self
    }

    /// Adds a real group populated with fresh tabs at the given URLs.
    pub fn group(mut self, name: &str, color: GroupColor, urls: &[&str]) -> Self {
        self.groups.push(GroupSpec {
            name: name.to_string(),
            color,
            urls: urls.iter().map(|url| url.to_string()).collect(),
        });
        self
    }

    /// Adjusts the settings seeded into the store.
    pub fn settings(mut self, mutate: impl FnOnce(&mut Settings)) -> Self {
        mutate(&mut self.settings);
        self
    }

    pub fn build(self) -> World {
        let provider = Arc::new(SimulatedProvider::new());

        let mut activate: Option<TabId> = None;
        for spec in &self.tabs {
            match spec {
                TabSpec::Plain(url) => {
                    provider.seed_tab(url, false, None);
                }
                TabSpec::Pinned(url) => {
                    provider.seed_tab(url, true, None);
                }
                TabSpec::Active(url) => {
                    activate = Some(provider.seed_tab(url, false, None));
                }
            }
        }

        for group in &self.groups {
            let ids: Vec<TabId> = group
                .urls
                .iter()
                .map(|url| provider.seed_tab(url, false, None))
                .collect();
            provider.seed_group(&group.name, group.color, &ids);
        }

        if let Some(id) = activate {
            provider
                .activate_tab(id)
                .expect("seeded tab must be activatable");
        }

        let store = Arc::new(MemoryStore::new());
        tabweave_store::put_typed(store.as_ref(), keys::SETTINGS, &self.settings)
            .expect("seeding settings into a memory store cannot fail");

        World {
            provider,
            store,
            settings: self.settings,
        }
    }
}

/// A ready-to-use simulated environment.
pub struct World {
    pub provider: Arc<SimulatedProvider>,
    pub store: Arc<MemoryStore>,
    pub settings: Settings,
}

impl World {
    /// The store as a trait object, for engine calls.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// The provider as a trait object, for engine calls.
    pub fn provider(&self) -> &SimulatedProvider {
        self.provider.as_ref()
    }
}
