use tabweave_types::TabId;

/// Provider-originated notifications delivered to the runtime loop.
///
/// These arrive on the same channel as commands and timer fires, so the
/// single worker observes them strictly in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    TabCreated { tab: TabId },

    TabRemoved { tab: TabId },

    /// The user switched to this tab; feeds the activity clock.
    TabActivated { tab: TabId },

    /// A tab finished loading a document.
    TabLoadComplete { tab: TabId, url: String },

    /// A group was created, removed, or had its membership changed.
    GroupsChanged,
}

impl ProviderEvent {
    /// True for events that change the tab/group layout and should arm
    /// the debounced persistence deadline.
    pub fn is_structural(&self) -> bool {
        !matches!(self, ProviderEvent::TabActivated { .. })
    }
}
