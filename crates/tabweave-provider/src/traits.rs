use chrono::{DateTime, Utc};
use tabweave_types::{GroupColor, ProviderGroupId, Tab, TabId};

use crate::Result;

/// One tab as reported by the provider, together with its membership.
///
/// Membership lives here rather than on [`Tab`] because the engine's own
/// model derives grouping from snapshots; only the provider boundary
/// speaks in raw group ids.
#[derive(Debug, Clone)]
pub struct ProviderTab {
    pub tab: Tab,
    pub group: Option<ProviderGroupId>,
}

/// One real group as reported by the provider, in provider order.
#[derive(Debug, Clone)]
pub struct ProviderGroup {
    pub id: ProviderGroupId,
    pub name: String,
    pub color: GroupColor,
    pub collapsed: bool,
    /// When the group was created, as recorded by the provider. Stable
    /// across reads of the same group.
    pub created_at: DateTime<Utc>,
}

/// Field mask for group mutation; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub color: Option<GroupColor>,
    pub collapsed: Option<bool>,
}

impl GroupUpdate {
    pub fn collapsed(value: bool) -> Self {
        Self {
            collapsed: Some(value),
            ..Default::default()
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// The host environment's tab/window/group management surface.
///
/// Responsibilities:
/// - Report the current set of open documents and their groupings
/// - Accept commands to create/update/remove documents and groups
///
/// Calls have blocking semantics on the worker thread; each engine
/// handler runs its provider calls in sequence and must treat the world
/// as potentially changed after every call. Failures propagate
/// unmodified.
pub trait TabProvider: Send + Sync {
    /// All tabs of the current window, in tab-strip order.
    fn tabs(&self) -> Result<Vec<ProviderTab>>;

    /// All real groups of the current window, in provider order.
    fn groups(&self) -> Result<Vec<ProviderGroup>>;

    /// Opens a new tab, optionally directly inside a group.
    fn create_tab(&self, url: &str, pinned: bool, group: Option<ProviderGroupId>) -> Result<Tab>;

    /// Closes the given tabs. Ids the provider no longer knows are
    /// ignored, matching host-environment semantics for racy closes.
    fn close_tabs(&self, ids: &[TabId]) -> Result<()>;

    fn activate_tab(&self, id: TabId) -> Result<()>;

    /// Best-effort "hide": drops the active flag without closing.
    fn deactivate_tab(&self, id: TabId) -> Result<()>;

    /// Replaces the document shown in a tab (used for suspension
    /// placeholders and their restoration).
    fn set_tab_url(&self, id: TabId, url: &str) -> Result<()>;

    /// Creates a real group containing the given tabs. Providers cannot
    /// represent empty groups, so at least one tab is required.
    fn create_group(&self, ids: &[TabId], name: &str, color: GroupColor)
    -> Result<ProviderGroupId>;

    /// Removes tabs from whatever group they are in.
    fn ungroup_tabs(&self, ids: &[TabId]) -> Result<()>;

    fn update_group(&self, id: ProviderGroupId, update: GroupUpdate) -> Result<()>;

    /// Removes a group and closes its tabs.
    fn remove_group(&self, id: ProviderGroupId) -> Result<()>;
}
