use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier assigned by the tab provider for the lifetime of a tab.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(i64);

impl TabId {
    /// Creates a `TabId` from a raw provider-assigned value.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only copy of an open document, as held inside snapshots and sessions.
///
/// The tab itself is owned by the provider; the engine never mutates these
/// copies, it issues provider commands instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub url: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,

    #[serde(default)]
    pub pinned: bool,

    #[serde(default)]
    pub active: bool,

    /// True while the tab's content has been replaced with a placeholder.
    #[serde(default)]
    pub suspended: bool,
}
