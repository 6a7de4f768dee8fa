use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::Group;

/// A named, persisted snapshot of the full group layout.
///
/// Immutable once created; the retained list is ordered most-recent-first
/// and bounded by the `max_sessions` setting (oldest evicted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    pub groups: Vec<Group>,
    pub created_at: DateTime<Utc>,
    pub tab_count: usize,
}

impl Session {
    /// Wraps a group layout into a new session with a generated id and the
    /// current timestamp. The tab count is summed across all groups.
    pub fn new(name: impl Into<String>, groups: Vec<Group>) -> Self {
        let tab_count = groups.iter().map(Group::tab_count).sum();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            groups,
            created_at: Utc::now(),
            tab_count,
        }
    }
}
