use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tab::Tab;

/// Reserved id of the synthetic bucket that collects tabs belonging to no
/// real provider group.
pub const UNGROUPED_GROUP_ID: &str = "ungrouped";

/// Identifier of a real group inside the tab provider. Always positive;
/// the synthetic bucket carries no provider id at all.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderGroupId(i64);

impl ProviderGroupId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProviderGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The eight colors the provider understands for group chrome.
///
/// `Grey` is reserved for the synthetic ungrouped bucket; automatic
/// clustering only ever picks from [`GroupColor::NON_GREY`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupColor {
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
}

impl GroupColor {
    /// Palette available to deterministic auto-group coloring. Grey is
    /// excluded so auto-created groups stay visually distinct from the
    /// ungrouped bucket.
    pub const NON_GREY: [GroupColor; 7] = [
        GroupColor::Blue,
        GroupColor::Red,
        GroupColor::Yellow,
        GroupColor::Green,
        GroupColor::Pink,
        GroupColor::Purple,
        GroupColor::Cyan,
    ];
}

/// One group in a snapshot or a saved session.
///
/// `provider_group_id` is `None` exactly for the synthetic bucket, which is
/// derived on every snapshot and never exists inside the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_group_id: Option<ProviderGroupId>,

    pub name: String,
    pub color: GroupColor,
    pub tabs: Vec<Tab>,

    #[serde(default)]
    pub collapsed: bool,

    pub created_at: DateTime<Utc>,
}

impl Group {
    /// True for the derived ungrouped bucket, which cannot be renamed,
    /// deleted, or collapsed through the provider.
    pub fn is_synthetic(&self) -> bool {
        self.provider_group_id.is_none()
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(GroupColor::Purple).unwrap(),
            serde_json::json!("purple")
        );
    }

    #[test]
    fn test_non_grey_palette_excludes_grey() {
        assert_eq!(GroupColor::NON_GREY.len(), 7);
        assert!(!GroupColor::NON_GREY.contains(&GroupColor::Grey));
    }

    #[test]
    fn test_synthetic_group_has_no_provider_id() {
        let group = Group {
            id: UNGROUPED_GROUP_ID.to_string(),
            provider_group_id: None,
            name: "Ungrouped".to_string(),
            color: GroupColor::Grey,
            tabs: vec![],
            collapsed: false,
            created_at: Utc::now(),
        };

        assert!(group.is_synthetic());
        let value = serde_json::to_value(&group).unwrap();
        assert!(value.get("providerGroupId").is_none());
    }
}
