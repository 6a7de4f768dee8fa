//! The fixed command vocabulary accepted by the dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabweave_types::{GroupColor, SettingsPatch, Tab, TabId};

/// External command, as delivered by the presentation layer.
///
/// The wire form is a JSON object tagged with `type`, e.g.
/// `{"type": "HIDE_OTHER_GROUPS", "groupId": "3"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    GetGroups,

    #[serde(rename_all = "camelCase")]
    CreateGroup { name: String, color: GroupColor },

    #[serde(rename_all = "camelCase")]
    RenameGroup { group_id: String, name: String },

    #[serde(rename_all = "camelCase")]
    DeleteGroup { group_id: String },

    /// Focus: hide every group except the given one.
    #[serde(rename_all = "camelCase")]
    HideOtherGroups { group_id: String },

    /// Unfocus: expand everything and drop the hidden set.
    ShowAllGroups,

    #[serde(rename_all = "camelCase")]
    CloseTab { tab_id: TabId },

    #[serde(rename_all = "camelCase")]
    SearchTabs { query: String },

    #[serde(rename_all = "camelCase")]
    SaveSession { name: String },

    GetSessions,

    #[serde(rename_all = "camelCase")]
    RestoreSession {
        session_id: String,
        #[serde(default)]
        append: bool,
    },

    #[serde(rename_all = "camelCase")]
    DeleteSession { session_id: String },

    GetSettings,

    #[serde(rename_all = "camelCase")]
    UpdateSettings { settings: SettingsPatch },

    AutoGroupByDomain,

    #[serde(rename_all = "camelCase")]
    GetDuplicates {
        #[serde(default)]
        ignore_query_params: bool,
    },

    #[serde(rename_all = "camelCase")]
    CloseDuplicates {
        #[serde(default)]
        ignore_query_params: bool,
    },

    #[serde(rename_all = "camelCase")]
    SuspendTab { tab_id: TabId },

    #[serde(rename_all = "camelCase")]
    UnsuspendTab { tab_id: TabId },

    GetSuspendedTabs,
}

/// Uniform result envelope: `{success, data?, error?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn ok(data: Option<Value>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// One search hit: the tab plus the id of the group it lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabMatch {
    #[serde(flatten)]
    pub tab: Tab,
    pub group_id: String,
}
