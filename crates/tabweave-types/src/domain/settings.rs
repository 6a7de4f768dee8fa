use serde::{Deserialize, Serialize};

/// Process-wide configuration.
///
/// Loaded once at startup, mutated only through explicit update commands,
/// and persisted on every mutation. Numeric floors are enforced by
/// [`Settings::clamp`] rather than rejected, so a stored document written
/// by an older build never fails to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Enforce single-group focus when hiding other groups.
    pub view_one_group_at_a_time: bool,

    /// Exempt the synthetic ungrouped bucket from being hidden in focus mode.
    pub show_ungrouped_tabs: bool,

    /// Cluster ungrouped tabs by origin as they finish loading.
    pub auto_group_by_domain: bool,

    /// Bucket size at which an origin is promoted to a real group. Floor: 2.
    pub auto_group_threshold: usize,

    pub auto_save_enabled: bool,
    pub auto_save_interval_seconds: u64,

    /// Retained-session ring bound. Floor: 1.
    pub max_sessions: usize,

    /// Idle minutes before a tab is eligible for suspension. 0 disables
    /// the idle sweep entirely.
    pub suspension_timeout_minutes: u64,

    /// Domain substrings whose tabs are never suspended.
    pub suspension_whitelist: Vec<String>,

    pub show_tab_count_badge: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            view_one_group_at_a_time: true,
            show_ungrouped_tabs: true,
            auto_group_by_domain: false,
            auto_group_threshold: 3,
            auto_save_enabled: false,
            auto_save_interval_seconds: 300,
            max_sessions: 10,
            suspension_timeout_minutes: 0,
            suspension_whitelist: Vec::new(),
            show_tab_count_badge: true,
        }
    }
}

impl Settings {
    /// Applies a partial update, then re-clamps numeric floors.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.view_one_group_at_a_time {
            self.view_one_group_at_a_time = v;
        }
        if let Some(v) = patch.show_ungrouped_tabs {
            self.show_ungrouped_tabs = v;
        }
        if let Some(v) = patch.auto_group_by_domain {
            self.auto_group_by_domain = v;
        }
        if let Some(v) = patch.auto_group_threshold {
            self.auto_group_threshold = v;
        }
        if let Some(v) = patch.auto_save_enabled {
            self.auto_save_enabled = v;
        }
        if let Some(v) = patch.auto_save_interval_seconds {
            self.auto_save_interval_seconds = v;
        }
        if let Some(v) = patch.max_sessions {
            self.max_sessions = v;
        }
        if let Some(v) = patch.suspension_timeout_minutes {
            self.suspension_timeout_minutes = v;
        }
        if let Some(v) = patch.suspension_whitelist {
            self.suspension_whitelist = v;
        }
        if let Some(v) = patch.show_tab_count_badge {
            self.show_tab_count_badge = v;
        }
        self.clamp();
    }

    /// Enforces documented floors on numeric options.
    pub fn clamp(&mut self) {
        self.auto_group_threshold = self.auto_group_threshold.max(2);
        self.max_sessions = self.max_sessions.max(1);
        self.auto_save_interval_seconds = self.auto_save_interval_seconds.max(1);
    }
}

/// Partial settings carried by an update command. Absent fields leave the
/// current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub view_one_group_at_a_time: Option<bool>,
    pub show_ungrouped_tabs: Option<bool>,
    pub auto_group_by_domain: Option<bool>,
    pub auto_group_threshold: Option<usize>,
    pub auto_save_enabled: Option<bool>,
    pub auto_save_interval_seconds: Option<u64>,
    pub max_sessions: Option<usize>,
    pub suspension_timeout_minutes: Option<u64>,
    pub suspension_whitelist: Option<Vec<String>>,
    pub show_tab_count_badge: Option<bool>,
}
