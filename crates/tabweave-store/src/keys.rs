//! Top-level keys of the persisted-state document.

/// Cached group layout written by debounced persistence.
pub const GROUPS: &str = "groups";

/// Retained session list, most-recent-first.
pub const SESSIONS: &str = "sessions";

/// Process-wide settings.
pub const SETTINGS: &str = "settings";

/// Mirror of the focus indicator so a restart can restore it.
pub const ACTIVE_GROUP_ID: &str = "activeGroupId";

/// Timestamp of the last layout persistence.
pub const LAST_SAVE_TIME: &str = "lastSaveTime";
