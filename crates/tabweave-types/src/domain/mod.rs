mod group;
mod session;
mod settings;
mod tab;

pub use group::{Group, GroupColor, ProviderGroupId, UNGROUPED_GROUP_ID};
pub use session::Session;
pub use settings::{Settings, SettingsPatch};
pub use tab::{Tab, TabId};
