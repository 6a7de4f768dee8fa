use std::fmt;

use tabweave_types::{ProviderGroupId, TabId};

/// Result type for tabweave-provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the provider layer
#[derive(Debug)]
pub enum Error {
    /// The provider no longer knows the given tab
    TabNotFound(TabId),

    /// The provider no longer knows the given group
    GroupNotFound(ProviderGroupId),

    /// A provider operation was given unusable arguments
    /// (e.g. creating a group with no member tabs)
    InvalidRequest(String),

    /// The underlying tab/window surface failed
    Backend(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TabNotFound(id) => write!(f, "Tab {} not found", id),
            Error::GroupNotFound(id) => write!(f, "Group {} not found", id),
            Error::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Error::Backend(msg) => write!(f, "Provider backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
