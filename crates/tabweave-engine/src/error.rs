use std::fmt;

/// Result type for tabweave-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the engine layer.
///
/// The dispatcher converts every variant into a `{success:false, error}`
/// envelope at its boundary; nothing is swallowed below it except the
/// deliberately permissive no-ops in suspension eligibility and URL
/// bucketing.
#[derive(Debug)]
pub enum Error {
    /// A group, session, or tab id is absent from the current state
    NotFound(String),

    /// A required field failed validation (e.g. an empty name)
    Validation(String),

    /// The underlying tab/group operation failed
    Provider(tabweave_provider::Error),

    /// The persistent store failed
    Store(tabweave_store::Error),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(what) => write!(f, "Not found: {}", what),
            Error::Validation(msg) => write!(f, "Validation error: {}", msg),
            Error::Provider(err) => write!(f, "Provider error: {}", err),
            Error::Store(err) => write!(f, "Storage error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Provider(err) => Some(err),
            Error::Store(err) => Some(err),
            Error::NotFound(_) | Error::Validation(_) => None,
        }
    }
}

impl From<tabweave_provider::Error> for Error {
    fn from(err: tabweave_provider::Error) -> Self {
        Error::Provider(err)
    }
}

impl From<tabweave_store::Error> for Error {
    fn from(err: tabweave_store::Error) -> Self {
        Error::Store(err)
    }
}
