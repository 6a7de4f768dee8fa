use std::fmt;

/// Result type for tabweave-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the storage layer
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// Stored document is not valid JSON, or a value failed to
    /// (de)serialize
    Serde(serde_json::Error),

    /// The imported document is not a JSON object
    InvalidDocument(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Serde(err) => write!(f, "Serialization error: {}", err),
            Error::InvalidDocument(msg) => write!(f, "Invalid document: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Serde(err) => Some(err),
            Error::InvalidDocument(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err)
    }
}
