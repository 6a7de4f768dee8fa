use std::fmt;

/// Result type for tabweave-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Engine operation failed during bootstrap or a timer sweep
    Engine(tabweave_engine::Error),

    /// Persistent store failed
    Store(tabweave_store::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// The worker thread could not be started or has gone away
    WorkerUnavailable(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Engine(err) => write!(f, "Engine error: {}", err),
            Error::Store(err) => write!(f, "Storage error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::WorkerUnavailable(msg) => write!(f, "Worker unavailable: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Engine(err) => Some(err),
            Error::Store(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Config(_) | Error::WorkerUnavailable(_) => None,
        }
    }
}

impl From<tabweave_engine::Error> for Error {
    fn from(err: tabweave_engine::Error) -> Self {
        Error::Engine(err)
    }
}

impl From<tabweave_store::Error> for Error {
    fn from(err: tabweave_store::Error) -> Self {
        Error::Store(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
