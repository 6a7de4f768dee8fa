pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod runtime;

pub use command::{Command, CommandResponse, TabMatch};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use runtime::{CommandHandle, Runtime, RuntimeConfig};
